use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bondsite_bonds::{Bond, BondMaker, BondMakerBuilder};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tokio::fs;
use tokio::sync::Mutex;

use super::dataset_errors::DatasetError;
use super::dataset_model::{DatasetInfo, DatasetStatus};
use super::dataset_traits::{DatasetCacheTrait, DatasetDownloader, DatasetInfoProvider};
use crate::constants::{DATASET_FILE, DATASET_INFO_FILE};
use crate::errors::Result;

/// Source of "today" for the freshness check.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// What request handlers see: replaced as a whole after a successful rebuild.
struct Published {
    info: DatasetInfo,
    maker: Arc<dyn BondMaker>,
    series_count: usize,
    built_at: DateTime<Utc>,
}

/// Keeps the local dataset copy fresh and serves the bond maker built from it.
///
/// The cache owns two files in its directory: the metadata file
/// ([`DATASET_INFO_FILE`]) and the dataset payload ([`DATASET_FILE`]).
/// Refreshes are serialized; readers never block on a refresh and keep
/// seeing the previous bond maker until a rebuild fully succeeds.
pub struct DatasetCache {
    cache_dir: PathBuf,
    info_path: PathBuf,
    data_path: PathBuf,
    provider: Arc<dyn DatasetInfoProvider>,
    downloader: Arc<dyn DatasetDownloader>,
    builder: Arc<dyn BondMakerBuilder>,
    clock: Clock,
    /// Held for the whole refresh.
    current_info: Mutex<Option<DatasetInfo>>,
    published: RwLock<Option<Published>>,
}

impl DatasetCache {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        provider: Arc<dyn DatasetInfoProvider>,
        downloader: Arc<dyn DatasetDownloader>,
        builder: Arc<dyn BondMakerBuilder>,
    ) -> Self {
        let cache_dir = cache_dir.into();
        Self {
            info_path: cache_dir.join(DATASET_INFO_FILE),
            data_path: cache_dir.join(DATASET_FILE),
            cache_dir,
            provider,
            downloader,
            builder,
            clock: Arc::new(|| Local::now().date_naive()),
            current_info: Mutex::new(None),
            published: RwLock::new(None),
        }
    }

    /// Replaces the clock used for the freshness check.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn info_path(&self) -> &Path {
        &self.info_path
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Creates the cache directory if missing and runs the first refresh.
    pub async fn initialize(&self) -> Result<()> {
        if !fs::try_exists(&self.cache_dir).await? {
            log::debug!("Creating cache directory {}", self.cache_dir.display());
        }
        fs::create_dir_all(&self.cache_dir).await?;
        self.refresh().await
    }

    async fn read_info(&self) -> Result<DatasetInfo> {
        log::debug!("Loading dataset info from {}", self.info_path.display());
        let raw = fs::read(&self.info_path).await?;
        let info = serde_json::from_slice(&raw).map_err(|source| DatasetError::Metadata {
            path: self.info_path.clone(),
            source,
        })?;
        Ok(info)
    }

    async fn write_info(&self, info: &DatasetInfo) -> Result<()> {
        let raw = serde_json::to_vec(info).map_err(|source| DatasetError::Metadata {
            path: self.info_path.clone(),
            source,
        })?;
        fs::write(&self.info_path, raw).await?;
        Ok(())
    }

    async fn build_maker(&self) -> Result<Arc<dyn BondMaker>> {
        let builder = self.builder.clone();
        let data_path = self.data_path.clone();
        let maker = tokio::task::spawn_blocking(move || builder.build(&data_path))
            .await
            .map_err(|e| DatasetError::Internal(e.to_string()))?
            .map_err(DatasetError::Build)?;
        Ok(maker)
    }

    fn publish(&self, info: DatasetInfo, maker: Arc<dyn BondMaker>) -> Result<()> {
        let series_count = maker.series_names().len();
        let mut published = self
            .published
            .write()
            .map_err(|e| DatasetError::Internal(e.to_string()))?;
        *published = Some(Published {
            info,
            maker,
            series_count,
            built_at: Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl DatasetCacheTrait for DatasetCache {
    async fn refresh(&self) -> Result<()> {
        let mut current_info = self.current_info.lock().await;
        let mut fetch_dataset = false;

        if fs::try_exists(&self.info_path).await? {
            let loaded = self.read_info().await?;
            if loaded.is_stale((self.clock)()) {
                log::info!(
                    "Dataset info from {} is stale, discovering a newer dataset",
                    loaded.data_date
                );
                *current_info = None;
                fetch_dataset = true;
            } else {
                *current_info = Some(loaded);
            }
        }

        let mut discovered = false;
        let info = match current_info.as_ref() {
            Some(info) => info.clone(),
            None => {
                let info = self.provider.get_latest().await?;
                log::info!(
                    "Discovered dataset {} published {}",
                    info.file_url,
                    info.data_date
                );
                discovered = true;
                fetch_dataset = true;
                info
            }
        };

        if fetch_dataset || !fs::try_exists(&self.data_path).await? {
            log::info!("Downloading dataset from {}", info.file_url);
            let bytes = self
                .downloader
                .download(&info.file_url, &self.data_path)
                .await?;
            log::debug!("Wrote {} bytes to {}", bytes, self.data_path.display());
        }

        // Newly discovered info only reaches disk once its payload is in place,
        // so a failed or cancelled download leaves the old metadata to be
        // re-evaluated on the next refresh.
        if discovered {
            self.write_info(&info).await?;
            *current_info = Some(info.clone());
        }

        let maker = self.build_maker().await?;
        self.publish(info, maker)?;
        log::debug!("Bond maker rebuilt from {}", self.data_path.display());
        Ok(())
    }

    fn get(&self) -> Result<Arc<dyn BondMaker>> {
        let published = self
            .published
            .read()
            .map_err(|e| DatasetError::Internal(e.to_string()))?;
        published
            .as_ref()
            .map(|p| p.maker.clone())
            .ok_or_else(|| DatasetError::NotReady.into())
    }

    fn make_bond(&self, name: &str, purchase_date: NaiveDate) -> Result<Bond> {
        Ok(self.get()?.make(name, purchase_date)?)
    }

    fn status(&self) -> DatasetStatus {
        match self.published.read() {
            Ok(published) => match published.as_ref() {
                Some(p) => DatasetStatus {
                    info: Some(p.info.clone()),
                    built_at: Some(p.built_at),
                    series_count: p.series_count,
                },
                None => DatasetStatus {
                    info: None,
                    built_at: None,
                    series_count: 0,
                },
            },
            Err(e) => {
                log::error!("Dataset cache lock poisoned: {}", e);
                DatasetStatus {
                    info: None,
                    built_at: None,
                    series_count: 0,
                }
            }
        }
    }
}
