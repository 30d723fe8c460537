use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bondsite_bonds::{Bond, BondMaker};
use chrono::NaiveDate;

use super::dataset_model::{DatasetInfo, DatasetStatus};
use crate::errors::Result;

/// Discovers the most recently published dataset.
#[async_trait]
pub trait DatasetInfoProvider: Send + Sync {
    async fn get_latest(&self) -> Result<DatasetInfo>;
}

/// Fetches a dataset payload to a local file.
#[async_trait]
pub trait DatasetDownloader: Send + Sync {
    /// Replaces `dest` with the content at `url`. Returns the number of bytes written.
    ///
    /// Implementations must leave `dest` untouched when the download fails.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Trait for the dataset refresh cache operations used by the API layer.
#[async_trait]
pub trait DatasetCacheTrait: Send + Sync {
    /// Re-evaluates freshness, refetches when needed and rebuilds the bond maker.
    async fn refresh(&self) -> Result<()>;

    /// The bond maker built by the last successful refresh.
    fn get(&self) -> Result<Arc<dyn BondMaker>>;

    /// Builds a bond with the current bond maker.
    fn make_bond(&self, name: &str, purchase_date: NaiveDate) -> Result<Bond>;

    fn status(&self) -> DatasetStatus;
}
