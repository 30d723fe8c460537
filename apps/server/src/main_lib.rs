use std::sync::Arc;

use anyhow::Context;
use bondsite_bonds::WorkbookBondMakerBuilder;
use bondsite_core::{
    dataset::{DatasetCache, DatasetCacheTrait},
    providers::{GovPlDatasetInfoProvider, HttpDatasetDownloader},
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub dataset_cache: Arc<dyn DatasetCacheTrait>,
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }

    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    tracing::info!("Dataset cache directory: {}", config.cache_path.display());
    let provider = Arc::new(GovPlDatasetInfoProvider::new(&config.dataset_page_url)?);
    let cache = DatasetCache::new(
        &config.cache_path,
        provider,
        Arc::new(HttpDatasetDownloader::new()),
        Arc::new(WorkbookBondMakerBuilder),
    );
    build_state_with(cache).await
}

/// Runs the first refresh on `cache` and wraps it into the shared state.
pub async fn build_state_with(cache: DatasetCache) -> anyhow::Result<Arc<AppState>> {
    cache
        .initialize()
        .await
        .context("Initial dataset refresh failed")?;

    let status = cache.status();
    if let Some(info) = &status.info {
        tracing::info!(
            "Serving dataset published {} ({} series, fresh until {})",
            info.data_date,
            status.series_count,
            info.fresh_until()
        );
    }

    Ok(Arc::new(AppState {
        dataset_cache: Arc::new(cache),
    }))
}
