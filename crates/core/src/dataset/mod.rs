//! Dataset module - dataset metadata, collaborator traits and the refresh cache.

mod dataset_cache;
mod dataset_errors;
mod dataset_model;
mod dataset_traits;

pub use dataset_cache::{Clock, DatasetCache};
pub use dataset_errors::DatasetError;
pub use dataset_model::{DatasetInfo, DatasetStatus};
pub use dataset_traits::{DatasetCacheTrait, DatasetDownloader, DatasetInfoProvider};
