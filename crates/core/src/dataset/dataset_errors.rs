use std::path::PathBuf;

use bondsite_bonds::BondError;
use thiserror::Error;

/// Errors raised while discovering, downloading or loading the dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The latest dataset could not be discovered.
    #[error("Dataset discovery failed: {0}")]
    Discovery(String),

    /// The dataset payload could not be downloaded.
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// The metadata cache file is unreadable or not valid JSON.
    #[error("Invalid dataset metadata in {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The bond maker could not be built from the downloaded dataset.
    #[error("Failed to build bond maker from dataset: {0}")]
    Build(#[source] BondError),

    /// No bond maker has been built yet.
    #[error("Dataset is not loaded yet")]
    NotReady,

    /// A background task or lock failed.
    #[error("Dataset cache internal error: {0}")]
    Internal(String),
}
