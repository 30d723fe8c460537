//! Core error types for Bondsite.
//!
//! Dataset failures (discovery, download, metadata, rebuild) and bond lookup
//! failures are kept apart so the API layer can tell a client error from a
//! server error.

use bondsite_bonds::BondError;
use thiserror::Error;

use crate::dataset::DatasetError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Dataset operation failed: {0}")]
    Dataset(#[from] DatasetError),

    #[error("{0}")]
    Bond(#[from] BondError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the error was caused by the caller's lookup parameters.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::Bond(e) if e.is_lookup())
    }
}
