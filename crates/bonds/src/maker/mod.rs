//! Bond construction from a dataset.
//!
//! - [`BondMaker`] turns a series name and purchase date into a [`Bond`]
//! - [`BondMakerBuilder`] constructs a [`BondMaker`] from a dataset file on disk
//! - [`SeriesTable`] is the in-memory maker backed by parsed series
//! - [`WorkbookBondMakerBuilder`] reads the published dataset workbook

mod series_table;
mod workbook;

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::Bond;

pub use series_table::SeriesTable;
pub use workbook::{read_workbook, WorkbookBondMakerBuilder};

/// Builds bonds out of a loaded dataset.
pub trait BondMaker: Send + Sync {
    /// Builds the bond of series `name` bought on `purchase_date`.
    ///
    /// Fails with a lookup error (see [`BondError::is_lookup`](crate::BondError::is_lookup))
    /// when the series is unknown or could not have been bought on that day.
    fn make(&self, name: &str, purchase_date: NaiveDate) -> Result<Bond>;

    /// Names of all series known to this maker, sorted.
    fn series_names(&self) -> Vec<String>;
}

/// Constructs a [`BondMaker`] from a dataset file.
///
/// Construction is blocking (file IO and parsing).
pub trait BondMakerBuilder: Send + Sync {
    fn build(&self, dataset: &Path) -> Result<Arc<dyn BondMaker>>;
}
