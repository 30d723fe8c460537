//! Error types for bond construction and dataset parsing.

use chrono::NaiveDate;
use thiserror::Error;

/// Type alias for Result using [`BondError`].
pub type Result<T> = std::result::Result<T, BondError>;

/// Errors that can occur while reading a dataset or building a bond.
///
/// Variants reported by [`is_lookup`](Self::is_lookup) describe a request that
/// cannot be satisfied by the loaded dataset (unknown series, wrong purchase
/// date). Everything else is a failure of the dataset itself.
#[derive(Error, Debug)]
pub enum BondError {
    /// No series with this name in the dataset.
    #[error("Bond series not found: {0}")]
    SeriesNotFound(String),

    /// The name does not follow the `KKKMMYY` series naming scheme.
    #[error("Invalid bond series name: {0}")]
    InvalidSeriesName(String),

    /// The purchase date lies outside the series' sale window.
    #[error("Series {series} was not on sale on {purchase_date}")]
    OutsideSaleWindow {
        series: String,
        purchase_date: NaiveDate,
    },

    /// A bond bought on this day would not mature in the series' maturity month.
    #[error("Series {series} does not mature {term_months} months after {purchase_date}")]
    MaturityMismatch {
        series: String,
        purchase_date: NaiveDate,
        term_months: u32,
    },

    /// The interest rate for a required period has not been published.
    #[error("No interest rate published for series {series}, period {period}")]
    MissingRate { series: String, period: u32 },

    /// Calendar arithmetic left chrono's supported range.
    #[error("Date out of range: {0}")]
    DateOutOfRange(NaiveDate),

    /// The dataset workbook could not be opened or read.
    #[error("Failed to read dataset workbook: {0}")]
    Workbook(String),

    /// The dataset was read but no bond series were recognised in it.
    #[error("Dataset contains no bond series")]
    EmptyDataset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BondError {
    /// Returns true when the error comes from the caller's lookup parameters
    /// rather than from the dataset.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::SeriesNotFound(_)
                | Self::InvalidSeriesName(_)
                | Self::OutsideSaleWindow { .. }
                | Self::MaturityMismatch { .. }
                | Self::MissingRate { .. }
                | Self::DateOutOfRange(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_not_found_is_lookup() {
        let error = BondError::SeriesNotFound("XYZ0000".to_string());
        assert!(error.is_lookup());
    }

    #[test]
    fn test_maturity_mismatch_is_lookup() {
        let error = BondError::MaturityMismatch {
            series: "EDO0134".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            term_months: 120,
        };
        assert!(error.is_lookup());
    }

    #[test]
    fn test_dataset_errors_are_not_lookup() {
        assert!(!BondError::EmptyDataset.is_lookup());
        assert!(!BondError::Workbook("corrupt".to_string()).is_lookup());
    }

    #[test]
    fn test_error_display() {
        let error = BondError::SeriesNotFound("EDO0199".to_string());
        assert_eq!(format!("{}", error), "Bond series not found: EDO0199");

        let error = BondError::OutsideSaleWindow {
            series: "COI0128".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        assert_eq!(
            format!("{}", error),
            "Series COI0128 was not on sale on 2024-02-01"
        );
    }
}
