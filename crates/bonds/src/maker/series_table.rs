use std::collections::HashMap;

use chrono::NaiveDate;

use super::BondMaker;
use crate::errors::{BondError, Result};
use crate::models::{Bond, BondSeries};
use crate::valuation::value_bond;

/// In-memory lookup of bond series by name.
#[derive(Debug, Clone, Default)]
pub struct SeriesTable {
    series: HashMap<String, BondSeries>,
}

impl SeriesTable {
    /// Builds the table; a later series with the same name replaces an earlier one.
    pub fn new(series: impl IntoIterator<Item = BondSeries>) -> Self {
        let series = series
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect();
        Self { series }
    }

    pub fn get(&self, name: &str) -> Option<&BondSeries> {
        self.series.get(&name.trim().to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl BondMaker for SeriesTable {
    fn make(&self, name: &str, purchase_date: NaiveDate) -> Result<Bond> {
        let series = self
            .get(name)
            .ok_or_else(|| BondError::SeriesNotFound(name.to_string()))?;
        series.check_purchase_date(purchase_date)?;
        value_bond(series, purchase_date)
    }

    fn series_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.series.keys().cloned().collect();
        names.sort();
        names
    }
}
