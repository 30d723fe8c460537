use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::STALE_AFTER_MONTHS;

/// Where the latest dataset lives and when it was published.
///
/// Persisted as-is in the metadata cache file:
/// `{"data_date": "2024-01-01", "file_url": "https://..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub data_date: NaiveDate,
    pub file_url: String,
}

impl DatasetInfo {
    pub fn new(data_date: NaiveDate, file_url: impl Into<String>) -> Self {
        Self {
            data_date,
            file_url: file_url.into(),
        }
    }

    /// Last day on which this info still counts as fresh.
    ///
    /// Calendar months, clamped to the end of the month (Dec 31 -> Feb 28/29).
    pub fn fresh_until(&self) -> NaiveDate {
        self.data_date
            .checked_add_months(Months::new(STALE_AFTER_MONTHS))
            .unwrap_or(NaiveDate::MAX)
    }

    /// True once `today` is past [`fresh_until`](Self::fresh_until).
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.fresh_until() < today
    }
}

/// Snapshot of what the cache is currently serving.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatus {
    pub info: Option<DatasetInfo>,
    pub built_at: Option<DateTime<Utc>>,
    pub series_count: usize,
}
