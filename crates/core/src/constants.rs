/// Metadata file holding the last discovered dataset info
pub const DATASET_INFO_FILE: &str = "ds.json";

/// Downloaded dataset payload
pub const DATASET_FILE: &str = "ds.xls";

/// Suffix of the in-flight download next to the dataset file
pub const PARTIAL_DOWNLOAD_SUFFIX: &str = ".part";

/// Dataset info older than this many months (by publication date) is refetched
pub const STALE_AFTER_MONTHS: u32 = 2;

/// Public page listing the retail bond dataset
pub const DEFAULT_DATASET_PAGE_URL: &str =
    "https://www.gov.pl/web/finanse/dane-dotyczace-obligacji-detalicznych";
