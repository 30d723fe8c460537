//! Concrete dataset collaborators talking to the outside world.

mod gov_pl;
mod http_downloader;

pub use gov_pl::{find_date, parse_dataset_page, GovPlDatasetInfoProvider};
pub use http_downloader::HttpDatasetDownloader;
