use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use bondsite_core::constants::DEFAULT_DATASET_PAGE_URL;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 24 * 60 * 60;

pub struct Config {
    pub cache_path: PathBuf,
    pub log_level: String,
    pub log_format: String,
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub dataset_page_url: String,
    pub refresh_interval: Duration,
    /// Options that could not be parsed and fell back to their default.
    /// Reported once logging is up.
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let cache_path = lookup("BS_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".cache"));
        let log_level = lookup("BS_LOG_LEVEL").unwrap_or_else(|| "DEBUG".into());
        let log_format = lookup("BS_LOG_FORMAT").unwrap_or_else(|| "text".into());
        let listen_addr = parse_or(
            &lookup,
            "BS_LISTEN_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 8080)),
            DEFAULT_LISTEN_ADDR,
            &mut warnings,
        );
        let cors_allow = lookup("BS_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_or(
            &lookup,
            "BS_REQUEST_TIMEOUT_MS",
            DEFAULT_REQUEST_TIMEOUT_MS,
            "30000",
            &mut warnings,
        );
        let dataset_page_url =
            lookup("BS_DATASET_PAGE_URL").unwrap_or_else(|| DEFAULT_DATASET_PAGE_URL.into());
        let refresh_secs: u64 = parse_or(
            &lookup,
            "BS_REFRESH_INTERVAL_SECS",
            DEFAULT_REFRESH_INTERVAL_SECS,
            "86400",
            &mut warnings,
        );

        Self {
            cache_path,
            log_level,
            log_format,
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            dataset_page_url,
            refresh_interval: Duration::from_secs(refresh_secs.max(1)),
            warnings,
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    default_text: &str,
    warnings: &mut Vec<String>,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warnings.push(format!(
                    "Invalid {}='{}', using default {}",
                    key, raw, default_text
                ));
                default
            }
        },
    }
}
