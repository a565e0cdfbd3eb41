//! Runtime configuration: dataset location and upstream endpoints.
//!
//! Configuration comes from explicit arguments first, then environment
//! variables, then built-in defaults. Tests should build an
//! [`UpstreamConfig`] directly instead of mutating the process environment so
//! they can run in parallel.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default filename of the local indicator table.
pub const DATASET_FILENAME: &str = "world_bank_indicators.csv";

/// Environment variable overriding the dataset file path.
pub const DATA_FILE_ENV: &str = "WORLDBANK_DATA_FILE";
/// Environment variable overriding the country-profile API base URL.
pub const REST_COUNTRIES_URL_ENV: &str = "WORLDBANK_REST_COUNTRIES_URL";
/// Environment variable overriding the indicator API base URL.
pub const WORLD_BANK_URL_ENV: &str = "WORLDBANK_API_URL";
/// Environment variable overriding the per-request timeout, in seconds.
pub const HTTP_TIMEOUT_ENV: &str = "WORLDBANK_HTTP_TIMEOUT_SECS";

pub const DEFAULT_REST_COUNTRIES_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_WORLD_BANK_URL: &str = "https://api.worldbank.org/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoints and limits for the two upstream HTTP services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Base URL of the country-profile API (`{base}/alpha/{code}`).
    pub rest_countries_url: String,
    /// Base URL of the indicator API (`{base}/country/{code}/indicator/{id}`).
    pub world_bank_url: String,
    /// Timeout applied independently to every outbound request.
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            rest_countries_url: DEFAULT_REST_COUNTRIES_URL.to_string(),
            world_bank_url: DEFAULT_WORLD_BANK_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl UpstreamConfig {
    /// Build the configuration from environment overrides, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var(REST_COUNTRIES_URL_ENV) {
            config.rest_countries_url = url;
        }
        if let Ok(url) = env::var(WORLD_BANK_URL_ENV) {
            config.world_bank_url = url;
        }
        if let Ok(raw) = env::var(HTTP_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(
                    value = %raw,
                    "ignoring invalid {HTTP_TIMEOUT_ENV}; using default timeout"
                ),
            }
        }

        config
    }

    /// Same endpoints with a different timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "worldbank", "worldbank-gateway")
        .ok_or(Error::DataDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Resolve which dataset file to load.
///
/// Order (highest to lowest priority):
/// 1. `explicit` (the CLI `--data-file` flag)
/// 2. `WORLDBANK_DATA_FILE` environment variable
/// 3. The platform data directory, if the file exists there
/// 4. `data/world_bank_indicators.csv` relative to the working directory
///
/// The returned path is not checked for existence; loading reports
/// [`Error::DataUnavailable`] when it is missing.
pub fn resolve_dataset_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(env_path) = env::var_os(DATA_FILE_ENV) {
        return PathBuf::from(env_path);
    }

    match default_dataset_path() {
        Ok(path) if path.exists() => return path,
        Ok(path) => debug!(path = %path.display(), "no dataset in platform data directory"),
        Err(err) => debug!(error = %err, "platform data directory unavailable"),
    }

    Path::new("data").join(DATASET_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_apis() {
        let config = UpstreamConfig::default();
        assert_eq!(config.rest_countries_url, DEFAULT_REST_COUNTRIES_URL);
        assert_eq!(config.world_bank_url, DEFAULT_WORLD_BANK_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn explicit_dataset_path_wins() {
        let path = resolve_dataset_path(Some(Path::new("/tmp/custom.csv")));
        assert_eq!(path, PathBuf::from("/tmp/custom.csv"));
    }

    #[test]
    fn with_timeout_keeps_endpoints() {
        let config = UpstreamConfig::default().with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.world_bank_url, DEFAULT_WORLD_BANK_URL);
    }
}
