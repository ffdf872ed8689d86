use std::time::Duration;

use crate::output::EXPORT_FILE_NAME;

pub const DEFAULT_SOURCE: &str = "combined_delhi_aqi_from_graphs1.csv";
pub const DEFAULT_LOG_FILE: &str = "logs/ncr_aqi.log";
const DEFAULT_LIVE_INTERVAL_SECS: u64 = 5;

/// Runtime settings, read from the environment (after `.env` is loaded).
///
/// | Variable                     | Default                                |
/// |------------------------------|----------------------------------------|
/// | `NCR_AQI_SOURCE`             | `combined_delhi_aqi_from_graphs1.csv`  |
/// | `NCR_AQI_EXPORT_PATH`        | `delhi_ncr_air_quality_data.csv`       |
/// | `NCR_AQI_LIVE_INTERVAL_SECS` | `5`                                    |
/// | `LOG_FILE_PATH`              | `logs/ncr_aqi.log`                     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: String,
    pub export_path: String,
    pub live_interval: Duration,
    pub log_file_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset, empty, or
    /// unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let live_secs = get("NCR_AQI_LIVE_INTERVAL_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_LIVE_INTERVAL_SECS);

        Self {
            source: get("NCR_AQI_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            export_path: get("NCR_AQI_EXPORT_PATH")
                .unwrap_or_else(|| EXPORT_FILE_NAME.to_string()),
            live_interval: Duration::from_secs(live_secs),
            log_file_path: get("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
