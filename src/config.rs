//! Runtime configuration: where the cache and city list live, which archive period to
//! download, and the default analysis parameters.

use crate::analysis::params::AnalysisParams;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding [`RainDayConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "RAINDAY_DATA_DIR";
/// Environment variable overriding [`RainDayConfig::city_list`].
pub const CITY_LIST_ENV: &str = "RAINDAY_CITY_LIST";

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Subdirectory of the system cache directory used when no data directory is set.
const CACHE_DIR_NAME: &str = "rainday_weather_data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Could not determine the system cache directory; set `data_dir` or {DATA_DIR_ENV}")]
    CacheDirResolution,

    #[error("Archive period is empty: start {start} is after end {end}")]
    EmptyPeriod { start: NaiveDate, end: NaiveDate },
}

/// Top-level configuration.
///
/// Every field has a default, so an empty TOML file (or none at all) is valid.
///
/// ```
/// use rainday::RainDayConfig;
///
/// let config: RainDayConfig = toml::from_str(r#"
///     city_list = "data/cities.csv"
///
///     [archive]
///     timezone = "Europe/Berlin"
///
///     [analysis]
///     rain_threshold = 0.2
///     selected_months = [6, 7, 8]
/// "#).unwrap();
/// assert_eq!(config.archive.timezone, "Europe/Berlin");
/// assert_eq!(config.analysis.min_rainy_hours, 1);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RainDayConfig {
    /// Directory holding the per-city CSV caches. Defaults to the system cache directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// CSV file with `label`, `latitude`, `longitude` columns.
    #[serde(default = "default_city_list")]
    pub city_list: PathBuf,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub analysis: AnalysisParams,
}

/// The archive period and endpoint to download on a cache miss.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    #[serde(default = "default_archive_url")]
    pub base_url: String,
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
    /// IANA timezone the hourly timestamps are expressed in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_city_list() -> PathBuf {
    PathBuf::from("cities.csv")
}
fn default_archive_url() -> String {
    DEFAULT_ARCHIVE_URL.to_string()
}
fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1980, 1, 1).unwrap_or_default()
}
fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap_or_default()
}
fn default_timezone() -> String {
    "Europe/Paris".to_string()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_archive_url(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            timezone: default_timezone(),
        }
    }
}

impl Default for RainDayConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            city_list: default_city_list(),
            archive: ArchiveConfig::default(),
            analysis: AnalysisParams::default(),
        }
    }
}

impl RainDayConfig {
    /// Reads `path` if given (defaults otherwise), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)
                    .map_err(|e| ConfigError::Read(p.to_path_buf(), e))?;
                toml::from_str(&text).map_err(|e| ConfigError::Parse(p.to_path_buf(), e))?
            }
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(list) = std::env::var(CITY_LIST_ENV) {
            self.city_list = PathBuf::from(list);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.archive.start_date > self.archive.end_date {
            return Err(ConfigError::EmptyPeriod {
                start: self.archive.start_date,
                end: self.archive.end_date,
            });
        }
        Ok(())
    }

    /// The configured cache directory, or `rainday_weather_data` under the system
    /// cache directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::cache_dir()
                .map(|p| p.join(CACHE_DIR_NAME))
                .ok_or(ConfigError::CacheDirResolution),
        }
    }
}
