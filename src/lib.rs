mod analysis;
mod cities;
mod config;
mod error;
mod presentation;
mod rain_archive;
mod types;
mod weather_data;

pub use error::RainDayError;
pub use rain_archive::*;

pub use config::{ArchiveConfig, ConfigError, RainDayConfig, CITY_LIST_ENV, DATA_DIR_ENV};

pub use analysis::aggregate::aggregate;
pub use analysis::bootstrap::{
    compare, BootstrapResult, GroupSamples, PointEstimate, DEFAULT_ITERATIONS,
};
pub use analysis::error::AnalysisError;
pub use analysis::params::{analyze, AnalysisParams, RainDayAnalysis};
pub use analysis::welch::{welch_t_test, WelchTest};

pub use cities::city_locator::CityLocator;
pub use cities::error::CityLookupError;

pub use types::city::{City, LatLon};
pub use types::observation::{is_weekend, DailyLabel, HourlyObservation};
pub use types::precipitation_frame::*;

pub use presentation::charts::*;
pub use presentation::render;
pub use presentation::summary::SummaryView;

pub use weather_data::error::WeatherDataError;
