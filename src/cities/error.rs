use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CityLookupError {
    #[error("Location not found for city: {city}")]
    LocationNotFound { city: String },

    #[error("Failed to read city list '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("City list '{path}' is missing column '{column}'")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
        #[source]
        source: PolarsError,
    },
}
