use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to list cache directory '{0}'")]
    CacheDirRead(PathBuf, #[source] std::io::Error),

    // Errors during CSV cache writing (inside blocking task)
    #[error("I/O error writing CSV cache file '{0}'")]
    CsvWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing CSV cache file '{0}'")]
    CsvWritePolars(PathBuf, #[source] PolarsError),

    #[error("Failed to scan CSV cache file '{0}'")]
    CsvScan(PathBuf, #[source] PolarsError),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode archive response for city '{city}'")]
    ResponseDecode {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Archive response for city '{city}' has {times} timestamps but {values} precipitation values")]
    LengthMismatch {
        city: String,
        times: usize,
        values: usize,
    },

    #[error("Malformed timestamp '{value}' in archive response for city '{city}'")]
    MalformedTimestamp {
        city: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),
}
