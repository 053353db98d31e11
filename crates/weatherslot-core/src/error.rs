//! Core error types for weatherslot-core.
//!
//! Degraded data (a bad schedule row, a malformed forecast sample, an empty
//! forecast) is never reported through these types; it is recovered locally
//! and shows up as a missing match. Errors here cover file-level failures and
//! contract violations.

use std::path::PathBuf;
use thiserror::Error;

use crate::schedule::EntryError;

/// Core error type for weatherslot-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Schedule loading/exporting errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Forecast payload or series errors
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP errors from the forecast provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed provider URL
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Schedule-source errors. Per-row problems are [`EntryError`]s carried by
/// the record itself; these only fire for whole-file problems or strict checks.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Failed to read or write the schedule file
    #[error("Failed to access schedule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON
    #[error("Invalid schedule JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is not valid CSV
    #[error("Invalid schedule CSV: {0}")]
    Csv(#[from] csv::Error),

    /// JSON document lacks the top-level `schedule` array
    #[error("Schedule JSON must contain a 'schedule' key")]
    MissingScheduleKey,

    /// File extension is neither `.json` nor `.csv`
    #[error("Unsupported schedule format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Strict validation found a bad row
    #[error("Invalid entry at row {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: EntryError,
    },

    /// Nothing to export
    #[error("Schedule is empty")]
    Empty,
}

/// Forecast errors.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Hourly samples are not in ascending time order
    #[error("Hourly forecast is not sorted: sample {index} at {next} is earlier than {previous}")]
    Unsorted {
        index: usize,
        previous: String,
        next: String,
    },

    /// Payload shape is unusable (neither record nor columnar form)
    #[error("Unrecognized forecast payload: {0}")]
    Payload(String),

    /// Geocoding returned no result
    #[error("Location '{0}' was not found")]
    LocationNotFound(String),

    /// Provider answered with a non-success status
    #[error("Forecast provider error (HTTP {status}): {body}")]
    Provider { status: u16, body: String },

    /// No forecast could be obtained or loaded
    #[error("No forecast available")]
    Unavailable,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Thresholds that must be ordered are not
    #[error("Threshold '{lower}' ({lower_value}) must not exceed '{upper}' ({upper_value})")]
    UnorderedThresholds {
        lower: &'static str,
        lower_value: f64,
        upper: &'static str,
        upper_value: f64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
