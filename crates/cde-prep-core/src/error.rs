//! Error types for cde-prep-core.
//!
//! Each layer reports its own error type. The CLI boxes whichever it gets.

use std::path::PathBuf;
use thiserror::Error;

/// A string that is not a `HH:MM` wall-clock time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time of day '{input}': {reason}")]
pub struct TimeParseError {
    pub input: String,
    pub reason: &'static str,
}

/// Form validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was blank
    #[error("Please enter {0}")]
    MissingField(&'static str),

    /// Event time present but not a valid time of day
    #[error(transparent)]
    InvalidTime(#[from] TimeParseError),

    /// Numeric field could not be parsed (strict mode only)
    #[error("Invalid value for '{field}': '{value}' is not a whole number of minutes")]
    InvalidNumber { field: &'static str, value: String },
}

/// Calendar export errors.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Base endpoint is not an absolute URL
    #[error("Invalid calendar endpoint '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The wall-clock time is skipped on that date (DST gap)
    #[error("{time} does not exist on {date} in the local timezone")]
    NonexistentLocalTime {
        date: chrono::NaiveDate,
        time: crate::TimeOfDay,
    },
}

/// Offline shell errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// Origin is not an absolute URL
    #[error("Invalid shell origin '{0}'")]
    InvalidOrigin(String),

    /// Operation requires an installed worker
    #[error("Offline shell is not installed")]
    NotInstalled,

    /// Installed worker is waiting for a skip-waiting message
    #[error("Offline shell is waiting to activate")]
    Waiting,

    /// A precache asset could not be fetched during install
    #[error("Failed to precache '{url}': {message}")]
    PrecacheFailed { url: String, message: String },

    /// Network layer failure
    #[error("Network request to '{url}' failed: {message}")]
    Network { url: String, message: String },
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

    /// Key does not name a configuration field
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}
