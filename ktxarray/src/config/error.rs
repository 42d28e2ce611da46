//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::capacity::CapacityError;

/// Errors loading, validating or saving `config.ini`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A known key holds a value of the wrong type or range.
    #[error("Invalid value '{value}' for {section}.{key}: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// `section.key` does not name a setting.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Values parsed but do not form a usable capacity model.
    #[error("Invalid capacity settings: {0}")]
    Capacity(#[from] CapacityError),
}
