//! CLI error type.

use std::path::PathBuf;

use ktxarray::array::ArrayError;
use ktxarray::capacity::CapacityError;
use ktxarray::config::ConfigError;
use ktxarray::container::Ktx2Error;
use ktxarray::logging::LoggingError;
use thiserror::Error;

/// Errors surfaced to the user by `main`.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: Ktx2Error,
    },

    #[error("Assembly failed: {0}")]
    Assembly(#[from] ArrayError),

    #[error("{0}")]
    Capacity(#[from] CapacityError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
