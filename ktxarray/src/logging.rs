//! Logging setup.
//!
//! The library only emits `tracing` events; binaries call [`init_logging`]
//! once at startup to install a subscriber. Console output goes to stderr
//! so machine-readable command output on stdout stays clean. An optional
//! log file receives the same events without ANSI colours, written from a
//! background thread.
//!
//! The filter is taken from `RUST_LOG` when set, otherwise from the
//! requested default level for the `ktxarray` targets.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "ktxarray=info";

/// Filter used for verbose output.
pub const VERBOSE_FILTER: &str = "ktxarray=debug";

/// Errors installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file's directory could not be created.
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file path has no file name.
    #[error("Invalid log file path: {0}")]
    InvalidPath(PathBuf),

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Keeps the background log writer alive.
///
/// Dropping the guard flushes buffered file output; hold it until exit.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// # Arguments
///
/// * `verbose` - Use debug level for `ktxarray` targets when `RUST_LOG` is unset
/// * `log_file` - Optional file to mirror events into
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<LoggingGuard, LoggingError> {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    if let Some(path) = log_file {
        tracing::debug!(path = %path.display(), "Logging to file");
    }

    Ok(LoggingGuard { _file: guard })
}

fn file_writer(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard), LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_creates_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("ktxarray.log");

        let (_writer, _guard) = file_writer(&path).unwrap();
        assert!(temp.path().join("logs").is_dir());
    }

    #[test]
    fn test_file_writer_rejects_directory_path() {
        assert!(matches!(
            file_writer(Path::new("/")),
            Err(LoggingError::InvalidPath(_))
        ));
    }
}
