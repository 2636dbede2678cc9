//! Subscriber setup for binaries and tests embedding the guard.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::errors::LoggingError;

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "PRINT_GUARD_LOG";

/// Log file name used by callers that do not pick their own.
pub const DEFAULT_LOG_FILE: &str = "print-guard.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a stderr subscriber filtered by `PRINT_GUARD_LOG` (default `info`).
pub fn init_logging() -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

/// Install a subscriber appending plain-text records to `path`.
pub fn init_file_logging(path: impl AsRef<Path>) -> Result<(), LoggingError> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
