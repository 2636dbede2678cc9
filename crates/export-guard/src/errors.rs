use std::path::PathBuf;

use mesh_io::MeshIoError;
use print_rules::ValidationError;

/// Failure inside an underlying export backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("format {format} is not supported by this backend")]
    UnsupportedFormat { format: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mesh error: {0}")]
    Mesh(#[from] MeshIoError),

    #[error("kernel error: {0}")]
    Kernel(String),
}

/// Result of a guarded export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("export failed: {0}")]
    Backend(#[from] BackendError),

    #[error("could not verify written mesh {path}: {source}")]
    MeshReload {
        path: PathBuf,
        #[source]
        source: MeshIoError,
    },
}

impl ExportError {
    /// Violation messages when the export was rejected by validation.
    pub fn messages(&self) -> Option<&[String]> {
        match self {
            ExportError::Validation(e) => Some(&e.messages),
            _ => None,
        }
    }
}

/// Failure installing a log subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
