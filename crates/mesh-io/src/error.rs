use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MeshIoError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid STL content: {message}")]
    InvalidContent { message: String },

    #[error("truncated binary STL: header declares {expected} triangles, found {got}")]
    Truncated { expected: u32, got: u32 },

    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("index {index} out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

impl MeshIoError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        MeshIoError::InvalidContent {
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshIoError::Io {
            path: path.into(),
            source,
        }
    }
}
