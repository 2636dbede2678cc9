use serde::{Deserialize, Serialize};

/// Why a capability probe produced no answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbeError {
    #[error("capability not supported: {capability}")]
    Unsupported { capability: String },

    #[error("probe failed: {reason}")]
    Failed { reason: String },
}

impl ProbeError {
    pub fn unsupported(capability: &str) -> Self {
        ProbeError::Unsupported {
            capability: capability.to_string(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        ProbeError::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, ProbeError::Unsupported { .. })
    }
}

/// Errors building kernel geometry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeometryError {
    #[error("failed to build {shape}: {reason}")]
    Construction { shape: &'static str, reason: String },

    #[error("tessellation produced no triangles")]
    EmptyTessellation,
}

/// Result of intersecting two solids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// Volume of the common region.
    pub volume: f64,
}

impl Intersection {
    /// A touching contact or degenerate result rather than real overlap.
    pub fn is_null(&self, epsilon: f64) -> bool {
        !(self.volume > epsilon)
    }
}

/// Open boundary edges, reported either as a predicate or as a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenEdges {
    Flag(bool),
    Edges(Vec<u64>),
}

impl OpenEdges {
    /// True when any open edge exists.
    pub fn any(&self) -> bool {
        match self {
            OpenEdges::Flag(b) => *b,
            OpenEdges::Edges(edges) => !edges.is_empty(),
        }
    }
}
