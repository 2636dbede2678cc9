//! Helper functions: error type and mesh builders.

use print_types::TriangleMesh;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("fixture error: {0}")]
    Fixture(String),
}

// ── Mesh Builders ───────────────────────────────────────────────────────────

/// Flat triangle strip along +X with exactly `triangles` triangles.
pub fn strip_mesh(triangles: usize) -> TriangleMesh {
    let columns = triangles / 2 + 1;
    let mut vertices = Vec::with_capacity((columns + 1) * 2 * 3);
    for i in 0..=columns {
        let x = i as f32;
        vertices.extend_from_slice(&[x, 0.0, 0.0, x, 1.0, 0.0]);
    }

    let mut indices = Vec::with_capacity(triangles * 3);
    for t in 0..triangles {
        let col = (t / 2) as u32;
        let (a, b, c, d) = (2 * col, 2 * col + 1, 2 * col + 2, 2 * col + 3);
        if t % 2 == 0 {
            indices.extend_from_slice(&[a, c, b]);
        } else {
            indices.extend_from_slice(&[b, c, d]);
        }
    }

    TriangleMesh {
        vertices,
        normals: Vec::new(),
        indices,
    }
}
