//! Options for the validation orchestrator.

use serde::{Deserialize, Serialize};

use cad_probe::{BUILD_DIRECTION, NULL_VOLUME_EPSILON};

/// Parameters for live measurements taken during export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Build axis used for overhang angles.
    pub build_direction: [f64; 3],
    /// Chordal tolerance the export backend tessellates with.
    pub tessellation_tolerance: f64,
    /// Intersections at or below this volume count as touching.
    pub null_volume_epsilon: f64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            build_direction: BUILD_DIRECTION,
            tessellation_tolerance: 0.05,
            null_volume_epsilon: NULL_VOLUME_EPSILON,
        }
    }
}

impl ValidationOptions {
    /// Finer tessellation for small parts.
    pub fn fine() -> Self {
        Self {
            tessellation_tolerance: 0.01,
            ..Self::default()
        }
    }

    pub fn with_build_direction(mut self, direction: [f64; 3]) -> Self {
        self.build_direction = direction;
        self
    }

    pub fn with_tessellation_tolerance(mut self, tolerance: f64) -> Self {
        self.tessellation_tolerance = tolerance;
        self
    }

    pub fn with_null_volume_epsilon(mut self, epsilon: f64) -> Self {
        self.null_volume_epsilon = epsilon;
        self
    }
}
