use serde::{Deserialize, Serialize};

use crate::axis::Axis;

/// Axis-aligned bounding box in model units (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f64; 3]>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first, first);
        for p in iter {
            bbox.include(p);
        }
        Some(bbox)
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: [f64; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    pub fn xlen(&self) -> f64 {
        self.extent(Axis::X)
    }

    pub fn ylen(&self) -> f64 {
        self.extent(Axis::Y)
    }

    pub fn zlen(&self) -> f64 {
        self.extent(Axis::Z)
    }

    /// Length of the box along one axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        let i = axis.index();
        self.max[i] - self.min[i]
    }

    /// `(axis, length)` for X, Y and Z, in that order.
    pub fn extents(&self) -> [(Axis, f64); 3] {
        Axis::ALL.map(|axis| (axis, self.extent(axis)))
    }
}
