//! MockPart / MockAssembly: deterministic test doubles implementing the
//! capability traits.
//!
//! Parts are axis-aligned boxes, so intersections and distances have exact
//! closed forms. Each capability can be removed (accessor answers `None`)
//! or made to fail (methods answer [`ProbeError::Failed`]).

use std::any::Any;
use std::collections::HashSet;

use print_types::{BoundingBox, ObjectId};

use crate::traits::*;
use crate::types::{Intersection, OpenEdges, ProbeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The whole bounds provider (affects both variants).
    Bounds,
    /// Only the resolve-then-measure variant.
    ResolvedBounds,
    Manifoldness,
    OpenEdges,
    Intersection,
    Distance,
    Faces,
}

/// A face with an optional computed normal and an optional stored one.
#[derive(Debug, Clone, PartialEq)]
pub struct MockFace {
    computed: Option<[f64; 3]>,
    stored: Option<[f64; 3]>,
    fails: bool,
}

impl MockFace {
    /// Face whose `normal_at` method answers.
    pub fn computed(normal: [f64; 3]) -> Self {
        Self {
            computed: Some(normal),
            stored: None,
            fails: false,
        }
    }

    /// Face with only a stored normal.
    pub fn stored(normal: [f64; 3]) -> Self {
        Self {
            computed: None,
            stored: Some(normal),
            fails: false,
        }
    }

    /// Face whose normal evaluation errors.
    pub fn failing() -> Self {
        Self {
            computed: None,
            stored: None,
            fails: true,
        }
    }

    pub fn with_stored(mut self, normal: [f64; 3]) -> Self {
        self.stored = Some(normal);
        self
    }
}

impl FaceNormal for MockFace {
    fn normal_at(&self) -> Result<[f64; 3], ProbeError> {
        if self.fails {
            return Err(ProbeError::failed("normal evaluation failed"));
        }
        self.computed
            .ok_or_else(|| ProbeError::unsupported("normal_at"))
    }

    fn stored_normal(&self) -> Option<[f64; 3]> {
        self.stored
    }
}

/// Axis-aligned box part.
///
/// A clone is a distinct object with a fresh [`ObjectId`]; models attached
/// to the original do not follow it.
#[derive(Debug)]
pub struct MockPart {
    id: ObjectId,
    name: Option<String>,
    min: [f64; 3],
    max: [f64; 3],
    valid: bool,
    closed: bool,
    open_edges: Vec<u64>,
    faces: Vec<MockFace>,
    disabled: HashSet<Capability>,
    failing: HashSet<Capability>,
}

impl Clone for MockPart {
    fn clone(&self) -> Self {
        Self {
            id: ObjectId::fresh(),
            name: self.name.clone(),
            min: self.min,
            max: self.max,
            valid: self.valid,
            closed: self.closed,
            open_edges: self.open_edges.clone(),
            faces: self.faces.clone(),
            disabled: self.disabled.clone(),
            failing: self.failing.clone(),
        }
    }
}

impl MockPart {
    /// Box spanning `min..max` with six planar faces, valid and closed.
    pub fn cuboid(min: [f64; 3], max: [f64; 3]) -> Self {
        let faces = [
            [0.0, 0.0, -1.0],
            [0.0, 0.0, 1.0],
            [0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
        ]
        .into_iter()
        .map(MockFace::computed)
        .collect();

        Self {
            id: ObjectId::fresh(),
            name: None,
            min,
            max,
            valid: true,
            closed: true,
            open_edges: Vec::new(),
            faces,
            disabled: HashSet::new(),
            failing: HashSet::new(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_validity(mut self, valid: bool, closed: bool) -> Self {
        self.valid = valid;
        self.closed = closed;
        self
    }

    pub fn with_open_edges(mut self, edges: Vec<u64>) -> Self {
        self.open_edges = edges;
        self
    }

    pub fn with_faces(mut self, faces: Vec<MockFace>) -> Self {
        self.faces = faces;
        self
    }

    pub fn without(mut self, capability: Capability) -> Self {
        self.disabled.insert(capability);
        self
    }

    pub fn failing(mut self, capability: Capability) -> Self {
        self.failing.insert(capability);
        self
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }

    fn has(&self, capability: Capability) -> bool {
        !self.disabled.contains(&capability)
    }

    fn check(&self, capability: Capability) -> Result<(), ProbeError> {
        if self.failing.contains(&capability) {
            Err(ProbeError::failed(format!("{capability:?} probe failed")))
        } else {
            Ok(())
        }
    }

    fn other_part<'a>(other: &'a dyn CadObject) -> Result<&'a MockPart, ProbeError> {
        other
            .as_any()
            .downcast_ref::<MockPart>()
            .ok_or_else(|| ProbeError::failed("other object is not a mock part"))
    }
}

impl CadObject for MockPart {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("mock#{}", self.id.0),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn bounds_provider(&self) -> Option<&dyn BoundsProvider> {
        self.has(Capability::Bounds).then_some(self as &dyn BoundsProvider)
    }

    fn manifoldness_probe(&self) -> Option<&dyn ManifoldnessProbe> {
        self.has(Capability::Manifoldness)
            .then_some(self as &dyn ManifoldnessProbe)
    }

    fn open_edge_probe(&self) -> Option<&dyn OpenEdgeProbe> {
        self.has(Capability::OpenEdges)
            .then_some(self as &dyn OpenEdgeProbe)
    }

    fn intersection_probe(&self) -> Option<&dyn IntersectionProbe> {
        self.has(Capability::Intersection)
            .then_some(self as &dyn IntersectionProbe)
    }

    fn distance_probe(&self) -> Option<&dyn DistanceProbe> {
        self.has(Capability::Distance)
            .then_some(self as &dyn DistanceProbe)
    }

    fn face_provider(&self) -> Option<&dyn FaceProvider> {
        self.has(Capability::Faces).then_some(self as &dyn FaceProvider)
    }
}

impl BoundsProvider for MockPart {
    fn resolved_bounding_box(&self) -> Result<BoundingBox, ProbeError> {
        if !self.has(Capability::ResolvedBounds) {
            return Err(ProbeError::unsupported("resolved_bounding_box"));
        }
        self.check(Capability::ResolvedBounds)?;
        self.check(Capability::Bounds)?;
        Ok(self.bbox())
    }

    fn bounding_box(&self) -> Result<BoundingBox, ProbeError> {
        self.check(Capability::Bounds)?;
        Ok(self.bbox())
    }
}

impl ManifoldnessProbe for MockPart {
    fn is_valid(&self) -> Result<bool, ProbeError> {
        self.check(Capability::Manifoldness)?;
        Ok(self.valid)
    }

    fn is_closed(&self) -> Result<bool, ProbeError> {
        self.check(Capability::Manifoldness)?;
        Ok(self.closed)
    }
}

impl OpenEdgeProbe for MockPart {
    fn open_edges(&self) -> Result<OpenEdges, ProbeError> {
        self.check(Capability::OpenEdges)?;
        Ok(OpenEdges::Edges(self.open_edges.clone()))
    }
}

impl IntersectionProbe for MockPart {
    fn intersect(&self, other: &dyn CadObject) -> Result<Option<Intersection>, ProbeError> {
        self.check(Capability::Intersection)?;
        let other = Self::other_part(other)?;
        let mut volume = 1.0;
        for i in 0..3 {
            let overlap = self.max[i].min(other.max[i]) - self.min[i].max(other.min[i]);
            if overlap < 0.0 {
                return Ok(None);
            }
            volume *= overlap;
        }
        Ok(Some(Intersection { volume }))
    }
}

impl DistanceProbe for MockPart {
    fn distance_to(&self, other: &dyn CadObject) -> Result<f64, ProbeError> {
        self.check(Capability::Distance)?;
        let other = Self::other_part(other)?;
        let mut sum = 0.0;
        for i in 0..3 {
            let gap = (other.min[i] - self.max[i])
                .max(self.min[i] - other.max[i])
                .max(0.0);
            sum += gap * gap;
        }
        Ok(sum.sqrt())
    }
}

impl FaceProvider for MockPart {
    fn faces(&self) -> Result<Vec<Box<dyn FaceNormal + '_>>, ProbeError> {
        self.check(Capability::Faces)?;
        Ok(self
            .faces
            .iter()
            .map(|f| Box::new(f.clone()) as Box<dyn FaceNormal>)
            .collect())
    }
}

/// Group of mock parts exposing them as solids (or only as children).
#[derive(Debug)]
pub struct MockAssembly {
    id: ObjectId,
    parts: Vec<MockPart>,
    children_only: bool,
}

impl Clone for MockAssembly {
    fn clone(&self) -> Self {
        Self {
            id: ObjectId::fresh(),
            parts: self.parts.clone(),
            children_only: self.children_only,
        }
    }
}

impl MockAssembly {
    pub fn new(parts: Vec<MockPart>) -> Self {
        Self {
            id: ObjectId::fresh(),
            parts,
            children_only: false,
        }
    }

    /// Answer `solids()` with unsupported so callers fall back to `children()`.
    pub fn children_only(mut self) -> Self {
        self.children_only = true;
        self
    }

    pub fn parts(&self) -> &[MockPart] {
        &self.parts
    }
}

impl CadObject for MockAssembly {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn label(&self) -> String {
        format!("mock-assembly#{}", self.id.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn bounds_provider(&self) -> Option<&dyn BoundsProvider> {
        Some(self)
    }

    fn solid_enumerator(&self) -> Option<&dyn SolidEnumerator> {
        Some(self)
    }
}

impl BoundsProvider for MockAssembly {
    fn bounding_box(&self) -> Result<BoundingBox, ProbeError> {
        self.parts
            .iter()
            .map(MockPart::bbox)
            .reduce(|a, b| a.union(&b))
            .ok_or_else(|| ProbeError::failed("empty assembly"))
    }
}

impl SolidEnumerator for MockAssembly {
    fn solids(&self) -> Result<Vec<&dyn CadObject>, ProbeError> {
        if self.children_only {
            return Err(ProbeError::unsupported("solids"));
        }
        Ok(self.parts.iter().map(|p| p as &dyn CadObject).collect())
    }

    fn children(&self) -> Result<Vec<&dyn CadObject>, ProbeError> {
        Ok(self.parts.iter().map(|p| p as &dyn CadObject).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        let a = MockPart::cuboid([0.0; 3], [1.0; 3]);
        let b = MockPart::cuboid([0.0; 3], [1.0; 3]);
        assert_ne!(a.object_id(), b.object_id());
    }

    #[test]
    fn clones_get_their_own_identity() {
        let part = MockPart::cuboid([0.0; 3], [1.0; 3]).named("orig");
        let copy = part.clone();
        assert_ne!(part.object_id(), copy.object_id());
        assert_eq!(copy.label(), part.label());

        let assembly = MockAssembly::new(vec![part]);
        let copy = assembly.clone();
        assert_ne!(assembly.object_id(), copy.object_id());
        assert_ne!(assembly.parts()[0].object_id(), copy.parts()[0].object_id());
    }

    #[test]
    fn overlap_volume() {
        let a = MockPart::cuboid([0.0; 3], [2.0; 3]);
        let b = MockPart::cuboid([1.0; 3], [3.0; 3]);
        let common = a.intersect(&b).unwrap().unwrap();
        assert!((common.volume - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gap_distance_is_euclidean() {
        let a = MockPart::cuboid([0.0; 3], [1.0; 3]);
        let b = MockPart::cuboid([4.0, 5.0, 0.0], [5.0, 6.0, 1.0]);
        assert!((a.distance_to(&b).unwrap() - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn disabled_capability_has_no_accessor() {
        let part = MockPart::cuboid([0.0; 3], [1.0; 3]).without(Capability::Distance);
        assert!(part.distance_probe().is_none());
        assert!(part.intersection_probe().is_some());
    }

    #[test]
    fn assembly_bounds_union() {
        let asm = MockAssembly::new(vec![
            MockPart::cuboid([0.0; 3], [1.0; 3]),
            MockPart::cuboid([2.0; 3], [3.0, 4.0, 5.0]),
        ]);
        let bb = asm.bounding_box().unwrap();
        assert_eq!(bb.min, [0.0; 3]);
        assert_eq!(bb.max, [3.0, 4.0, 5.0]);
    }
}
