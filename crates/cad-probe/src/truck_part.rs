//! Capability adapter over truck B-rep solids.
//!
//! Bounds, manifoldness, open edges, intersections and face normals are
//! answered from truck topology and tessellation. truck has no distance
//! query, so parts expose no [`DistanceProbe`].

use std::any::Any;
use std::collections::HashMap;

use print_types::{BoundingBox, ObjectId, TriangleMesh};
use tracing::debug;
use truck_modeling::geometry::Surface;
use truck_modeling::topology::Solid;

use crate::tessellation::{average_normal, tessellate_faces, tessellate_solid};
use crate::traits::*;
use crate::types::{GeometryError, Intersection, OpenEdges, ProbeError};

/// Default chordal tolerance for tessellation.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// How often each edge is used by face boundaries, keyed by first-seen order.
fn edge_usage(solid: &Solid) -> Vec<usize> {
    let mut index = HashMap::new();
    let mut counts: Vec<usize> = Vec::new();
    for shell in solid.boundaries().iter() {
        for face in shell.face_iter() {
            for wire in face.boundaries() {
                for edge in wire.edge_iter() {
                    let i = *index.entry(edge.id()).or_insert_with(|| {
                        counts.push(0);
                        counts.len() - 1
                    });
                    counts[i] += 1;
                }
            }
        }
    }
    counts
}

/// A single truck solid.
///
/// Cloning copies the geometry under a fresh [`ObjectId`].
#[derive(Debug)]
pub struct TruckPart {
    id: ObjectId,
    name: Option<String>,
    solid: Solid,
    tolerance: f64,
}

impl Clone for TruckPart {
    fn clone(&self) -> Self {
        Self {
            id: ObjectId::fresh(),
            name: self.name.clone(),
            solid: self.solid.clone(),
            tolerance: self.tolerance,
        }
    }
}

impl TruckPart {
    pub fn new(solid: Solid) -> Self {
        Self {
            id: ObjectId::fresh(),
            name: None,
            solid,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Merged triangle mesh of the whole solid.
    pub fn mesh(&self, tolerance: f64) -> Result<TriangleMesh, GeometryError> {
        tessellate_solid(&self.solid, tolerance)
    }
}

impl CadObject for TruckPart {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("truck#{}", self.id.0),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn bounds_provider(&self) -> Option<&dyn BoundsProvider> {
        Some(self)
    }

    fn manifoldness_probe(&self) -> Option<&dyn ManifoldnessProbe> {
        Some(self)
    }

    fn open_edge_probe(&self) -> Option<&dyn OpenEdgeProbe> {
        Some(self)
    }

    fn intersection_probe(&self) -> Option<&dyn IntersectionProbe> {
        Some(self)
    }

    fn face_provider(&self) -> Option<&dyn FaceProvider> {
        Some(self)
    }
}

impl BoundsProvider for TruckPart {
    /// Bounds of the tessellated solid, so curved faces count.
    fn resolved_bounding_box(&self) -> Result<BoundingBox, ProbeError> {
        let mesh = self
            .mesh(self.tolerance)
            .map_err(|e| ProbeError::failed(e.to_string()))?;
        mesh.bounding_box()
            .ok_or_else(|| ProbeError::failed("empty tessellation"))
    }

    /// Bounds of the topological vertices.
    fn bounding_box(&self) -> Result<BoundingBox, ProbeError> {
        let points = self.solid.boundaries().iter().flat_map(|shell| {
            shell.vertex_iter().map(|v| {
                let p = v.point();
                [p[0], p[1], p[2]]
            })
        });
        BoundingBox::from_points(points).ok_or_else(|| ProbeError::failed("solid has no vertices"))
    }
}

impl ManifoldnessProbe for TruckPart {
    fn is_valid(&self) -> Result<bool, ProbeError> {
        if self.solid.boundaries().is_empty() {
            return Ok(false);
        }
        Ok(edge_usage(&self.solid).iter().all(|&n| n <= 2))
    }

    fn is_closed(&self) -> Result<bool, ProbeError> {
        Ok(edge_usage(&self.solid).iter().all(|&n| n == 2))
    }
}

impl OpenEdgeProbe for TruckPart {
    fn open_edges(&self) -> Result<OpenEdges, ProbeError> {
        let open = edge_usage(&self.solid)
            .into_iter()
            .enumerate()
            .filter(|(_, n)| *n == 1)
            .map(|(i, _)| i as u64)
            .collect();
        Ok(OpenEdges::Edges(open))
    }
}

impl IntersectionProbe for TruckPart {
    fn intersect(&self, other: &dyn CadObject) -> Result<Option<Intersection>, ProbeError> {
        let other = other
            .as_any()
            .downcast_ref::<TruckPart>()
            .ok_or_else(|| ProbeError::unsupported("intersect with non-truck object"))?;

        let Some(common) = truck_shapeops::and(&self.solid, &other.solid, self.tolerance) else {
            debug!(first = %self.label(), second = %other.label(), "truck and() returned None");
            return Ok(None);
        };
        if common.boundaries().is_empty() {
            return Ok(None);
        }
        let volume = match tessellate_solid(&common, self.tolerance) {
            Ok(mesh) => mesh.volume().abs(),
            Err(GeometryError::EmptyTessellation) => 0.0,
            Err(e) => return Err(ProbeError::failed(e.to_string())),
        };
        Ok(Some(Intersection { volume }))
    }
}

/// Face normal sampled from a truck face.
#[derive(Debug, Clone, Copy)]
struct TruckFace {
    plane_normal: Option<[f64; 3]>,
    mesh_normal: Option<[f64; 3]>,
}

impl FaceNormal for TruckFace {
    fn normal_at(&self) -> Result<[f64; 3], ProbeError> {
        self.plane_normal
            .ok_or_else(|| ProbeError::unsupported("normal_at on non-planar face"))
    }

    fn stored_normal(&self) -> Option<[f64; 3]> {
        self.mesh_normal
    }
}

impl FaceProvider for TruckPart {
    fn faces(&self) -> Result<Vec<Box<dyn FaceNormal + '_>>, ProbeError> {
        let meshes = tessellate_faces(&self.solid, self.tolerance);
        let mut faces: Vec<Box<dyn FaceNormal + '_>> = Vec::new();
        let topo_faces = self.solid.boundaries().iter().flat_map(|shell| shell.face_iter());
        for (face, mesh) in topo_faces.zip(meshes.iter()) {
            let plane_normal = match face.oriented_surface() {
                Surface::Plane(plane) => {
                    let n = plane.normal();
                    Some([n[0], n[1], n[2]])
                }
                _ => None,
            };
            faces.push(Box::new(TruckFace {
                plane_normal,
                mesh_normal: average_normal(mesh),
            }));
        }
        Ok(faces)
    }
}

/// Several truck parts exported together.
#[derive(Debug)]
pub struct TruckAssembly {
    id: ObjectId,
    parts: Vec<TruckPart>,
}

impl Clone for TruckAssembly {
    fn clone(&self) -> Self {
        Self {
            id: ObjectId::fresh(),
            parts: self.parts.clone(),
        }
    }
}

impl TruckAssembly {
    pub fn new(parts: Vec<TruckPart>) -> Self {
        Self {
            id: ObjectId::fresh(),
            parts,
        }
    }

    pub fn parts(&self) -> &[TruckPart] {
        &self.parts
    }

    /// All parts merged into one mesh.
    pub fn mesh(&self, tolerance: f64) -> Result<TriangleMesh, GeometryError> {
        let mut merged = TriangleMesh::default();
        for part in &self.parts {
            merged.append(&part.mesh(tolerance)?);
        }
        if merged.is_empty() {
            return Err(GeometryError::EmptyTessellation);
        }
        Ok(merged)
    }
}

impl CadObject for TruckAssembly {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn label(&self) -> String {
        format!("truck-assembly#{}", self.id.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn bounds_provider(&self) -> Option<&dyn BoundsProvider> {
        Some(self)
    }

    fn manifoldness_probe(&self) -> Option<&dyn ManifoldnessProbe> {
        Some(self)
    }

    fn open_edge_probe(&self) -> Option<&dyn OpenEdgeProbe> {
        Some(self)
    }

    fn solid_enumerator(&self) -> Option<&dyn SolidEnumerator> {
        Some(self)
    }

    fn face_provider(&self) -> Option<&dyn FaceProvider> {
        Some(self)
    }
}

impl BoundsProvider for TruckAssembly {
    fn resolved_bounding_box(&self) -> Result<BoundingBox, ProbeError> {
        union_of(self.parts.iter().map(|p| p.resolved_bounding_box()))
    }

    fn bounding_box(&self) -> Result<BoundingBox, ProbeError> {
        union_of(self.parts.iter().map(|p| p.bounding_box()))
    }
}

fn union_of(
    boxes: impl Iterator<Item = Result<BoundingBox, ProbeError>>,
) -> Result<BoundingBox, ProbeError> {
    let mut acc: Option<BoundingBox> = None;
    for bb in boxes {
        let bb = bb?;
        acc = Some(match acc {
            Some(a) => a.union(&bb),
            None => bb,
        });
    }
    acc.ok_or_else(|| ProbeError::failed("empty assembly"))
}

impl ManifoldnessProbe for TruckAssembly {
    fn is_valid(&self) -> Result<bool, ProbeError> {
        for part in &self.parts {
            if !part.is_valid()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn is_closed(&self) -> Result<bool, ProbeError> {
        for part in &self.parts {
            if !part.is_closed()? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl OpenEdgeProbe for TruckAssembly {
    fn open_edges(&self) -> Result<OpenEdges, ProbeError> {
        for part in &self.parts {
            if part.open_edges()?.any() {
                return Ok(OpenEdges::Flag(true));
            }
        }
        Ok(OpenEdges::Flag(false))
    }
}

impl SolidEnumerator for TruckAssembly {
    fn solids(&self) -> Result<Vec<&dyn CadObject>, ProbeError> {
        Ok(self.parts.iter().map(|p| p as &dyn CadObject).collect())
    }
}

impl FaceProvider for TruckAssembly {
    fn faces(&self) -> Result<Vec<Box<dyn FaceNormal + '_>>, ProbeError> {
        let mut faces = Vec::new();
        for part in &self.parts {
            faces.extend(part.faces()?);
        }
        Ok(faces)
    }
}
