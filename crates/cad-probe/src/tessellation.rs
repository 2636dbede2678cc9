//! Tessellation of truck solids into [`TriangleMesh`]es.
//!
//! Only positions and triangle indices are kept; truck indexes normals
//! separately from positions, and consumers derive facet normals from the
//! winding.

use print_types::TriangleMesh;
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::MeshableShape;

use crate::types::GeometryError;

type TruckSolid = truck_modeling::Solid;

/// Triangulate a solid and return one mesh per face, in shell/face
/// iteration order. Faces that produced no mesh yield an empty mesh so the
/// result stays aligned with `shell.face_iter()`.
pub fn tessellate_faces(solid: &TruckSolid, tolerance: f64) -> Vec<TriangleMesh> {
    let meshed_solid = solid.triangulation(tolerance);
    let mut out = Vec::new();

    for shell in meshed_solid.boundaries().iter() {
        for face in shell.face_iter() {
            let maybe_mesh: Option<PolygonMesh> = face.surface();
            let Some(face_mesh) = maybe_mesh else {
                out.push(TriangleMesh::default());
                continue;
            };

            // Inverted faces need their mesh inverted too
            let face_mesh = if !face.orientation() {
                let mut m = face_mesh;
                m.invert();
                m
            } else {
                face_mesh
            };

            let mut mesh = TriangleMesh::default();
            for pos in face_mesh.positions() {
                mesh.vertices.extend([pos[0] as f32, pos[1] as f32, pos[2] as f32]);
            }
            for tri in face_mesh.tri_faces() {
                for v in tri.iter() {
                    mesh.indices.push(v.pos as u32);
                }
            }
            out.push(mesh);
        }
    }
    out
}

/// Triangulate a solid into a single merged mesh.
pub fn tessellate_solid(solid: &TruckSolid, tolerance: f64) -> Result<TriangleMesh, GeometryError> {
    let mut merged = TriangleMesh::default();
    for face in tessellate_faces(solid, tolerance) {
        merged.append(&face);
    }
    if merged.triangle_count() == 0 {
        return Err(GeometryError::EmptyTessellation);
    }
    Ok(merged)
}

/// Area-weighted average normal of a face mesh, from triangle winding.
/// `None` for an empty or degenerate mesh.
pub fn average_normal(mesh: &TriangleMesh) -> Option<[f64; 3]> {
    let mut sum = [0.0f64; 3];
    let count = mesh.vertex_count();
    for tri in mesh.indices.chunks_exact(3) {
        if tri.iter().any(|&i| i as usize >= count) {
            continue;
        }
        let [a, b, c] = [0, 1, 2].map(|k| {
            let p = mesh.vertex(tri[k] as usize);
            [p[0] as f64, p[1] as f64, p[2] as f64]
        });
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        sum[0] += u[1] * v[2] - u[2] * v[1];
        sum[1] += u[2] * v[0] - u[0] * v[2];
        sum[2] += u[0] * v[1] - u[1] * v[0];
    }
    let len = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
    if len > 0.0 {
        Some([sum[0] / len, sum[1] / len, sum[2] / len])
    } else {
        None
    }
}
