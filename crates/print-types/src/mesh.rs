use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;

/// Indexed triangle mesh, as produced by tessellation or loaded from a mesh file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals, parallel to `vertices`. May be empty.
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array, three per triangle.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of vertex `i`.
    ///
    /// Panics if `i >= self.vertex_count()`. A trailing partial coordinate
    /// triple is not a vertex.
    pub fn vertex(&self, i: usize) -> [f32; 3] {
        [
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        ]
    }

    /// Append another mesh, re-basing its indices.
    pub fn append(&mut self, other: &TriangleMesh) {
        let base = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounds of all vertex positions, ignoring a trailing
    /// partial coordinate triple.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(
            self.vertices
                .chunks_exact(3)
                .map(|c| [c[0] as f64, c[1] as f64, c[2] as f64]),
        )
    }

    /// Enclosed volume using the divergence theorem.
    ///
    /// Meaningful only for closed meshes; triangles with out-of-range indices are skipped.
    pub fn volume(&self) -> f64 {
        let verts = &self.vertices;
        let mut volume = 0.0f64;

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (
                tri[0] as usize * 3,
                tri[1] as usize * 3,
                tri[2] as usize * 3,
            );
            if i0 + 2 >= verts.len() || i1 + 2 >= verts.len() || i2 + 2 >= verts.len() {
                continue;
            }

            let (x0, y0, z0) = (verts[i0] as f64, verts[i0 + 1] as f64, verts[i0 + 2] as f64);
            let (x1, y1, z1) = (verts[i1] as f64, verts[i1 + 1] as f64, verts[i1 + 2] as f64);
            let (x2, y2, z2) = (verts[i2] as f64, verts[i2 + 1] as f64, verts[i2 + 2] as f64);

            // Signed volume of the tetrahedron formed with the origin
            volume +=
                x0 * (y1 * z2 - y2 * z1) + x1 * (y2 * z0 - y0 * z2) + x2 * (y0 * z1 - y1 * z0);
        }

        (volume / 6.0).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0,
                0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0,
            ],
            normals: vec![],
            indices: vec![
                0, 2, 1, 0, 3, 2, // bottom
                4, 5, 6, 4, 6, 7, // top
                0, 1, 5, 0, 5, 4, // front
                2, 3, 7, 2, 7, 6, // back
                0, 4, 7, 0, 7, 3, // left
                1, 2, 6, 1, 6, 5, // right
            ],
        }
    }

    #[test]
    fn cube_volume_and_counts() {
        let mesh = unit_cube();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!((mesh.volume() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_trailing_coordinates_are_ignored() {
        let mesh = TriangleMesh {
            vertices: vec![0.0, 0.0, 0.0, 2.0, 3.0, 4.0, 9.0],
            normals: vec![],
            indices: vec![0, 1, 0, 1],
        };
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.vertex(1), [2.0, 3.0, 4.0]);
        let bb = mesh.bounding_box().unwrap();
        assert_eq!(bb.min, [0.0, 0.0, 0.0]);
        assert_eq!(bb.max, [2.0, 3.0, 4.0]);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.volume(), 0.0);
    }

    #[test]
    fn append_rebases_indices() {
        let mut a = unit_cube();
        let b = unit_cube();
        a.append(&b);
        assert_eq!(a.triangle_count(), 24);
        assert_eq!(a.vertex_count(), 16);
        assert!(a.indices[36..].iter().all(|&i| i >= 8));
    }

    #[test]
    fn bounding_box_of_cube() {
        let bbox = unit_cube().bounding_box().unwrap();
        assert_eq!(bbox.min, [0.0; 3]);
        assert_eq!(bbox.max, [1.0; 3]);
        assert!(TriangleMesh::default().bounding_box().is_none());
    }
}
