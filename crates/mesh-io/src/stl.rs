//! STL export and import.
//!
//! Binary STL layout:
//! - 80-byte header (arbitrary text)
//! - u32 triangle count (little-endian)
//! - per triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes

use std::path::Path;

use print_types::TriangleMesh;
use tracing::debug;

use crate::error::MeshIoError;

const HEADER_SIZE: usize = 80;
const TRIANGLE_SIZE: usize = 50;

/// STL encoding to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlEncoding {
    #[default]
    Binary,
    Ascii,
}

fn check_indices(mesh: &TriangleMesh) -> Result<usize, MeshIoError> {
    let tri_count = mesh.triangle_count();
    if tri_count == 0 {
        return Err(MeshIoError::EmptyMesh);
    }
    let vertex_count = mesh.vertex_count();
    if let Some(&index) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(MeshIoError::IndexOutOfRange {
            index,
            vertex_count,
        });
    }
    Ok(tri_count)
}

/// Unit facet normal from the winding, +Z for degenerate triangles.
fn facet_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let (ax, ay, az) = (b[0] - a[0], b[1] - a[1], b[2] - a[2]);
    let (bx, by, bz) = (c[0] - a[0], c[1] - a[1], c[2] - a[2]);
    let nx = ay * bz - az * by;
    let ny = az * bx - ax * bz;
    let nz = ax * by - ay * bx;
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    if len > 1e-12 {
        [nx / len, ny / len, nz / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

fn triangles(mesh: &TriangleMesh) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
    mesh.indices
        .chunks_exact(3)
        .map(|tri| [mesh.vertex(tri[0] as usize), mesh.vertex(tri[1] as usize), mesh.vertex(tri[2] as usize)])
}

/// Encode a mesh as binary STL.
pub fn write_binary_stl(mesh: &TriangleMesh, name: &str) -> Result<Vec<u8>, MeshIoError> {
    let tri_count = check_indices(mesh)?;
    let tri_count_u32 = u32::try_from(tri_count)
        .map_err(|_| MeshIoError::invalid("too many triangles for binary STL"))?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + 4 + tri_count * TRIANGLE_SIZE);

    let header = format!("binary STL: {name}");
    let header_bytes = header.as_bytes();
    buf.extend_from_slice(&header_bytes[..header_bytes.len().min(HEADER_SIZE)]);
    buf.resize(HEADER_SIZE, 0u8);

    buf.extend_from_slice(&tri_count_u32.to_le_bytes());

    for [a, b, c] in triangles(mesh) {
        for component in facet_normal(a, b, c) {
            buf.extend_from_slice(&component.to_le_bytes());
        }
        for v in [a, b, c] {
            for component in v {
                buf.extend_from_slice(&component.to_le_bytes());
            }
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(buf)
}

/// Encode a mesh as ASCII STL.
pub fn write_ascii_stl(mesh: &TriangleMesh, name: &str) -> Result<String, MeshIoError> {
    let tri_count = check_indices(mesh)?;

    let mut out = String::with_capacity(tri_count * 300);
    out.push_str(&format!("solid {name}\n"));

    for [a, b, c] in triangles(mesh) {
        let n = facet_normal(a, b, c);
        out.push_str(&format!("  facet normal {} {} {}\n", n[0], n[1], n[2]));
        out.push_str("    outer loop\n");
        for v in [a, b, c] {
            out.push_str(&format!("      vertex {} {} {}\n", v[0], v[1], v[2]));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    Ok(out)
}

/// Write a mesh to `path` in the given encoding.
pub fn save_stl(
    mesh: &TriangleMesh,
    path: impl AsRef<Path>,
    encoding: StlEncoding,
) -> Result<(), MeshIoError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    let bytes = match encoding {
        StlEncoding::Binary => write_binary_stl(mesh, name)?,
        StlEncoding::Ascii => write_ascii_stl(mesh, name)?.into_bytes(),
    };
    std::fs::write(path, bytes).map_err(|e| MeshIoError::io(path, e))?;
    debug!(path = %path.display(), triangles = mesh.triangle_count(), ?encoding, "wrote STL");
    Ok(())
}

/// A buffer is binary STL when its length matches the declared triangle
/// count exactly, or when it does not start with `solid`.
fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.len() >= HEADER_SIZE + 4 {
        let count = u32::from_le_bytes([
            bytes[HEADER_SIZE],
            bytes[HEADER_SIZE + 1],
            bytes[HEADER_SIZE + 2],
            bytes[HEADER_SIZE + 3],
        ]) as usize;
        if count
            .checked_mul(TRIANGLE_SIZE)
            .and_then(|n| n.checked_add(HEADER_SIZE + 4))
            == Some(bytes.len())
        {
            return true;
        }
    }
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    !String::from_utf8_lossy(head).trim_start().starts_with("solid")
}

/// Decode STL bytes, detecting binary or ASCII.
pub fn parse_stl(bytes: &[u8]) -> Result<TriangleMesh, MeshIoError> {
    if bytes.len() < 6 {
        return Err(MeshIoError::invalid("file too small to be valid STL"));
    }
    if looks_binary(bytes) {
        parse_binary(bytes)
    } else {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| MeshIoError::invalid(format!("ASCII STL is not UTF-8: {e}")))?;
        parse_ascii(text)
    }
}

fn read_f32(buf: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn parse_binary(bytes: &[u8]) -> Result<TriangleMesh, MeshIoError> {
    if bytes.len() < HEADER_SIZE + 4 {
        return Err(MeshIoError::invalid(format!(
            "binary STL header needs {} bytes, got {}",
            HEADER_SIZE + 4,
            bytes.len()
        )));
    }
    let expected = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]);

    let body = &bytes[HEADER_SIZE + 4..];
    let available = body.len() / TRIANGLE_SIZE;
    if available < expected as usize {
        return Err(MeshIoError::Truncated {
            expected,
            got: available as u32,
        });
    }

    let mut mesh = TriangleMesh::default();
    for record in body.chunks_exact(TRIANGLE_SIZE).take(expected as usize) {
        let base = mesh.vertex_count() as u32;
        // Skip the stored normal (12 bytes)
        for k in 0..9 {
            mesh.vertices.push(read_f32(record, 12 + k * 4));
        }
        mesh.indices.extend([base, base + 1, base + 2]);
    }
    Ok(mesh)
}

fn parse_ascii(text: &str) -> Result<TriangleMesh, MeshIoError> {
    let mut mesh = TriangleMesh::default();
    let mut in_loop = false;
    let mut pending: Vec<f32> = Vec::with_capacity(9);

    for (line_no, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                pending.clear();
            }
            "vertex" if in_loop => {
                if parts.len() < 4 {
                    return Err(MeshIoError::invalid(format!(
                        "line {}: vertex needs three coordinates",
                        line_no + 1
                    )));
                }
                for p in &parts[1..4] {
                    let v: f32 = p.parse().map_err(|_| {
                        MeshIoError::invalid(format!("line {}: bad coordinate {p:?}", line_no + 1))
                    })?;
                    pending.push(v);
                }
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                if pending.len() == 9 {
                    let base = mesh.vertex_count() as u32;
                    mesh.vertices.append(&mut pending);
                    mesh.indices.extend([base, base + 1, base + 2]);
                } else {
                    debug!(line = line_no + 1, vertices = pending.len() / 3, "skipping non-triangular facet");
                }
                pending.clear();
            }
            "endsolid" => break,
            _ => {}
        }
    }
    Ok(mesh)
}

/// Read an STL file from disk.
pub fn load_stl(path: impl AsRef<Path>) -> Result<TriangleMesh, MeshIoError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| MeshIoError::io(path, e))?;
    parse_stl(&bytes)
}

/// Number of triangles stored in an STL file.
pub fn count_triangles(path: impl AsRef<Path>) -> Result<usize, MeshIoError> {
    Ok(load_stl(path)?.triangle_count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn binary_size_matches_triangle_count() {
        let stl = write_binary_stl(&triangle(), "t").unwrap();
        assert_eq!(stl.len(), 80 + 4 + 50);
        assert_eq!(u32::from_le_bytes([stl[80], stl[81], stl[82], stl[83]]), 1);
    }

    #[test]
    fn facet_normal_follows_winding() {
        let stl = write_binary_stl(&triangle(), "t").unwrap();
        assert_eq!(read_f32(&stl, 84 + 8), 1.0);
    }

    #[test]
    fn empty_mesh_rejected() {
        assert!(matches!(
            write_binary_stl(&TriangleMesh::default(), "x"),
            Err(MeshIoError::EmptyMesh)
        ));
        assert!(matches!(
            write_ascii_stl(&TriangleMesh::default(), "x"),
            Err(MeshIoError::EmptyMesh)
        ));
    }

    #[test]
    fn bad_index_rejected() {
        let mut mesh = triangle();
        mesh.indices[2] = 7;
        assert!(matches!(
            write_binary_stl(&mesh, "x"),
            Err(MeshIoError::IndexOutOfRange { index: 7, vertex_count: 3 })
        ));
    }

    #[test]
    fn ascii_parsing() {
        let text = "solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test";
        let mesh = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex(1), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn ascii_bad_coordinate() {
        let text = "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 zero 0\n";
        assert!(matches!(
            parse_stl(text.as_bytes()),
            Err(MeshIoError::InvalidContent { .. })
        ));
    }

    #[test]
    fn binary_header_starting_with_solid_is_still_binary() {
        let mut stl = write_binary_stl(&triangle(), "t").unwrap();
        stl[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&stl).unwrap().triangle_count(), 1);
    }

    #[test]
    fn truncated_binary() {
        let mut stl = write_binary_stl(&triangle(), "t").unwrap();
        stl[80..84].copy_from_slice(&3u32.to_le_bytes());
        assert!(matches!(
            parse_stl(&stl),
            Err(MeshIoError::Truncated { expected: 3, got: 1 })
        ));
    }

    #[test]
    fn tiny_input_is_invalid() {
        assert!(matches!(parse_stl(b"abc"), Err(MeshIoError::InvalidContent { .. })));
    }
}
