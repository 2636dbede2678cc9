//! STL files on disk.

use mesh_io::{count_triangles, load_stl, save_stl, write_ascii_stl, MeshIoError, StlEncoding};
use print_types::TriangleMesh;

fn make_box_mesh() -> TriangleMesh {
    // 8 vertices, 12 triangles (2 per face)
    TriangleMesh {
        vertices: vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0,
            1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0,
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
fn binary_file_reloads_with_same_triangle_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("box.stl");
    save_stl(&make_box_mesh(), &path, StlEncoding::Binary).unwrap();

    assert_eq!(count_triangles(&path).unwrap(), 12);
    let loaded = load_stl(&path).unwrap();
    assert!((loaded.volume() - 1.0).abs() < 1e-6);
}

#[test]
fn ascii_file_reloads_with_same_triangle_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("box_ascii.stl");
    save_stl(&make_box_mesh(), &path, StlEncoding::Ascii).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("solid box_ascii"));
    assert_eq!(count_triangles(&path).unwrap(), 12);
}

#[test]
fn ascii_output_structure() {
    let stl = write_ascii_stl(&make_box_mesh(), "cube").unwrap();
    assert_eq!(stl.matches("facet normal").count(), 12);
    assert_eq!(stl.matches("vertex").count(), 36);
    assert!(stl.trim_end().ends_with("endsolid cube"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_stl(dir.path().join("nope.stl")).unwrap_err();
    assert!(matches!(err, MeshIoError::Io { .. }));
}

#[test]
fn garbage_file_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.stl");
    std::fs::write(&path, b"not a mesh at all, just some text").unwrap();
    assert!(count_triangles(&path).is_err());
}
