//! STL reading and writing for [`TriangleMesh`](print_types::TriangleMesh).
//!
//! Writers take an indexed mesh and emit binary or ASCII STL with facet
//! normals computed from the winding. The reader detects the encoding and
//! returns an unindexed mesh (three vertices per triangle).

pub mod error;
pub mod stl;

pub use error::MeshIoError;
pub use stl::{count_triangles, load_stl, parse_stl, save_stl, write_ascii_stl, write_binary_stl, StlEncoding};
