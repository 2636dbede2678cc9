//! Underlying export backends and the mesh reload interface.

use std::path::Path;

use cad_probe::{CadObject, TruckAssembly, TruckPart};
use mesh_io::{MeshIoError, StlEncoding};
use print_types::TriangleMesh;
use tracing::debug;

use crate::args::{extension_of, EntryPoint, ExportArgs, ExportOutput};
use crate::errors::BackendError;

/// The library that actually writes artifacts.
pub trait ExportBackend {
    fn call(
        &self,
        entry: EntryPoint,
        object: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, BackendError>;

    /// Chordal tolerance for backends that tessellate. Others ignore it.
    fn set_tessellation_tolerance(&mut self, _tolerance: f64) {}
}

/// Reloads written mesh artifacts to count their triangles.
pub trait MeshLoader {
    /// Whether files with this (lower-case, dotless) extension are meshes
    /// this loader can read.
    fn handles(&self, extension: &str) -> bool;

    fn triangle_count(&self, path: &Path) -> Result<usize, MeshIoError>;
}

/// STL loader backed by [`mesh_io::load_stl`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StlMeshLoader;

impl MeshLoader for StlMeshLoader {
    fn handles(&self, extension: &str) -> bool {
        extension == "stl"
    }

    fn triangle_count(&self, path: &Path) -> Result<usize, MeshIoError> {
        mesh_io::count_triangles(path)
    }
}

/// Writes truck parts and assemblies as STL.
///
/// Recognized keyword arguments: `ascii` (bool) selects ASCII output,
/// `tolerance` (float) overrides the tessellation tolerance, `exportType`
/// (string) names the format when there is no destination.
#[derive(Debug, Clone, Copy)]
pub struct TruckBackend {
    tolerance: f64,
}

impl Default for TruckBackend {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}

impl TruckBackend {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn mesh_of(&self, object: &dyn CadObject, tolerance: f64) -> Result<TriangleMesh, BackendError> {
        let any = object.as_any();
        let mesh = if let Some(part) = any.downcast_ref::<TruckPart>() {
            part.mesh(tolerance)
        } else if let Some(assembly) = any.downcast_ref::<TruckAssembly>() {
            assembly.mesh(tolerance)
        } else {
            return Err(BackendError::Kernel(format!(
                "{} is not a truck shape",
                object.label()
            )));
        };
        mesh.map_err(|e| BackendError::Kernel(e.to_string()))
    }

    fn write_stl(&self, object: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, BackendError> {
        let tolerance = args.f64_kwarg("tolerance").unwrap_or(self.tolerance);
        let encoding = if args.bool_kwarg("ascii").unwrap_or(false) {
            StlEncoding::Ascii
        } else {
            StlEncoding::Binary
        };
        let mesh = self.mesh_of(object, tolerance)?;

        match args.destination() {
            Some(path) => {
                mesh_io::save_stl(&mesh, path, encoding)?;
                Ok(ExportOutput::Written(path.to_path_buf()))
            }
            None => {
                let name = object.label();
                let bytes = match encoding {
                    StlEncoding::Binary => mesh_io::write_binary_stl(&mesh, &name)?,
                    StlEncoding::Ascii => mesh_io::write_ascii_stl(&mesh, &name)?.into_bytes(),
                };
                Ok(ExportOutput::Bytes(bytes))
            }
        }
    }
}

impl ExportBackend for TruckBackend {
    fn call(
        &self,
        entry: EntryPoint,
        object: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, BackendError> {
        debug!(%entry, object = %object.label(), "truck backend export");
        match entry {
            EntryPoint::ShapeStl | EntryPoint::AssemblyExport | EntryPoint::AssemblySave => {
                self.write_stl(object, args)
            }
            EntryPoint::ShapeStep => Err(BackendError::UnsupportedFormat {
                format: "STEP".to_string(),
            }),
            EntryPoint::ShapeBin => Err(BackendError::UnsupportedFormat {
                format: "BIN".to_string(),
            }),
            EntryPoint::ShapeBrep => Err(BackendError::UnsupportedFormat {
                format: "BREP".to_string(),
            }),
            EntryPoint::Export | EntryPoint::CqExport => {
                let format = match args.str_kwarg("exportType") {
                    Some(t) => t.trim_start_matches('.').to_ascii_lowercase(),
                    None => args.destination().map(extension_of).unwrap_or_default(),
                };
                match format.as_str() {
                    "stl" | "" => self.write_stl(object, args),
                    other => Err(BackendError::UnsupportedFormat {
                        format: other.to_ascii_uppercase(),
                    }),
                }
            }
        }
    }

    fn set_tessellation_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }
}
