//! Export backend that records every call it receives.

use std::cell::RefCell;
use std::path::PathBuf;

use cad_probe::CadObject;
use export_guard::{extension_of, BackendError, EntryPoint, ExportArgs, ExportBackend, ExportOutput};
use mesh_io::StlEncoding;

use crate::helpers::strip_mesh;

/// One call that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub entry: EntryPoint,
    pub label: String,
    pub destination: Option<PathBuf>,
}

/// Backend writing a fixed-size mesh to every `.stl` destination.
///
/// Other destinations receive a short placeholder payload. Calls without a
/// destination return [`ExportOutput::Done`]. A [`malformed`] backend writes
/// unparseable ASCII STL instead of the mesh.
///
/// [`malformed`]: RecordingBackend::malformed
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: RefCell<Vec<RecordedCall>>,
    triangles: usize,
    encoding: StlEncoding,
    malformed: bool,
}

const MALFORMED_STL: &str = "solid broken\n facet normal 0 0 1\n  outer loop\n   vertex a b c\n";

impl RecordingBackend {
    /// Backend producing `triangles` triangles per STL artifact.
    pub fn new(triangles: usize) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            triangles,
            encoding: StlEncoding::Binary,
            malformed: false,
        }
    }

    pub fn ascii(mut self) -> Self {
        self.encoding = StlEncoding::Ascii;
        self
    }

    pub fn malformed(mut self) -> Self {
        self.malformed = true;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl ExportBackend for RecordingBackend {
    fn call(
        &self,
        entry: EntryPoint,
        object: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, BackendError> {
        let destination = args.destination().map(|p| p.to_path_buf());
        self.calls.borrow_mut().push(RecordedCall {
            entry,
            label: object.label(),
            destination: destination.clone(),
        });

        let Some(path) = destination else {
            return Ok(ExportOutput::Done);
        };
        let is_stl = entry == EntryPoint::ShapeStl || extension_of(&path) == "stl";
        if is_stl && self.malformed {
            std::fs::write(&path, MALFORMED_STL).map_err(|source| BackendError::Io {
                path: path.clone(),
                source,
            })?;
        } else if is_stl {
            mesh_io::save_stl(&strip_mesh(self.triangles), &path, self.encoding)?;
        } else {
            std::fs::write(&path, format!("{entry} {}\n", object.label())).map_err(|source| {
                BackendError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
        }
        Ok(ExportOutput::Written(path))
    }
}
