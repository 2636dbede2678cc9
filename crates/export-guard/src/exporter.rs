//! Explicit wrapper exposing one guarded method per export entry point.

use std::rc::Rc;

use cad_probe::CadObject;

use crate::args::{EntryPoint, ExportArgs, ExportOutput};
use crate::backend::ExportBackend;
use crate::errors::ExportError;
use crate::save_validator::SaveValidator;

/// Routes every export through [`SaveValidator::guarded_call`] before
/// reaching the backend.
#[derive(Debug)]
pub struct GuardedExporter<B> {
    validator: Rc<SaveValidator>,
    backend: B,
}

impl<B: ExportBackend> GuardedExporter<B> {
    pub fn new(validator: Rc<SaveValidator>, backend: B) -> Self {
        Self { validator, backend }
    }

    pub fn validator(&self) -> &SaveValidator {
        &self.validator
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Guarded call to any entry point.
    pub fn call(
        &self,
        entry: EntryPoint,
        obj: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, ExportError> {
        self.validator.guarded_call(entry, obj, args, |obj, args| {
            Ok(self.backend.call(entry, obj, args)?)
        })
    }

    pub fn export(&self, obj: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.call(EntryPoint::Export, obj, args)
    }

    pub fn cq_export(&self, obj: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.call(EntryPoint::CqExport, obj, args)
    }

    pub fn export_stl(&self, shape: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.call(EntryPoint::ShapeStl, shape, args)
    }

    pub fn export_step(&self, shape: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.call(EntryPoint::ShapeStep, shape, args)
    }

    pub fn export_bin(&self, shape: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.call(EntryPoint::ShapeBin, shape, args)
    }

    pub fn export_brep(&self, shape: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.call(EntryPoint::ShapeBrep, shape, args)
    }

    pub fn assembly_export(
        &self,
        assembly: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, ExportError> {
        self.call(EntryPoint::AssemblyExport, assembly, args)
    }

    pub fn assembly_save(
        &self,
        assembly: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, ExportError> {
        self.call(EntryPoint::AssemblySave, assembly, args)
    }
}
