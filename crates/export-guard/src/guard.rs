//! One-stop facade: rule loading, model attachment and guarded exports.

use std::path::Path;
use std::rc::Rc;

use cad_probe::CadObject;
use print_rules::{ConfigError, Model, RuleSet, ValidationError, Validator};

use crate::args::{EntryPoint, ExportArgs, ExportOutput};
use crate::backend::ExportBackend;
use crate::config::ValidationOptions;
use crate::errors::ExportError;
use crate::exporter::GuardedExporter;
use crate::save_validator::SaveValidator;

#[derive(Debug)]
pub struct PrintGuard<B> {
    save_validator: Rc<SaveValidator>,
    exporter: GuardedExporter<B>,
}

impl<B: ExportBackend> PrintGuard<B> {
    pub fn new(rules: RuleSet, backend: B) -> Self {
        Self::with_save_validator(SaveValidator::from_rules(rules), backend)
    }

    pub fn from_file(path: impl AsRef<Path>, backend: B) -> Result<Self, ConfigError> {
        Ok(Self::with_save_validator(SaveValidator::from_file(path)?, backend))
    }

    /// Guard measuring with `options`; the backend tessellates at
    /// `options.tessellation_tolerance`.
    pub fn with_options(rules: RuleSet, options: ValidationOptions, mut backend: B) -> Self {
        backend.set_tessellation_tolerance(options.tessellation_tolerance);
        Self::with_save_validator(SaveValidator::from_rules(rules).with_options(options), backend)
    }

    pub fn with_save_validator(save_validator: SaveValidator, backend: B) -> Self {
        let save_validator = Rc::new(save_validator);
        let exporter = GuardedExporter::new(Rc::clone(&save_validator), backend);
        Self {
            save_validator,
            exporter,
        }
    }

    pub fn validator(&self) -> &Validator {
        self.save_validator.validator()
    }

    /// Shared handle, e.g. for [`crate::ExportRegistry::enable`].
    pub fn save_validator(&self) -> Rc<SaveValidator> {
        Rc::clone(&self.save_validator)
    }

    pub fn backend(&self) -> &B {
        self.exporter.backend()
    }

    pub fn attach_model(&self, obj: &dyn CadObject, model: Model) {
        self.save_validator.attach_model(obj, model);
    }

    pub fn detach_model(&self, obj: &dyn CadObject) -> Option<Model> {
        self.save_validator.detach_model(obj)
    }

    /// Evaluate a standalone model against the loaded rules.
    pub fn validate(&self, model: &Model) -> Result<(), ValidationError> {
        self.validator().check(model)
    }

    pub fn call(
        &self,
        entry: EntryPoint,
        obj: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, ExportError> {
        self.exporter.call(entry, obj, args)
    }

    pub fn export(&self, obj: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.exporter.export(obj, args)
    }

    pub fn cq_export(&self, obj: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.exporter.cq_export(obj, args)
    }

    pub fn export_stl(&self, shape: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.exporter.export_stl(shape, args)
    }

    pub fn export_step(&self, shape: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.exporter.export_step(shape, args)
    }

    pub fn export_bin(&self, shape: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.exporter.export_bin(shape, args)
    }

    pub fn export_brep(&self, shape: &dyn CadObject, args: &ExportArgs) -> Result<ExportOutput, ExportError> {
        self.exporter.export_brep(shape, args)
    }

    pub fn assembly_export(
        &self,
        assembly: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, ExportError> {
        self.exporter.assembly_export(assembly, args)
    }

    pub fn assembly_save(
        &self,
        assembly: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, ExportError> {
        self.exporter.assembly_save(assembly, args)
    }
}
