//! Validation orchestrator wrapped around every export.
//!
//! An export attempt runs, in order: model checks (only when a model is
//! attached), the file-format gate, the underlying export, and the
//! post-write triangle budget. A rejected artifact is deleted before the
//! error is returned.

use std::io::ErrorKind;
use std::path::Path;

use cad_probe::{probes, CadObject};
use print_rules::{evaluate, load_rules, names, ConfigError, Model, ModelValue, RuleSet, ValidationError, Validator};
use tracing::{debug, info, instrument, warn};

use crate::args::{extension_of, EntryPoint, ExportArgs, ExportOutput};
use crate::backend::{MeshLoader, StlMeshLoader};
use crate::config::ValidationOptions;
use crate::errors::ExportError;
use crate::models::ModelRegistry;

pub struct SaveValidator {
    validator: Validator,
    models: ModelRegistry,
    options: ValidationOptions,
    loader: Box<dyn MeshLoader>,
}

impl std::fmt::Debug for SaveValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveValidator")
            .field("validator", &self.validator)
            .field("models", &self.models)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SaveValidator {
    pub fn new(validator: Validator) -> Self {
        Self {
            validator,
            models: ModelRegistry::new(),
            options: ValidationOptions::default(),
            loader: Box::new(StlMeshLoader),
        }
    }

    pub fn from_rules(rules: RuleSet) -> Self {
        Self::new(Validator::new(rules))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::from_rules(load_rules(path)?))
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_loader(mut self, loader: impl MeshLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn rules(&self) -> &RuleSet {
        self.validator.rules()
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Attach printability model data to `obj`, replacing any previous model.
    pub fn attach_model(&self, obj: &dyn CadObject, model: Model) {
        self.models.attach(obj.object_id(), model);
    }

    pub fn detach_model(&self, obj: &dyn CadObject) -> Option<Model> {
        self.models.detach(obj.object_id())
    }

    /// Model with live measurements merged over the caller's values.
    fn combined_model(&self, obj: &dyn CadObject, mut model: Model) -> Model {
        if self.rules().contains(names::MAX_MODEL_SIZE_MM) {
            match probes::bounding_box(obj) {
                Some(bbox) => {
                    model.insert(names::MAX_MODEL_SIZE_MM, ModelValue::from_bounding_box(&bbox));
                }
                None => debug!(object = %obj.label(), "no live bounding box; keeping declared size"),
            }
        }
        model
    }

    /// Check the attached model and the object's structure. Objects without
    /// a model pass.
    pub fn validate_obj(&self, obj: &dyn CadObject) -> Result<(), ValidationError> {
        let Some(model) = self.models.get(obj.object_id()) else {
            debug!(object = %obj.label(), "no model attached; skipping validation");
            return Ok(());
        };
        let model = self.combined_model(obj, model);
        let rules = self.rules();

        let errors = evaluate(&model, rules);
        if !errors.is_empty() {
            return Err(ValidationError::new(errors));
        }

        if rules.flag(names::MANIFOLD_GEOMETRY_REQUIRED) && !probes::is_manifold(obj) {
            return Err(ValidationError::single("Non-manifold geometry detected"));
        }

        if rules.flag(names::NO_OPEN_EDGES) && probes::has_open_edges(obj) {
            return Err(ValidationError::single("Object contains open edges"));
        }

        if rules.flag(names::NO_INTERSECTING_GEOMETRY)
            && probes::has_intersections_with_epsilon(obj, self.options.null_volume_epsilon)
        {
            return Err(ValidationError::single("Intersecting geometry detected"));
        }

        if let Some(min_clearance) = rules.scalar(names::MINIMUM_CLEARANCE_BETWEEN_PARTS_MM) {
            if obj.solid_enumerator().is_some() {
                if let Some(clearance) = probes::minimum_clearance(obj) {
                    if clearance < min_clearance {
                        return Err(ValidationError::single(format!(
                            "Clearance {clearance} below minimum {min_clearance}"
                        )));
                    }
                }
            }
        }

        if let Some(max_overhang) = rules.maximum(names::OVERHANG_MAX_ANGLE_DEG) {
            if let Some(angle) = probes::max_overhang_angle(obj, self.options.build_direction) {
                if angle > max_overhang {
                    return Err(ValidationError::single(format!(
                        "Overhang angle {angle} exceeds maximum {max_overhang}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Reject destinations whose extension is not in the allow-list.
    pub fn validate_file_format(&self, destination: Option<&Path>) -> Result<(), ValidationError> {
        let Some(path) = destination else {
            return Ok(());
        };
        let allowed = self.rules().allowed_formats();
        if allowed.is_empty() {
            return Ok(());
        }
        let ext = extension_of(path);
        if !ext.is_empty() && !allowed.contains(&ext) {
            return Err(ValidationError::single(format!(
                "File format {} is not supported",
                ext.to_ascii_uppercase()
            )));
        }
        Ok(())
    }

    fn is_mesh_format(&self, entry: EntryPoint, path: &Path) -> bool {
        entry == EntryPoint::ShapeStl || self.loader.handles(&extension_of(path))
    }

    /// Reload a written mesh and enforce the triangle budget, deleting the
    /// artifact when it is over budget or cannot be read back.
    pub fn check_triangle_count(
        &self,
        entry: EntryPoint,
        destination: Option<&Path>,
    ) -> Result<(), ExportError> {
        let Some(limit) = self.rules().count(names::MAXIMUM_FILE_TRIANGLE_COUNT) else {
            return Ok(());
        };
        let Some(path) = destination else {
            return Ok(());
        };
        if !self.is_mesh_format(entry, path) {
            return Ok(());
        }

        let count = match self.loader.triangle_count(path) {
            Ok(count) => count,
            Err(source) => {
                remove_artifact(path);
                return Err(ExportError::MeshReload {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        if count as u64 > limit {
            remove_artifact(path);
            return Err(ValidationError::single(format!(
                "Triangle count {count} exceeds maximum {limit}"
            ))
            .into());
        }
        debug!(path = %path.display(), count, limit, "triangle budget satisfied");
        Ok(())
    }

    /// Validate, delegate to `export`, then verify the written artifact.
    #[instrument(skip_all, fields(entry = %entry, object = %obj.label()))]
    pub fn guarded_call<F>(
        &self,
        entry: EntryPoint,
        obj: &dyn CadObject,
        args: &ExportArgs,
        export: F,
    ) -> Result<ExportOutput, ExportError>
    where
        F: FnOnce(&dyn CadObject, &ExportArgs) -> Result<ExportOutput, ExportError>,
    {
        let destination = args.destination();

        if let Err(e) = self
            .validate_obj(obj)
            .and_then(|()| self.validate_file_format(destination))
        {
            info!(error = %e, "export rejected");
            return Err(e.into());
        }

        let output = export(obj, args)?;
        self.check_triangle_count(entry, destination)?;
        info!("export accepted");
        Ok(output)
    }
}

/// Best-effort deletion of a rejected artifact.
fn remove_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => warn!(path = %path.display(), "removed rejected artifact"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove rejected artifact"),
    }
}
