//! Caller-owned table of export entry points that can be wrapped in place.
//!
//! [`ExportRegistry::enable`] replaces every entry with a guarded version
//! and keeps the originals; [`ExportRegistry::disable`] puts them back.

use std::collections::BTreeMap;
use std::rc::Rc;

use cad_probe::CadObject;
use tracing::debug;

use crate::args::{EntryPoint, ExportArgs, ExportOutput};
use crate::backend::ExportBackend;
use crate::errors::ExportError;
use crate::save_validator::SaveValidator;

pub type ExportFn = Rc<dyn Fn(&dyn CadObject, &ExportArgs) -> Result<ExportOutput, ExportError>>;

#[derive(Default)]
pub struct ExportRegistry {
    entries: BTreeMap<EntryPoint, ExportFn>,
    originals: Option<BTreeMap<EntryPoint, ExportFn>>,
    validator: Option<Rc<SaveValidator>>,
}

impl std::fmt::Debug for ExportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportRegistry")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl ExportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose every entry point calls `backend` directly.
    pub fn from_backend<B: ExportBackend + 'static>(backend: Rc<B>) -> Self {
        let mut registry = Self::new();
        for entry in EntryPoint::ALL {
            let backend = Rc::clone(&backend);
            registry.set(
                entry,
                Rc::new(
                    move |obj: &dyn CadObject, args: &ExportArgs| -> Result<ExportOutput, ExportError> {
                        Ok(backend.call(entry, obj, args)?)
                    },
                ),
            );
        }
        registry
    }

    /// Install or replace an entry.
    ///
    /// While enabled, `f` becomes the entry's original and a guarded copy is
    /// installed, so the entry stays validated and survives [`disable`].
    ///
    /// [`disable`]: ExportRegistry::disable
    pub fn set(&mut self, entry: EntryPoint, f: ExportFn) {
        match (&mut self.originals, &self.validator) {
            (Some(originals), Some(validator)) => {
                originals.insert(entry, Rc::clone(&f));
                self.entries.insert(entry, guarded(entry, f, Rc::clone(validator)));
            }
            _ => {
                self.entries.insert(entry, f);
            }
        }
    }

    pub fn get(&self, entry: EntryPoint) -> Option<&ExportFn> {
        self.entries.get(&entry)
    }

    pub fn is_enabled(&self) -> bool {
        self.originals.is_some()
    }

    /// Wrap every entry with validation. A second call is a no-op.
    pub fn enable(&mut self, validator: Rc<SaveValidator>) {
        if self.originals.is_some() {
            debug!("export guard already enabled");
            return;
        }
        let originals = self.entries.clone();
        for (&entry, original) in &originals {
            self.entries
                .insert(entry, guarded(entry, Rc::clone(original), Rc::clone(&validator)));
        }
        debug!(entries = originals.len(), "export guard enabled");
        self.originals = Some(originals);
        self.validator = Some(validator);
    }

    /// Restore the original entries. No-op when not enabled.
    pub fn disable(&mut self) {
        if let Some(originals) = self.originals.take() {
            self.entries = originals;
            self.validator = None;
            debug!("export guard disabled");
        }
    }

    /// Invoke the current entry.
    pub fn call(
        &self,
        entry: EntryPoint,
        obj: &dyn CadObject,
        args: &ExportArgs,
    ) -> Result<ExportOutput, ExportError> {
        match self.entries.get(&entry) {
            Some(f) => f(obj, args),
            None => Err(crate::errors::BackendError::UnsupportedFormat {
                format: format!("no entry registered for {entry}"),
            }
            .into()),
        }
    }
}

fn guarded(entry: EntryPoint, original: ExportFn, validator: Rc<SaveValidator>) -> ExportFn {
    Rc::new(
        move |obj: &dyn CadObject, args: &ExportArgs| -> Result<ExportOutput, ExportError> {
            validator.guarded_call(entry, obj, args, |obj, args| original(obj, args))
        },
    )
}
