//! Printability gate in front of CAD export.
//!
//! [`SaveValidator`] runs the attached model and the object's structure
//! through the rule set before an export is allowed, and checks the triangle
//! budget of the written mesh afterwards. Two ways of putting it in front of
//! a backend are provided:
//!
//! - [`GuardedExporter`]: a wrapper with one method per entry point
//! - [`ExportRegistry`]: a caller-owned table of entry points that
//!   [`ExportRegistry::enable`] wraps in place and
//!   [`ExportRegistry::disable`] restores
//!
//! [`PrintGuard`] bundles rules, model attachment and a guarded backend.

pub mod args;
pub mod backend;
pub mod config;
pub mod errors;
pub mod exporter;
pub mod guard;
pub mod logging;
pub mod models;
pub mod registry;
pub mod save_validator;

pub use args::{extension_of, ArgValue, EntryPoint, ExportArgs, ExportOutput};
pub use backend::{ExportBackend, MeshLoader, StlMeshLoader, TruckBackend};
pub use config::ValidationOptions;
pub use errors::{BackendError, ExportError, LoggingError};
pub use exporter::GuardedExporter;
pub use guard::PrintGuard;
pub use logging::{init_file_logging, init_logging, DEFAULT_LOG_FILE, LOG_ENV_VAR};
pub use models::ModelRegistry;
pub use registry::{ExportFn, ExportRegistry};
pub use save_validator::SaveValidator;

pub use print_rules::{Model, ModelValue, RuleSet, ValidationError, Validator};
