//! Test harness for the export guard.
//!
//! Provides a backend that records what reached it, canned rule sets and
//! models, and verdict-style checks over export outcomes.
//!
//! # Key Components
//!
//! - [`RecordingBackend`]: export backend that logs calls and writes fixed-size meshes
//! - [`fixtures`]: rule sets, models and parts used across scenarios
//! - [`oracle`]: checks returning pass/fail verdicts with diagnostics
//! - [`helpers`]: error type and mesh builders

pub mod fixtures;
pub mod helpers;
pub mod oracle;
pub mod recording;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use recording::{RecordedCall, RecordingBackend};
