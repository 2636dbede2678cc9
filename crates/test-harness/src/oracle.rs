//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics,
//! so a scenario can collect every failure in one pass.

use std::path::Path;

use export_guard::{ExportError, ExportOutput};

use crate::helpers::HarnessError;
use crate::recording::RecordingBackend;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, detail)
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, detail)
        }
    }

    /// Convert a failed verdict into an error.
    pub fn into_result(self) -> Result<(), HarnessError> {
        if self.passed {
            Ok(())
        } else {
            Err(HarnessError::OracleFailure {
                oracle: self.oracle_name,
                detail: self.detail,
            })
        }
    }
}

// ── Export Outcome Oracles ──────────────────────────────────────────────────

/// The export was rejected by validation with exactly `expected` messages.
pub fn check_rejected_with(
    result: &Result<ExportOutput, ExportError>,
    expected: &[&str],
) -> OracleVerdict {
    match result {
        Err(ExportError::Validation(e)) if e.messages == expected => OracleVerdict::pass(
            "rejected_with",
            format!("rejected with {:?}", e.messages),
        ),
        Err(e) => OracleVerdict::fail(
            "rejected_with",
            format!("expected validation failure {expected:?}, got error {e}"),
        ),
        Ok(out) => OracleVerdict::fail(
            "rejected_with",
            format!("expected validation failure {expected:?}, export returned {out:?}"),
        ),
    }
}

/// The export succeeded.
pub fn check_accepted(result: &Result<ExportOutput, ExportError>) -> OracleVerdict {
    match result {
        Ok(out) => OracleVerdict::pass("accepted", format!("export returned {out:?}")),
        Err(e) => OracleVerdict::fail("accepted", format!("export failed: {e}")),
    }
}

// ── Backend Oracles ─────────────────────────────────────────────────────────

/// Nothing reached the backend.
pub fn check_backend_untouched(backend: &RecordingBackend) -> OracleVerdict {
    let calls = backend.calls();
    if calls.is_empty() {
        OracleVerdict::pass("backend_untouched", "no backend calls".to_string())
    } else {
        OracleVerdict::fail_val(
            "backend_untouched",
            format!("{} backend calls, first: {:?}", calls.len(), calls[0]),
            calls.len() as f64,
        )
    }
}

/// The backend was called exactly `expected` times.
pub fn check_backend_calls(backend: &RecordingBackend, expected: usize) -> OracleVerdict {
    let n = backend.call_count();
    if n == expected {
        OracleVerdict::pass_val("backend_calls", format!("{n} calls"), n as f64)
    } else {
        OracleVerdict::fail_val(
            "backend_calls",
            format!("expected {expected} calls, got {n}"),
            n as f64,
        )
    }
}

// ── Artifact Oracles ────────────────────────────────────────────────────────

pub fn check_artifact_absent(path: &Path) -> OracleVerdict {
    if path.exists() {
        OracleVerdict::fail("artifact_absent", format!("{} still exists", path.display()))
    } else {
        OracleVerdict::pass("artifact_absent", format!("{} absent", path.display()))
    }
}

/// The artifact exists and holds a readable STL within `limit` triangles.
pub fn check_triangle_budget(path: &Path, limit: usize) -> OracleVerdict {
    match mesh_io::count_triangles(path) {
        Ok(n) if n <= limit => OracleVerdict::pass_val(
            "triangle_budget",
            format!("{n} triangles <= {limit}"),
            n as f64,
        ),
        Ok(n) => OracleVerdict::fail_val(
            "triangle_budget",
            format!("{n} triangles > {limit}"),
            n as f64,
        ),
        Err(e) => OracleVerdict::fail("triangle_budget", format!("cannot reload: {e}")),
    }
}

// ── Aggregate ───────────────────────────────────────────────────────────────

/// Fail with every failed verdict's detail if any verdict failed.
pub fn all_passed(verdicts: &[OracleVerdict]) -> Result<(), HarnessError> {
    let failures: Vec<String> = verdicts
        .iter()
        .filter(|v| !v.passed)
        .map(|v| format!("{}: {}", v.oracle_name, v.detail))
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: failures.join("; "),
        })
    }
}
