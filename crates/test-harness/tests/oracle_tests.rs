//! Tests for verification oracles.

use export_guard::{BackendError, ExportError, ExportOutput, ValidationError};
use mesh_io::StlEncoding;
use test_harness::helpers::strip_mesh;
use test_harness::oracle::*;
use test_harness::RecordingBackend;

#[test]
fn rejected_with_compares_every_message() {
    let result: Result<ExportOutput, ExportError> = Err(ValidationError::new(vec![
        "a".to_string(),
        "b".to_string(),
    ])
    .into());
    assert!(check_rejected_with(&result, &["a", "b"]).passed);
    assert!(!check_rejected_with(&result, &["a"]).passed);
}

#[test]
fn rejected_with_fails_on_backend_error_or_success() {
    let backend: Result<ExportOutput, ExportError> =
        Err(BackendError::Kernel("boom".to_string()).into());
    let verdict = check_rejected_with(&backend, &["boom"]);
    assert!(!verdict.passed);
    assert!(verdict.detail.contains("boom"), "{}", verdict.detail);

    let ok: Result<ExportOutput, ExportError> = Ok(ExportOutput::Done);
    assert!(!check_rejected_with(&ok, &[]).passed);
    assert!(check_accepted(&ok).passed);
}

#[test]
fn triangle_budget_reads_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strip.stl");
    mesh_io::save_stl(&strip_mesh(9), &path, StlEncoding::Binary).unwrap();

    let within = check_triangle_budget(&path, 9);
    assert!(within.passed);
    assert_eq!(within.value, Some(9.0));
    assert!(!check_triangle_budget(&path, 8).passed);
    assert!(!check_triangle_budget(&dir.path().join("missing.stl"), 8).passed);
}

#[test]
fn artifact_absent_and_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("present.txt");
    std::fs::write(&path, "x").unwrap();

    let verdicts = [
        check_artifact_absent(&dir.path().join("nope")),
        check_artifact_absent(&path),
        check_backend_untouched(&RecordingBackend::new(1)),
    ];
    let err = all_passed(&verdicts).unwrap_err().to_string();
    assert!(err.contains("artifact_absent"), "{err}");
    assert!(!err.contains("backend_untouched"), "{err}");
}
