//! Orchestrator scenarios against the recording backend.
//!
//! Each scenario drives a `GuardedExporter` and checks what reached the
//! backend and what is left on disk.

use std::rc::Rc;

use cad_probe::{Capability, MockPart};
use export_guard::{EntryPoint, ExportArgs, ExportError, GuardedExporter, Model, SaveValidator};
use print_rules::names;
use print_types::Axis;
use test_harness::fixtures::*;
use test_harness::oracle::*;
use test_harness::RecordingBackend;

fn exporter(rules: print_rules::RuleSet, triangles: usize) -> GuardedExporter<RecordingBackend> {
    GuardedExporter::new(
        Rc::new(SaveValidator::from_rules(rules)),
        RecordingBackend::new(triangles),
    )
}

// ── Scenario 1: gate on every entry point ───────────────────────────────

#[test]
fn thin_wall_blocks_every_entry_point() {
    let dir = tempfile::tempdir().unwrap();
    let ex = exporter(wall_rules(), 12);
    let part = MockPart::cuboid([0.0; 3], [1.0; 3]);
    ex.validator().attach_model(&part, thin_wall_model());

    for entry in EntryPoint::ALL {
        let path = dir.path().join(format!("{entry}.stl"));
        let result = ex.call(entry, &part, &ExportArgs::to(&path));
        all_passed(&[
            check_rejected_with(&result, &["Minimum wall thickness mm 0.5 is below minimum 0.8"]),
            check_artifact_absent(&path),
        ])
        .unwrap_or_else(|e| panic!("{entry}: {e}"));
    }
    check_backend_untouched(ex.backend()).into_result().unwrap();
}

#[test]
fn named_methods_route_to_their_entry_points() {
    let ex = exporter(wall_rules(), 1);
    let part = MockPart::cuboid([0.0; 3], [1.0; 3]);
    let args = ExportArgs::new();

    ex.export(&part, &args).unwrap();
    ex.cq_export(&part, &args).unwrap();
    ex.export_stl(&part, &args).unwrap();
    ex.export_step(&part, &args).unwrap();
    ex.export_bin(&part, &args).unwrap();
    ex.export_brep(&part, &args).unwrap();
    ex.assembly_export(&part, &args).unwrap();
    ex.assembly_save(&part, &args).unwrap();

    let entries: Vec<EntryPoint> = ex.backend().calls().iter().map(|c| c.entry).collect();
    assert_eq!(entries, EntryPoint::ALL.to_vec());
}

// ── Scenario 2: pass-through ────────────────────────────────────────────

#[test]
fn objects_without_model_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.stl");
    let ex = exporter(structural_rules(), 12);
    // Would fail every structural check if it were validated.
    let part = MockPart::cuboid([0.0; 3], [500.0; 3]).with_validity(false, false);

    let result = ex.export(&part, &ExportArgs::to(&path));
    check_accepted(&result).into_result().unwrap();
    check_backend_calls(ex.backend(), 1).into_result().unwrap();
    assert!(path.exists());
}

#[test]
fn satisfied_model_passes_through() {
    let ex = exporter(wall_rules(), 12);
    let part = MockPart::cuboid([0.0; 3], [1.0; 3]);
    ex.validator().attach_model(&part, thick_wall_model());

    check_accepted(&ex.export_stl(&part, &ExportArgs::new()))
        .into_result()
        .unwrap();
    check_backend_calls(ex.backend(), 1).into_result().unwrap();
}

#[test]
fn detached_model_no_longer_gates() {
    let ex = exporter(wall_rules(), 1);
    let part = MockPart::cuboid([0.0; 3], [1.0; 3]);
    ex.validator().attach_model(&part, thin_wall_model());
    assert!(ex.export(&part, &ExportArgs::new()).is_err());

    ex.validator().detach_model(&part);
    assert!(ex.export(&part, &ExportArgs::new()).is_ok());
}

// ── Scenario 3: post-write rollback ─────────────────────────────────────

#[test]
fn over_budget_stl_is_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dense.stl");
    let ex = exporter(triangle_limit_rules(100), 150);

    let result = ex.export_stl(&part_with_model(&ex), &ExportArgs::to(&path));
    all_passed(&[
        check_rejected_with(&result, &["Triangle count 150 exceeds maximum 100"]),
        check_artifact_absent(&path),
        check_backend_calls(ex.backend(), 1),
    ])
    .unwrap();
}

#[test]
fn within_budget_stl_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("light.stl");
    let ex = exporter(triangle_limit_rules(100), 100);

    let result = ex.export(&part_with_model(&ex), &ExportArgs::to(&path));
    all_passed(&[check_accepted(&result), check_triangle_budget(&path, 100)]).unwrap();
}

#[test]
fn ascii_artifacts_are_counted_too() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dense_ascii.stl");
    let ex = GuardedExporter::new(
        Rc::new(SaveValidator::from_rules(triangle_limit_rules(10))),
        RecordingBackend::new(11).ascii(),
    );

    let result = ex.export(&MockPart::cuboid([0.0; 3], [1.0; 3]), &ExportArgs::to(&path));
    check_rejected_with(&result, &["Triangle count 11 exceeds maximum 10"])
        .into_result()
        .unwrap();
    assert!(!path.exists());
}

#[test]
fn unreadable_stl_is_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.stl");
    let ex = GuardedExporter::new(
        Rc::new(SaveValidator::from_rules(triangle_limit_rules(10))),
        RecordingBackend::new(1).malformed(),
    );

    let result = ex.export(&part_with_model(&ex), &ExportArgs::to(&path));
    match &result {
        Err(ExportError::MeshReload { path: reported, .. }) => assert_eq!(reported, &path),
        other => panic!("expected mesh reload failure, got {other:?}"),
    }
    all_passed(&[check_artifact_absent(&path), check_backend_calls(ex.backend(), 1)]).unwrap();
}

#[test]
fn non_mesh_artifacts_skip_triangle_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("part.step");
    let ex = exporter(triangle_limit_rules(1), 500);

    let result = ex.export_step(&part_with_model(&ex), &ExportArgs::to(&path));
    check_accepted(&result).into_result().unwrap();
    assert!(path.exists());
}

#[test]
fn destination_keyword_wins_over_positional() {
    let dir = tempfile::tempdir().unwrap();
    let keyword = dir.path().join("keyword.stl");
    let positional = dir.path().join("positional.stl");
    let ex = exporter(triangle_limit_rules(5), 6);

    let args = ExportArgs::to(&positional).kwarg("fileName", keyword.clone());
    assert!(ex.export(&part_with_model(&ex), &args).is_err());
    assert!(!keyword.exists());
    assert_eq!(ex.backend().calls()[0].destination.as_deref(), Some(keyword.as_path()));
}

fn part_with_model(ex: &GuardedExporter<RecordingBackend>) -> MockPart {
    let part = MockPart::cuboid([0.0; 3], [1.0; 3]);
    ex.validator().attach_model(&part, Model::new());
    part
}

// ── Scenario 4: format gate ─────────────────────────────────────────────

#[test]
fn format_gate_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let ex = exporter(format_rules(), 4);
    let part = MockPart::cuboid([0.0; 3], [1.0; 3]);

    for name in ["a.3mf", "b.3MF", "c.Stl", "d.STEP"] {
        let path = dir.path().join(name);
        check_accepted(&ex.export(&part, &ExportArgs::to(&path)))
            .into_result()
            .unwrap_or_else(|e| panic!("{name}: {e}"));
    }

    let path = dir.path().join("e.obj");
    let result = ex.export(&part, &ExportArgs::to(&path));
    check_rejected_with(&result, &["File format OBJ is not supported"])
        .into_result()
        .unwrap();
    check_backend_calls(ex.backend(), 4).into_result().unwrap();
}

#[test]
fn format_gate_runs_after_model_checks() {
    let rules = print_rules::RuleSet::from_json_str(
        r#"{"rules": {"minimum_wall_thickness_mm": 0.8, "preferred_file_format": "STL"}}"#,
    )
    .unwrap();
    let ex = exporter(rules, 1);
    let part = MockPart::cuboid([0.0; 3], [1.0; 3]);
    ex.validator().attach_model(&part, thin_wall_model());

    let result = ex.export(&part, &ExportArgs::to("part.obj"));
    check_rejected_with(&result, &["Minimum wall thickness mm 0.5 is below minimum 0.8"])
        .into_result()
        .unwrap();
}

// ── Scenario 5: live measurements ───────────────────────────────────────

#[test]
fn live_bounding_box_overrides_declared_size() {
    let ex = exporter(structural_rules(), 1);
    let part = flat_part();
    // Declared oversized, but the live box is a unit cube.
    ex.validator().attach_model(
        &part,
        Model::new().with_axes(names::MAX_MODEL_SIZE_MM, [(Axis::X, 900.0)]),
    );
    check_accepted(&ex.export(&part, &ExportArgs::new()))
        .into_result()
        .unwrap();

    let big = MockPart::cuboid([0.0; 3], [150.0, 1.0, 1.0]).with_faces(vec![]);
    ex.validator().attach_model(&big, Model::new());
    let result = ex.export(&big, &ExportArgs::new());
    check_rejected_with(&result, &["Model size X 150 exceeds maximum 100"])
        .into_result()
        .unwrap();
}

#[test]
fn structural_checks_run_in_order() {
    let ex = exporter(structural_rules(), 1);
    let cases: Vec<(MockPart, &str)> = vec![
        (
            flat_part().with_validity(false, false).with_open_edges(vec![1]),
            "Non-manifold geometry detected",
        ),
        (flat_part().with_open_edges(vec![1]), "Object contains open edges"),
        (MockPart::cuboid([0.0; 3], [1.0; 3]), "Overhang angle 90 exceeds maximum 45"),
    ];
    for (part, expected) in cases {
        ex.validator().attach_model(&part, Model::new());
        check_rejected_with(&ex.export(&part, &ExportArgs::new()), &[expected])
            .into_result()
            .unwrap();
    }
    check_backend_untouched(ex.backend()).into_result().unwrap();
}

#[test]
fn assemblies_check_clearance() {
    let ex = exporter(structural_rules(), 1);

    let tight = spaced_pair(0.25);
    ex.validator().attach_model(&tight, Model::new());
    check_rejected_with(
        &ex.assembly_save(&tight, &ExportArgs::new()),
        &["Clearance 0.25 below minimum 0.5"],
    )
    .into_result()
    .unwrap();

    let roomy = spaced_pair(2.0);
    ex.validator().attach_model(&roomy, Model::new());
    check_accepted(&ex.assembly_save(&roomy, &ExportArgs::new()))
        .into_result()
        .unwrap();
}

#[test]
fn overlapping_assembly_is_intersecting() {
    let ex = exporter(structural_rules(), 1);
    let overlap = spaced_pair(-0.5);
    ex.validator().attach_model(&overlap, Model::new());
    check_rejected_with(
        &ex.assembly_export(&overlap, &ExportArgs::new()),
        &["Intersecting geometry detected"],
    )
    .into_result()
    .unwrap();
}

#[test]
fn missing_capabilities_are_skipped() {
    let ex = exporter(structural_rules(), 1);
    let part = MockPart::cuboid([0.0; 3], [1.0; 3])
        .without(Capability::Manifoldness)
        .without(Capability::OpenEdges)
        .without(Capability::Faces);
    ex.validator().attach_model(&part, Model::new());
    check_accepted(&ex.export(&part, &ExportArgs::new()))
        .into_result()
        .unwrap();
}
