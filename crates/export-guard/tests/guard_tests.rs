//! Guarded exports writing real STL files from truck geometry.

use std::rc::Rc;

use cad_probe::primitives::{make_box, make_box_at, make_cylinder_at};
use cad_probe::{TruckAssembly, TruckPart};
use export_guard::{
    EntryPoint, ExportArgs, ExportError, ExportOutput, ExportRegistry, Model, PrintGuard, RuleSet,
    TruckBackend, ValidationOptions,
};

const BAMBU_RULES: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../rules/bambu_printability_rules.json"
);

fn guard(json: &str) -> PrintGuard<TruckBackend> {
    PrintGuard::new(RuleSet::from_json_str(json).unwrap(), TruckBackend::default())
}

#[test]
fn valid_box_is_written_and_reloadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("box.stl");
    let g = guard(
        r#"{"rules": {
            "max_model_size_mm": {"X": 256, "Y": 256, "Z": 256},
            "manifold_geometry_required": true,
            "no_open_edges": true,
            "maximum_file_triangle_count": 1000000,
            "preferred_file_format": "STL"
        }}"#,
    );
    let part = TruckPart::new(make_box(10.0, 10.0, 10.0)).named("cube");
    g.attach_model(&part, Model::new());

    let out = g.export_stl(&part, &ExportArgs::to(&path)).unwrap();
    assert_eq!(out, ExportOutput::Written(path.clone()));
    assert!(mesh_io::count_triangles(&path).unwrap() >= 12);
}

#[test]
fn oversized_box_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.stl");
    let g = guard(r#"{"rules": {"max_model_size_mm": {"X": 5, "Y": 100, "Z": 100}}}"#);
    let part = TruckPart::new(make_box(10.0, 1.0, 1.0));
    // The declared size is overridden by the live bounding box.
    g.attach_model(
        &part,
        Model::new().with_axes("max_model_size_mm", [(print_types::Axis::X, 1.0)]),
    );

    let err = g.export(&part, &ExportArgs::to(&path)).unwrap_err();
    let messages = err.messages().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Model size X 10"), "{messages:?}");
    assert!(!path.exists());
}

#[test]
fn triangle_budget_rolls_back_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dense.stl");
    let g = guard(r#"{"rules": {"maximum_file_triangle_count": 4}}"#);
    let part = TruckPart::new(make_box(1.0, 1.0, 1.0));
    g.attach_model(&part, Model::new());

    let err = g.export_stl(&part, &ExportArgs::to(&path)).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Triangle count "), "{message}");
    assert!(message.ends_with(" exceeds maximum 4"), "{message}");
    assert!(!path.exists());
}

#[test]
fn triangle_budget_applies_without_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unmodelled.stl");
    let g = guard(r#"{"rules": {"maximum_file_triangle_count": 4}}"#);
    let part = TruckPart::new(make_box(1.0, 1.0, 1.0));

    assert!(g.export(&part, &ExportArgs::to(&path)).is_err());
    assert!(!path.exists());
}

#[test]
fn fine_options_tessellate_the_export_finer() {
    let part = TruckPart::new(make_cylinder_at([0.0; 3], 5.0, 10.0).unwrap());
    let triangles = |options: ValidationOptions| {
        let rules = RuleSet::from_json_str(r#"{"rules": {}}"#).unwrap();
        let g = PrintGuard::with_options(rules, options, TruckBackend::default());
        assert_eq!(g.backend().tolerance(), options.tessellation_tolerance);
        let ExportOutput::Bytes(bytes) = g.export_stl(&part, &ExportArgs::new()).unwrap() else {
            panic!("expected in-memory bytes");
        };
        mesh_io::parse_stl(&bytes).unwrap().triangle_count()
    };

    assert!(triangles(ValidationOptions::fine()) > triangles(ValidationOptions::default()));
}

#[test]
fn format_gate_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let g = guard(r#"{"rules": {"preferred_file_format": "3MF", "alternate_file_formats": ["STL"]}}"#);
    let part = TruckPart::new(make_box(1.0, 1.0, 1.0));

    let upper = dir.path().join("part.STL");
    assert!(g.export(&part, &ExportArgs::to(&upper)).is_ok());
    assert!(upper.exists());

    let obj = dir.path().join("part.obj");
    let err = g.export(&part, &ExportArgs::to(&obj)).unwrap_err();
    assert_eq!(err.to_string(), "File format OBJ is not supported");
    assert!(!obj.exists());
}

#[test]
fn backend_refusal_surfaces_as_backend_error() {
    let g = guard(r#"{"rules": {}}"#);
    let part = TruckPart::new(make_box(1.0, 1.0, 1.0));
    let err = g.export_step(&part, &ExportArgs::to("part.step")).unwrap_err();
    assert!(matches!(err, ExportError::Backend(_)));
}

#[test]
fn overlapping_assembly_is_rejected() {
    let g = guard(r#"{"rules": {"no_intersecting_geometry": true}}"#);
    let assembly = TruckAssembly::new(vec![
        TruckPart::new(make_box(2.0, 2.0, 2.0)),
        TruckPart::new(make_box_at([1.0, 1.0, 1.0], 2.0, 2.0, 2.0)),
    ]);
    g.attach_model(&assembly, Model::new());

    let err = g.assembly_save(&assembly, &ExportArgs::new()).unwrap_err();
    assert_eq!(err.to_string(), "Intersecting geometry detected");
}

#[test]
fn bundled_rules_reject_vertical_walls_as_overhang() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("walls.stl");
    let g = PrintGuard::from_file(BAMBU_RULES, TruckBackend::default()).unwrap();
    let part = TruckPart::new(make_box(10.0, 10.0, 10.0));
    g.attach_model(&part, Model::new());

    let err = g.export_stl(&part, &ExportArgs::to(&path)).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Overhang angle "), "{message}");
    assert!(message.ends_with(" exceeds maximum 45"), "{message}");
    assert!(!path.exists());
}

#[test]
fn registry_wraps_truck_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patched.stl");
    let g = guard(r#"{"rules": {"minimum_wall_thickness_mm": 0.8}}"#);
    let part = TruckPart::new(make_box(1.0, 1.0, 1.0));
    g.attach_model(&part, Model::new().with_scalar("minimum_wall_thickness_mm", 0.4));

    let mut registry = ExportRegistry::from_backend(Rc::new(TruckBackend::default()));
    registry.enable(g.save_validator());
    let err = registry
        .call(EntryPoint::ShapeStl, &part, &ExportArgs::to(&path))
        .unwrap_err();
    assert_eq!(
        err.messages().unwrap(),
        ["Minimum wall thickness mm 0.4 is below minimum 0.8".to_string()]
    );
    assert!(!path.exists());

    registry.disable();
    registry
        .call(EntryPoint::ShapeStl, &part, &ExportArgs::to(&path))
        .unwrap();
    assert!(path.exists());
}
