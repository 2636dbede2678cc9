//! Rule sets, models and parts shared by the scenario tests.

use std::path::PathBuf;

use cad_probe::{MockAssembly, MockFace, MockPart};
use print_rules::{load_rules, names, Model, RuleSet};
use serde_json::json;

use crate::helpers::HarnessError;

/// Path of the rule file shipped with the workspace.
pub fn bundled_rules_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../rules/bambu_printability_rules.json")
}

pub fn bundled_rules() -> Result<RuleSet, HarnessError> {
    load_rules(bundled_rules_path()).map_err(|e| HarnessError::Fixture(e.to_string()))
}

fn rules_from(value: serde_json::Value) -> RuleSet {
    match RuleSet::from_value(value) {
        Ok(rules) => rules,
        Err(e) => panic!("fixture rule set is malformed: {e}"),
    }
}

/// Only a minimum wall thickness of 0.8 mm.
pub fn wall_rules() -> RuleSet {
    rules_from(json!({
        "printer": "Fixture",
        "rules": { "minimum_wall_thickness_mm": 0.8 }
    }))
}

/// Only a triangle budget.
pub fn triangle_limit_rules(limit: u64) -> RuleSet {
    rules_from(json!({
        "rules": { "maximum_file_triangle_count": limit }
    }))
}

/// Allowed formats: 3MF preferred, STL and STEP as alternates.
pub fn format_rules() -> RuleSet {
    rules_from(json!({
        "rules": {
            "preferred_file_format": "3MF",
            "alternate_file_formats": ["STL", "STEP"]
        }
    }))
}

/// Every structural check plus size and clearance limits.
pub fn structural_rules() -> RuleSet {
    rules_from(json!({
        "rules": {
            "max_model_size_mm": { "X": 100, "Y": 100, "Z": 100 },
            "manifold_geometry_required": true,
            "no_open_edges": true,
            "no_intersecting_geometry": true,
            "minimum_clearance_between_parts_mm": 0.5,
            "overhang_max_angle_deg": 45
        }
    }))
}

pub fn thin_wall_model() -> Model {
    Model::new().with_scalar(names::MINIMUM_WALL_THICKNESS_MM, 0.5)
}

pub fn thick_wall_model() -> Model {
    Model::new().with_scalar(names::MINIMUM_WALL_THICKNESS_MM, 1.2)
}

/// Unit cube at the origin whose faces all point up or down, so it has no
/// overhang beyond 0°.
pub fn flat_part() -> MockPart {
    MockPart::cuboid([0.0; 3], [1.0; 3]).with_faces(vec![
        MockFace::computed([0.0, 0.0, 1.0]),
        MockFace::computed([0.0, 0.0, -1.0]),
    ])
}

/// Two flat unit cubes separated along X by `gap`.
pub fn spaced_pair(gap: f64) -> MockAssembly {
    let x0 = 1.0 + gap;
    MockAssembly::new(vec![
        flat_part().named("left"),
        MockPart::cuboid([x0, 0.0, 0.0], [x0 + 1.0, 1.0, 1.0])
            .with_faces(vec![MockFace::computed([0.0, 0.0, 1.0])])
            .named("right"),
    ])
}
