use std::collections::BTreeMap;
use std::path::Path;

use print_types::Axis;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ConfigError;

/// Known rule names.
pub mod names {
    pub const MINIMUM_WALL_THICKNESS_MM: &str = "minimum_wall_thickness_mm";
    pub const MINIMUM_FEATURE_SIZE_MM: &str = "minimum_feature_size_mm";
    pub const MINIMUM_HOLE_DIAMETER_MM: &str = "minimum_hole_diameter_mm";
    pub const MINIMUM_CLEARANCE_BETWEEN_PARTS_MM: &str = "minimum_clearance_between_parts_mm";
    pub const MAX_MODEL_SIZE_MM: &str = "max_model_size_mm";
    pub const MANIFOLD_GEOMETRY_REQUIRED: &str = "manifold_geometry_required";
    pub const NO_OPEN_EDGES: &str = "no_open_edges";
    pub const NO_INTERSECTING_GEOMETRY: &str = "no_intersecting_geometry";
    pub const MAXIMUM_FILE_TRIANGLE_COUNT: &str = "maximum_file_triangle_count";
    pub const OVERHANG_MAX_ANGLE_DEG: &str = "overhang_max_angle_deg";
    pub const PREFERRED_FILE_FORMAT: &str = "preferred_file_format";
    pub const ALTERNATE_FILE_FORMATS: &str = "alternate_file_formats";
}

/// Comparison semantic of a known rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Model value must be at least the threshold.
    Scalar,
    /// Each axis of the model value must be at most its bound.
    AxisBounds,
    /// Structural check switch.
    Flag,
    /// Upper bound on a derived count.
    Count,
    /// Upper bound on a measured quantity.
    Maximum,
    /// A single file format name.
    Format,
    /// A list of file format names.
    Formats,
}

impl RuleKind {
    /// Kind of a known rule name, or `None` for names this crate does not evaluate.
    pub fn of(name: &str) -> Option<RuleKind> {
        use names::*;
        let kind = match name {
            MINIMUM_WALL_THICKNESS_MM
            | MINIMUM_FEATURE_SIZE_MM
            | MINIMUM_HOLE_DIAMETER_MM
            | MINIMUM_CLEARANCE_BETWEEN_PARTS_MM => RuleKind::Scalar,
            MAX_MODEL_SIZE_MM => RuleKind::AxisBounds,
            MANIFOLD_GEOMETRY_REQUIRED | NO_OPEN_EDGES | NO_INTERSECTING_GEOMETRY => RuleKind::Flag,
            MAXIMUM_FILE_TRIANGLE_COUNT => RuleKind::Count,
            OVERHANG_MAX_ANGLE_DEG => RuleKind::Maximum,
            PREFERRED_FILE_FORMAT => RuleKind::Format,
            ALTERNATE_FILE_FORMATS => RuleKind::Formats,
            _ => return None,
        };
        Some(kind)
    }

    fn expected(self) -> &'static str {
        match self {
            RuleKind::Scalar | RuleKind::Maximum => "a number",
            RuleKind::AxisBounds => "an object of X/Y/Z numbers",
            RuleKind::Flag => "a boolean",
            RuleKind::Count => "a non-negative integer",
            RuleKind::Format => "a string",
            RuleKind::Formats => "a list of strings",
        }
    }
}

/// Threshold of a single rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    Scalar(f64),
    AxisBounds(BTreeMap<Axis, f64>),
    Flag(bool),
    Count(u64),
    Maximum(f64),
    Format(String),
    Formats(Vec<String>),
    /// A key this crate does not know. Kept verbatim, never evaluated.
    Unrecognized(Value),
}

impl RuleSpec {
    fn parse(name: &str, value: Value) -> Result<RuleSpec, ConfigError> {
        let Some(kind) = RuleKind::of(name) else {
            debug!(rule = name, "keeping unrecognized rule");
            return Ok(RuleSpec::Unrecognized(value));
        };
        let invalid = || ConfigError::InvalidRule {
            name: name.to_string(),
            expected: kind.expected(),
        };

        let spec = match kind {
            RuleKind::Scalar => RuleSpec::Scalar(value.as_f64().ok_or_else(invalid)?),
            RuleKind::Maximum => RuleSpec::Maximum(value.as_f64().ok_or_else(invalid)?),
            RuleKind::AxisBounds => {
                let bounds: BTreeMap<Axis, f64> =
                    serde_json::from_value(value).map_err(|_| invalid())?;
                RuleSpec::AxisBounds(bounds)
            }
            RuleKind::Flag => RuleSpec::Flag(value.as_bool().ok_or_else(invalid)?),
            RuleKind::Count => RuleSpec::Count(parse_count(&value).ok_or_else(invalid)?),
            RuleKind::Format => match value {
                Value::String(s) => RuleSpec::Format(s),
                _ => return Err(invalid()),
            },
            RuleKind::Formats => match value {
                Value::Null => RuleSpec::Formats(Vec::new()),
                Value::Array(items) => RuleSpec::Formats(
                    items
                        .into_iter()
                        .map(|item| match item {
                            Value::String(s) => Ok(s),
                            _ => Err(invalid()),
                        })
                        .collect::<Result<_, _>>()?,
                ),
                _ => return Err(invalid()),
            },
        };
        Ok(spec)
    }

    /// JSON form, as it would appear in a rule file.
    pub fn to_value(&self) -> Value {
        match self {
            RuleSpec::Scalar(v) | RuleSpec::Maximum(v) => Value::from(*v),
            RuleSpec::AxisBounds(bounds) => Value::Object(
                bounds
                    .iter()
                    .map(|(axis, limit)| (axis.as_str().to_string(), Value::from(*limit)))
                    .collect(),
            ),
            RuleSpec::Flag(b) => Value::Bool(*b),
            RuleSpec::Count(n) => Value::from(*n),
            RuleSpec::Format(s) => Value::String(s.clone()),
            RuleSpec::Formats(list) => {
                Value::Array(list.iter().cloned().map(Value::String).collect())
            }
            RuleSpec::Unrecognized(v) => v.clone(),
        }
    }
}

/// Counts may be written as `1000000` or `1000000.0`.
fn parse_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

/// An immutable set of printability rules.
///
/// Iteration follows the rule-name order of the underlying map, so the same
/// rule set always evaluates in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    printer: Option<String>,
    rules: BTreeMap<String, RuleSpec>,
    /// Top-level keys other than `printer` and `rules`.
    extra: BTreeMap<String, Value>,
}

impl RuleSet {
    /// Build a rule set directly from parsed specs.
    pub fn new(printer: Option<String>, rules: BTreeMap<String, RuleSpec>) -> Self {
        Self {
            printer,
            rules,
            extra: BTreeMap::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse a rule document: `{"printer": "...", "rules": {...}}`.
    ///
    /// A missing `rules` key yields an empty rule set.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(mut top) = value else {
            return Err(ConfigError::NotAnObject);
        };

        let printer = match top.remove("printer") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(_) => {
                return Err(ConfigError::InvalidField {
                    field: "printer".to_string(),
                    expected: "a string",
                })
            }
        };

        let raw_rules = match top.remove("rules") {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(ConfigError::MissingRules),
        };

        let mut rules = BTreeMap::new();
        for (name, value) in raw_rules {
            let spec = RuleSpec::parse(&name, value)?;
            rules.insert(name, spec);
        }

        Ok(Self {
            printer,
            rules,
            extra: top.into_iter().collect(),
        })
    }

    /// Informational printer name.
    pub fn printer(&self) -> Option<&str> {
        self.printer.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&RuleSpec> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        match self.rules.get(name) {
            Some(RuleSpec::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn maximum(&self, name: &str) -> Option<f64> {
        match self.rules.get(name) {
            Some(RuleSpec::Maximum(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn count(&self, name: &str) -> Option<u64> {
        match self.rules.get(name) {
            Some(RuleSpec::Count(n)) => Some(*n),
            _ => None,
        }
    }

    /// True only when the flag rule is present and set.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.rules.get(name), Some(RuleSpec::Flag(true)))
    }

    pub fn axis_bounds(&self, name: &str) -> Option<&BTreeMap<Axis, f64>> {
        match self.rules.get(name) {
            Some(RuleSpec::AxisBounds(bounds)) => Some(bounds),
            _ => None,
        }
    }

    /// Allowed export extensions: preferred first, then alternates.
    ///
    /// Lower-cased with any leading dot stripped; empty names are dropped.
    pub fn allowed_formats(&self) -> Vec<String> {
        let mut allowed = Vec::new();
        if let Some(RuleSpec::Format(preferred)) = self.rules.get(names::PREFERRED_FILE_FORMAT) {
            allowed.push(preferred.as_str());
        }
        if let Some(RuleSpec::Formats(alternates)) = self.rules.get(names::ALTERNATE_FILE_FORMATS)
        {
            allowed.extend(alternates.iter().map(String::as_str));
        }
        allowed
            .into_iter()
            .map(|f| f.trim_start_matches('.').to_lowercase())
            .filter(|f| !f.is_empty())
            .collect()
    }

    /// The rule document this set was loaded from, unknown keys included.
    pub fn to_value(&self) -> Value {
        let mut top: Map<String, Value> = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(printer) = &self.printer {
            top.insert("printer".to_string(), Value::String(printer.clone()));
        }
        top.insert(
            "rules".to_string(),
            Value::Object(
                self.rules
                    .iter()
                    .map(|(name, spec)| (name.clone(), spec.to_value()))
                    .collect(),
            ),
        );
        Value::Object(top)
    }
}

/// Load a rule set from a JSON file.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleSet, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = RuleSet::from_json_str(&json)?;
    debug!(path = %path.display(), count = rules.len(), "loaded rules");
    Ok(rules)
}
