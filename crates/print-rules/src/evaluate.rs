use std::path::Path;

use tracing::{debug, instrument};

use crate::errors::{ConfigError, ValidationError};
use crate::model::{Model, ModelValue};
use crate::rules::{load_rules, RuleSet, RuleSpec};

/// Compare a model against a rule set.
///
/// Returns one message per violation, in rule iteration order and then axis
/// order. A rule the model has no value for is skipped, as is any value whose
/// shape does not fit the rule. Pure: no geometry access, no side effects.
pub fn evaluate(model: &Model, rules: &RuleSet) -> Vec<String> {
    let mut errors = Vec::new();

    for (name, spec) in rules.iter() {
        let Some(value) = model.get(name) else {
            continue;
        };

        match (spec, value) {
            (RuleSpec::Scalar(minimum), ModelValue::Scalar(actual)) => {
                if actual < minimum {
                    errors.push(format!(
                        "{} {} is below minimum {}",
                        humanize_rule_name(name),
                        actual,
                        minimum
                    ));
                }
            }
            (RuleSpec::AxisBounds(limits), ModelValue::Axes(actual)) => {
                for (axis, limit) in limits {
                    if let Some(v) = actual.get(axis) {
                        if v > limit {
                            errors.push(format!("Model size {axis} {v} exceeds maximum {limit}"));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    errors
}

/// `minimum_wall_thickness_mm` -> `Minimum wall thickness mm`.
pub fn humanize_rule_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Holds a rule set and validates models against it.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: RuleSet,
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(load_rules(path)?))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// All violation messages; empty when the model is valid.
    pub fn validate(&self, model: &Model) -> Vec<String> {
        evaluate(model, &self.rules)
    }

    /// Like [`Validator::validate`], but fails on the first call with any violation.
    #[instrument(skip_all)]
    pub fn check(&self, model: &Model) -> Result<(), ValidationError> {
        let errors = self.validate(model);
        if errors.is_empty() {
            Ok(())
        } else {
            debug!(count = errors.len(), "model failed validation");
            Err(ValidationError::new(errors))
        }
    }
}
