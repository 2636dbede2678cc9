//! Printability rule schema and evaluator.
//!
//! A [`RuleSet`] maps rule names to thresholds; a [`Model`] maps the same
//! names to measured or declared values. [`evaluate`] compares the two and
//! returns human-readable violation messages, with no side effects.

pub mod errors;
pub mod evaluate;
pub mod model;
pub mod rules;

pub use errors::{ConfigError, ValidationError};
pub use evaluate::{evaluate, humanize_rule_name, Validator};
pub use model::{Model, ModelValue};
pub use rules::{load_rules, names, RuleKind, RuleSet, RuleSpec};
