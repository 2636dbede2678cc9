use std::collections::BTreeMap;

use print_types::{Axis, BoundingBox};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One measured or declared value of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelValue {
    Scalar(f64),
    Axes(BTreeMap<Axis, f64>),
    /// Anything else. Never matches a rule, so it is skipped during evaluation.
    Other(Value),
}

impl ModelValue {
    /// Axis lengths of a bounding box.
    pub fn from_bounding_box(bbox: &BoundingBox) -> Self {
        ModelValue::Axes(bbox.extents().into_iter().collect())
    }
}

impl From<f64> for ModelValue {
    fn from(v: f64) -> Self {
        ModelValue::Scalar(v)
    }
}

/// Printability data attached to one CAD object, keyed by rule name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model {
    values: BTreeMap<String, ModelValue>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builder-style scalar insert.
    pub fn with_scalar(mut self, name: &str, value: f64) -> Self {
        self.insert(name, ModelValue::Scalar(value));
        self
    }

    /// Builder-style per-axis insert.
    pub fn with_axes(mut self, name: &str, axes: impl IntoIterator<Item = (Axis, f64)>) -> Self {
        self.insert(name, ModelValue::Axes(axes.into_iter().collect()));
        self
    }

    pub fn insert(&mut self, name: &str, value: ModelValue) -> Option<ModelValue> {
        self.values.insert(name.to_string(), value)
    }

    pub fn get(&self, name: &str) -> Option<&ModelValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
