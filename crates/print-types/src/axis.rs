use std::fmt;

use serde::{Deserialize, Serialize};

/// A principal build-space axis.
///
/// Serialized as the upper-case letter used in rule files (`"X"`, `"Y"`, `"Z"`);
/// lower-case spellings are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "X", alias = "x")]
    X,
    #[serde(rename = "Y", alias = "y")]
    Y,
    #[serde(rename = "Z", alias = "z")]
    Z,
}

impl Axis {
    /// All axes in canonical order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into an `[f64; 3]`.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
