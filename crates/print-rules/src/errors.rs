use std::path::PathBuf;

/// Errors while loading a rule source.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules: {0}")]
    Parse(String),

    #[error("rules source must be a JSON object")]
    NotAnObject,

    #[error("`rules` must be an object mapping rule names to thresholds")]
    MissingRules,

    #[error("invalid value for `{field}`: expected {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    #[error("invalid value for rule `{name}`: expected {expected}")]
    InvalidRule {
        name: String,
        expected: &'static str,
    },
}

/// An object failed printability validation.
///
/// Carries every violation found; displays them joined by `"; "`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .messages.join("; "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// A validation error with a single message.
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}
