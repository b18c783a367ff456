//! Extra variables passed to a job launch

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extra variables for a job, as a JSON or YAML document
///
/// The text is never rewritten: it is sent to the platform exactly as the caller
/// supplied it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraVars(String);

impl ExtraVars {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Compares two documents by meaning rather than by text
    ///
    /// When both sides parse as JSON the parsed values are compared, so key order and
    /// whitespace do not matter. Anything else (YAML included) falls back to comparing
    /// the trimmed text.
    pub fn semantically_equal(&self, other: &ExtraVars) -> bool {
        match (
            serde_json::from_str::<serde_json::Value>(&self.0),
            serde_json::from_str::<serde_json::Value>(&other.0),
        ) {
            (Ok(left), Ok(right)) => left == right,
            _ => self.0.trim() == other.0.trim(),
        }
    }
}

impl From<String> for ExtraVars {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ExtraVars {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ExtraVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
