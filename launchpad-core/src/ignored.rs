//! Ignored-field reporting
//!
//! The platform answers a launch with the set of submitted fields it did not honor
//! for the job's type. Only the names matter; the values are discarded.

use serde_json::{Map, Value};

/// Internal field names and the name they are reported under
pub const DEFAULT_FIELD_ALIASES: &[(&str, &str)] = &[("inventory", "inventory")];

/// Translates an ignored-fields map into user-facing field names
#[derive(Debug, Clone, Copy)]
pub struct IgnoredFieldReporter {
    aliases: &'static [(&'static str, &'static str)],
}

impl IgnoredFieldReporter {
    pub const fn new(aliases: &'static [(&'static str, &'static str)]) -> Self {
        Self { aliases }
    }

    /// Returns the sorted, translated field names, or `None` when nothing was ignored
    pub fn report(&self, ignored: Option<&Map<String, Value>>) -> Option<Vec<String>> {
        let ignored = ignored.filter(|map| !map.is_empty())?;

        let mut names: Vec<String> = ignored
            .keys()
            .map(|key| self.alias(key).to_string())
            .collect();
        names.sort();
        Some(names)
    }

    fn alias<'a>(&self, field: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(internal, _)| *internal == field)
            .map(|(_, alias)| *alias)
            .unwrap_or(field)
    }
}

impl Default for IgnoredFieldReporter {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_ALIASES)
    }
}
