//! State file handling
//!
//! The resource state is a single JSON-encoded job record. Removing the resource
//! from state deletes the file.

use anyhow::{Context, Result};
use launchpad_core::domain::job::JobRecord;
use launchpad_core::dto::resource::JobResourceConfig;
use launchpad_resource::StateChange;
use std::path::Path;

/// Load a resource configuration file
pub fn load_config(path: &Path) -> Result<JobResourceConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read resource configuration {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse resource configuration {}", path.display()))
}

/// Load the stored record
pub fn load_state(path: &Path) -> Result<JobRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse state file {}", path.display()))
}

/// Apply a lifecycle state change to the state file
pub fn apply(path: &Path, change: &StateChange) -> Result<()> {
    match change {
        StateChange::Set(record) => {
            let raw = serde_json::to_string_pretty(record).context("Failed to encode state")?;
            std::fs::write(path, raw)
                .with_context(|| format!("Failed to write state file {}", path.display()))
        }
        StateChange::Remove => {
            if path.exists() {
                std::fs::remove_file(path)
                    .with_context(|| format!("Failed to remove state file {}", path.display()))?;
            }
            Ok(())
        }
        StateChange::Keep => Ok(()),
    }
}
