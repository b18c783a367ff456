//! Declarative resource configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::extra_vars::ExtraVars;
use crate::domain::job::DEFAULT_WAIT_TIMEOUT_SECONDS;

/// User-supplied attributes of a job resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResourceConfig {
    pub job_template_id: i64,
    #[serde(default)]
    pub inventory_id: Option<i64>,
    #[serde(default)]
    pub extra_vars: Option<ExtraVars>,
    /// Arbitrary values whose change should launch a new job
    #[serde(default)]
    pub triggers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub wait_for_completion: bool,
    #[serde(default = "default_wait_timeout")]
    pub wait_for_completion_timeout_seconds: u64,
    /// Template to launch when the resource is destroyed
    #[serde(default)]
    pub destroy_job_template_id: Option<i64>,
}

fn default_wait_timeout() -> u64 {
    DEFAULT_WAIT_TIMEOUT_SECONDS
}
