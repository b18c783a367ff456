//! Job DTOs for the automation platform API

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::extra_vars::ExtraVars;
use crate::domain::status::JobStatus;

/// Body sent to a job template's launch endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchJobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_vars: Option<ExtraVars>,
    pub inventory: i64,
}

impl LaunchJobRequest {
    /// Builds a launch body, dropping blank extra variables
    pub fn new(extra_vars: Option<&ExtraVars>, inventory: i64) -> Self {
        Self {
            extra_vars: extra_vars.filter(|vars| !vars.is_empty()).cloned(),
            inventory,
        }
    }
}

/// Job as returned by the launch and job detail endpoints
///
/// Every field is optional on the wire; missing or `null` fields take their zero
/// value. The platform nulls `inventory` and `job_template` once they are deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobApiModel {
    #[serde(deserialize_with = "null_as_default")]
    pub job_template: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub job_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: JobStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub inventory: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub extra_vars: String,
    pub ignored_fields: Option<Map<String, Value>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl JobApiModel {
    /// Parses a response body
    pub fn from_body(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}
