//! Job domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::extra_vars::ExtraVars;
use crate::domain::status::JobStatus;
use crate::dto::job::JobApiModel;
use crate::dto::resource::JobResourceConfig;
use crate::ignored::IgnoredFieldReporter;

/// Inventory used when the caller does not name one
pub const DEFAULT_INVENTORY_ID: i64 = 1;

/// Default wait bound for `wait_for_completion`, in seconds
pub const DEFAULT_WAIT_TIMEOUT_SECONDS: u64 = 120;

/// Job resource record
///
/// Holds both the caller's inputs and the state reported by the platform for the
/// job launched from them. Records are treated as immutable snapshots: refreshing
/// from a status response yields a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_template_id: i64,
    #[serde(default)]
    pub job_type: String,
    /// Host-relative locator of the job, assigned at launch
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub inventory_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_vars: Option<ExtraVars>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub wait_for_completion: bool,
    #[serde(default = "default_wait_timeout")]
    pub wait_for_completion_timeout_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroy_job_template_id: Option<i64>,
}

fn default_wait_timeout() -> u64 {
    DEFAULT_WAIT_TIMEOUT_SECONDS
}

impl JobRecord {
    /// Creates an unlaunched record from a resource configuration
    pub fn from_config(config: &JobResourceConfig) -> Self {
        Self {
            job_template_id: config.job_template_id,
            job_type: String::new(),
            url: String::new(),
            status: JobStatus::default(),
            inventory_id: config.inventory_id.unwrap_or_default(),
            extra_vars: config.extra_vars.clone(),
            ignored_fields: None,
            triggers: config.triggers.clone(),
            wait_for_completion: config.wait_for_completion,
            wait_for_completion_timeout_seconds: config.wait_for_completion_timeout_seconds,
            destroy_job_template_id: config.destroy_job_template_id,
        }
    }

    /// Inventory the launch request will target
    ///
    /// Zero means "not specified" and resolves to [`DEFAULT_INVENTORY_ID`].
    pub fn resolved_inventory_id(&self) -> i64 {
        if self.inventory_id == 0 {
            DEFAULT_INVENTORY_ID
        } else {
            self.inventory_id
        }
    }

    /// Returns `true` once the platform has assigned a locator to this job
    pub fn is_launched(&self) -> bool {
        !self.url.is_empty()
    }

    /// Cleanup template to launch on teardown, if one is configured
    ///
    /// Zero and negative ids mean "none".
    pub fn destroy_template(&self) -> Option<i64> {
        self.destroy_job_template_id.filter(|id| *id > 0)
    }

    /// Builds the request record for the cleanup job
    ///
    /// Reuses inventory, extra variables and wait settings; everything the platform
    /// reports is left empty. Returns `None` when no cleanup template is configured.
    pub fn destroy_job(&self) -> Option<JobRecord> {
        let template_id = self.destroy_template()?;
        Some(JobRecord {
            job_template_id: template_id,
            job_type: String::new(),
            url: String::new(),
            status: JobStatus::default(),
            inventory_id: self.inventory_id,
            extra_vars: self.extra_vars.clone(),
            ignored_fields: None,
            triggers: None,
            wait_for_completion: self.wait_for_completion,
            wait_for_completion_timeout_seconds: self.wait_for_completion_timeout_seconds,
            destroy_job_template_id: None,
        })
    }

    /// Record for a freshly launched job
    ///
    /// Takes the locator from the launch response. Caller inputs the platform does
    /// not echo are carried over from `self`.
    pub fn launched(&self, response: JobApiModel, reporter: &IgnoredFieldReporter) -> JobRecord {
        JobRecord {
            url: response.url.clone(),
            ..self.with_response(response, reporter)
        }
    }

    /// Record refreshed from a status response
    ///
    /// The locator is write-once and is never taken from a refresh.
    pub fn refreshed(&self, response: JobApiModel, reporter: &IgnoredFieldReporter) -> JobRecord {
        self.with_response(response, reporter)
    }

    fn with_response(&self, response: JobApiModel, reporter: &IgnoredFieldReporter) -> JobRecord {
        JobRecord {
            job_template_id: response.job_template,
            job_type: response.job_type,
            url: self.url.clone(),
            status: response.status,
            inventory_id: response.inventory,
            extra_vars: self.extra_vars.clone(),
            ignored_fields: reporter.report(response.ignored_fields.as_ref()),
            triggers: self.triggers.clone(),
            wait_for_completion: self.wait_for_completion,
            wait_for_completion_timeout_seconds: self.wait_for_completion_timeout_seconds,
            destroy_job_template_id: self.destroy_job_template_id,
        }
    }
}
