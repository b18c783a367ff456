//! Launch controller
//!
//! Turns a job record into a launch request against its job template and the
//! platform's answer into a freshly launched record. Every call creates a new job
//! on the platform; nothing is looked up or reused.

use launchpad_client::{Method, RemoteApi, launch_path};
use launchpad_core::domain::job::JobRecord;
use launchpad_core::dto::job::{JobApiModel, LaunchJobRequest};
use launchpad_core::ignored::IgnoredFieldReporter;
use tracing::{debug, info};

use crate::error::{JobError, Result};

/// Status code the launch endpoint answers with on success
const LAUNCH_SUCCESS_STATUS: u16 = 201;

pub struct LaunchController<'a> {
    client: &'a dyn RemoteApi,
    reporter: IgnoredFieldReporter,
}

impl<'a> LaunchController<'a> {
    pub fn new(client: &'a dyn RemoteApi, reporter: IgnoredFieldReporter) -> Self {
        Self { client, reporter }
    }

    /// Encodes the launch body for `record`
    ///
    /// Only the extra variables and the resolved inventory are sent.
    pub fn request_body(record: &JobRecord) -> Result<Vec<u8>> {
        let request =
            LaunchJobRequest::new(record.extra_vars.as_ref(), record.resolved_inventory_id());
        serde_json::to_vec(&request).map_err(JobError::Encode)
    }

    /// Launches a new job from `record.job_template_id`
    ///
    /// # Arguments
    /// * `record` - The caller's inputs; platform-reported fields are ignored
    ///
    /// # Returns
    /// A new record carrying the job URL, type, status and ignored fields
    pub async fn launch(&self, record: &JobRecord) -> Result<JobRecord> {
        if record.job_template_id <= 0 {
            return Err(JobError::InvalidTemplate(record.job_template_id));
        }

        let body = Self::request_body(record)?;
        let path = launch_path(self.client.base_endpoint(), record.job_template_id);

        debug!(
            "Launching job template {} with inventory {}",
            record.job_template_id,
            record.resolved_inventory_id()
        );

        let response = self
            .client
            .request(Method::POST, &path, Some(body))
            .await
            .map_err(|source| JobError::Transport {
                path: path.clone(),
                source,
            })?;

        if response.status != LAUNCH_SUCCESS_STATUS {
            return Err(JobError::UnexpectedStatus {
                path,
                status: response.status,
                expected: LAUNCH_SUCCESS_STATUS,
                body: response.body,
            });
        }

        let model = JobApiModel::from_body(&response.body).map_err(|source| JobError::Parse {
            path: path.clone(),
            body: response.body.clone(),
            source,
        })?;

        let launched = record.launched(model, &self.reporter);
        info!(
            "Launched job {} from template {} (status: {})",
            launched.url, launched.job_template_id, launched.status
        );

        Ok(launched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedApi, job_body};
    use launchpad_core::domain::extra_vars::ExtraVars;
    use launchpad_core::domain::status::JobStatus;
    use launchpad_core::dto::resource::JobResourceConfig;
    use serde_json::json;

    fn record(template: i64, inventory: Option<i64>) -> JobRecord {
        JobRecord::from_config(&JobResourceConfig {
            job_template_id: template,
            inventory_id: inventory,
            extra_vars: Some(ExtraVars::new("region: eu\n")),
            triggers: None,
            wait_for_completion: false,
            wait_for_completion_timeout_seconds: 120,
            destroy_job_template_id: None,
        })
    }

    #[tokio::test]
    async fn test_launch_defaults_inventory_to_one() {
        let api = ScriptedApi::new().on_launch(201, job_body("/jobs/1/", "pending", 7, 1));
        let controller = LaunchController::new(&api, IgnoredFieldReporter::default());

        controller.launch(&record(7, Some(0))).await.unwrap();

        let calls = api.launch_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/api/controller/v2/job_templates/7/launch");
        assert_eq!(
            calls[0].body,
            Some(json!({ "extra_vars": "region: eu\n", "inventory": 1 }))
        );
    }

    #[tokio::test]
    async fn test_launch_uses_given_inventory() {
        let api = ScriptedApi::new().on_launch(201, job_body("/jobs/1/", "pending", 7, 5));
        let controller = LaunchController::new(&api, IgnoredFieldReporter::default());

        controller.launch(&record(7, Some(5))).await.unwrap();

        assert_eq!(api.launch_calls()[0].body.as_ref().unwrap()["inventory"], 5);
    }

    #[tokio::test]
    async fn test_launch_parses_response() {
        let api = ScriptedApi::new().on_launch_raw(
            201,
            r#"{"url": "/jobs/42/", "status": "pending", "job_type": "run",
                "job_template": 7, "inventory": 1}"#,
        );
        let controller = LaunchController::new(&api, IgnoredFieldReporter::default());

        let job = controller.launch(&record(7, None)).await.unwrap();

        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.url, "/jobs/42/");
        assert_eq!(job.job_template_id, 7);
        assert_eq!(job.job_type, "run");
        assert_eq!(job.extra_vars, Some(ExtraVars::new("region: eu\n")));
    }

    #[tokio::test]
    async fn test_launch_reports_ignored_fields() {
        let mut body = job_body("/jobs/42/", "pending", 7, 1);
        body["ignored_fields"] = json!({ "inventory": 3 });
        let api = ScriptedApi::new().on_launch(201, body);
        let controller = LaunchController::new(&api, IgnoredFieldReporter::default());

        let job = controller.launch(&record(7, Some(3))).await.unwrap();

        assert_eq!(job.ignored_fields, Some(vec!["inventory".to_string()]));
    }

    #[tokio::test]
    async fn test_launch_rejects_other_success_codes() {
        let api = ScriptedApi::new().on_launch(200, job_body("/jobs/42/", "pending", 7, 1));
        let controller = LaunchController::new(&api, IgnoredFieldReporter::default());

        let err = controller.launch(&record(7, None)).await.unwrap_err();

        assert!(matches!(err, JobError::UnexpectedStatus { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_launch_error_carries_body() {
        let api = ScriptedApi::new().on_launch_raw(400, r#"{"inventory": ["Invalid pk"]}"#);
        let controller = LaunchController::new(&api, IgnoredFieldReporter::default());

        let err = controller.launch(&record(7, Some(99))).await.unwrap_err();

        match err {
            JobError::UnexpectedStatus { status, body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid pk"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_launch_malformed_body() {
        let api = ScriptedApi::new().on_launch_raw(201, "<html>proxy error</html>");
        let controller = LaunchController::new(&api, IgnoredFieldReporter::default());

        let err = controller.launch(&record(7, None)).await.unwrap_err();

        assert!(matches!(err, JobError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_launch_transport_error() {
        let api = ScriptedApi::new().on_launch_error();
        let controller = LaunchController::new(&api, IgnoredFieldReporter::default());

        let err = controller.launch(&record(7, None)).await.unwrap_err();

        assert!(matches!(err, JobError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_launch_requires_positive_template() {
        let api = ScriptedApi::new();
        let controller = LaunchController::new(&api, IgnoredFieldReporter::default());

        let err = controller.launch(&record(0, None)).await.unwrap_err();

        assert!(matches!(err, JobError::InvalidTemplate(0)));
        assert!(api.calls().is_empty());
    }
}
