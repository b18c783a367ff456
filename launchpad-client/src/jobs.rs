//! Job-related API endpoints

use launchpad_core::dto::job::JobApiModel;

use crate::AutomationClient;
use crate::api::RemoteApi;
use crate::error::{ClientError, Result};

/// Path of a job template's launch endpoint
///
/// # Example
/// ```
/// assert_eq!(
///     launchpad_client::launch_path("/api/controller/v2", 7),
///     "/api/controller/v2/job_templates/7/launch"
/// );
/// ```
pub fn launch_path(base_endpoint: &str, template_id: i64) -> String {
    format!(
        "{}/job_templates/{}/launch",
        base_endpoint.trim_end_matches('/'),
        template_id
    )
}

impl AutomationClient {
    /// Get a job by its URL
    ///
    /// # Arguments
    /// * `url` - The host-relative job URL returned at launch
    ///
    /// # Returns
    /// The job details
    pub async fn get_job(&self, url: &str) -> Result<JobApiModel> {
        let body = self.fetch(url).await?;

        parse_job(&body)
    }
}

fn parse_job(body: &str) -> Result<JobApiModel> {
    JobApiModel::from_body(body).map_err(|e| ClientError::InvalidJob(e.to_string()))
}
