//! Job resource lifecycle
//!
//! Implements create, read, update and delete for a job resource by composing the
//! launch controller and the completion poller. Operations never return `Err`:
//! failures are reported as diagnostics next to the resulting state change, which
//! is what the surrounding resource framework consumes.

use async_trait::async_trait;
use launchpad_client::RemoteApi;
use launchpad_core::domain::diagnostic::Diagnostics;
use launchpad_core::domain::job::JobRecord;
use launchpad_core::dto::job::JobApiModel;
use launchpad_core::dto::resource::JobResourceConfig;
use launchpad_core::ignored::IgnoredFieldReporter;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::PollConfig;
use crate::error::{JobError, Result};
use crate::launch::LaunchController;
use crate::scheduler::CompletionPoller;

/// What the framework should do with the stored resource state
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    /// Store this record
    Set(JobRecord),
    /// Drop the resource from state
    Remove,
    /// Leave the stored state as it was
    Keep,
}

/// Step of a launch that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Launch,
    Wait,
}

/// Result of a lifecycle operation
#[derive(Debug, Clone)]
pub struct LifecycleResponse {
    pub state: StateChange,
    pub diagnostics: Diagnostics,
    /// Cleanup job launched by a delete, if any
    pub cleanup_job: Option<JobRecord>,
}

impl LifecycleResponse {
    fn new(state: StateChange, diagnostics: Diagnostics) -> Self {
        Self {
            state,
            diagnostics,
            cleanup_job: None,
        }
    }

    /// Returns the stored record if the operation produced one
    pub fn record(&self) -> Option<&JobRecord> {
        match &self.state {
            StateChange::Set(record) => Some(record),
            _ => None,
        }
    }
}

/// Lifecycle operations of a job resource
#[async_trait]
pub trait JobLifecycle: Send + Sync {
    /// Launches a job for a new resource
    async fn create(
        &self,
        plan: JobResourceConfig,
        cancel: &CancellationToken,
    ) -> LifecycleResponse;

    /// Refreshes the stored record from the platform
    async fn read(&self, state: JobRecord, cancel: &CancellationToken) -> LifecycleResponse;

    /// Launches a new job for a changed resource
    async fn update(
        &self,
        plan: JobResourceConfig,
        prior: JobRecord,
        cancel: &CancellationToken,
    ) -> LifecycleResponse;

    /// Removes the resource, launching the cleanup template if one is configured
    async fn delete(&self, state: JobRecord, cancel: &CancellationToken) -> LifecycleResponse;
}

/// Standard implementation of JobLifecycle
pub struct StandardJobLifecycle {
    client: Arc<dyn RemoteApi>,
    reporter: IgnoredFieldReporter,
    poll: PollConfig,
}

impl StandardJobLifecycle {
    /// Creates a new lifecycle service
    pub fn new(client: Arc<dyn RemoteApi>) -> Self {
        Self {
            client,
            reporter: IgnoredFieldReporter::default(),
            poll: PollConfig::default(),
        }
    }

    /// Uses a custom rename table for ignored fields
    pub fn with_reporter(mut self, reporter: IgnoredFieldReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Uses custom poller tuning
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Launches `request` and, if asked to, waits for it to finish
    async fn launch_and_wait(
        &self,
        request: &JobRecord,
        cancel: &CancellationToken,
    ) -> std::result::Result<JobRecord, (Stage, JobError)> {
        let launcher = LaunchController::new(self.client.as_ref(), self.reporter);
        let launched = launcher
            .launch(request)
            .await
            .map_err(|e| (Stage::Launch, e))?;

        if !launched.wait_for_completion {
            return Ok(launched);
        }

        let poller = CompletionPoller::new(self.client.as_ref(), self.reporter, self.poll);
        let timeout = Duration::from_secs(launched.wait_for_completion_timeout_seconds);
        poller
            .wait(launched, timeout, cancel)
            .await
            .map_err(|e| (Stage::Wait, e))
    }

    /// Fetches the current state of the job behind `state`
    async fn refresh(&self, state: &JobRecord) -> Result<JobRecord> {
        if !state.is_launched() {
            return Err(JobError::MissingHandle);
        }

        let response = self
            .client
            .fetch_with_status(&state.url)
            .await
            .map_err(|source| JobError::Transport {
                path: state.url.clone(),
                source,
            })?;

        match response.status {
            200 => {}
            404 => {
                return Err(JobError::NotFound {
                    handle: state.url.clone(),
                });
            }
            status => {
                return Err(JobError::UnexpectedStatus {
                    path: state.url.clone(),
                    status,
                    expected: 200,
                    body: response.body,
                });
            }
        }

        let model = JobApiModel::from_body(&response.body).map_err(|source| JobError::Parse {
            path: state.url.clone(),
            body: response.body.clone(),
            source,
        })?;

        Ok(state.refreshed(model, &self.reporter))
    }

    async fn launch_resource(
        &self,
        request: JobRecord,
        cancel: &CancellationToken,
    ) -> LifecycleResponse {
        let mut diagnostics = Diagnostics::new();

        match self.launch_and_wait(&request, cancel).await {
            Ok(record) => LifecycleResponse::new(StateChange::Set(record), diagnostics),
            Err((stage, e)) => {
                let summary = match stage {
                    Stage::Launch => "Error launching job",
                    Stage::Wait => "Error waiting for job to complete",
                };
                diagnostics.add_error(summary, e.to_string());
                LifecycleResponse::new(StateChange::Keep, diagnostics)
            }
        }
    }
}

#[async_trait]
impl JobLifecycle for StandardJobLifecycle {
    async fn create(
        &self,
        plan: JobResourceConfig,
        cancel: &CancellationToken,
    ) -> LifecycleResponse {
        self.launch_resource(JobRecord::from_config(&plan), cancel).await
    }

    async fn read(&self, state: JobRecord, cancel: &CancellationToken) -> LifecycleResponse {
        let mut diagnostics = Diagnostics::new();

        let refreshed = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(JobError::Cancelled { handle: state.url.clone() }),
            refreshed = self.refresh(&state) => refreshed,
        };

        match refreshed {
            Ok(record) => LifecycleResponse::new(StateChange::Set(record), diagnostics),
            Err(e) if e.is_not_found() => {
                warn!("Job {} no longer exists, dropping it from state", state.url);
                diagnostics.add_warning(
                    "Job not found",
                    "The job was not found. It may have been deleted. The job will be recreated.",
                );
                LifecycleResponse::new(StateChange::Remove, diagnostics)
            }
            Err(e) => {
                diagnostics.add_error("Error reading job", e.to_string());
                LifecycleResponse::new(StateChange::Keep, diagnostics)
            }
        }
    }

    async fn update(
        &self,
        plan: JobResourceConfig,
        prior: JobRecord,
        cancel: &CancellationToken,
    ) -> LifecycleResponse {
        let mut request = JobRecord::from_config(&plan);
        // An unset inventory keeps the one the previous job ran against
        if plan.inventory_id.is_none() {
            request.inventory_id = prior.inventory_id;
        }
        // A reformatted document is not a change; keep the stored text
        if let (Some(planned), Some(stored)) = (&request.extra_vars, &prior.extra_vars) {
            if planned.semantically_equal(stored) {
                request.extra_vars = prior.extra_vars.clone();
            }
        }

        info!(
            "Relaunching job template {} (previous job: {})",
            request.job_template_id, prior.url
        );
        self.launch_resource(request, cancel).await
    }

    async fn delete(&self, state: JobRecord, cancel: &CancellationToken) -> LifecycleResponse {
        let mut diagnostics = Diagnostics::new();

        let Some(cleanup) = state.destroy_job() else {
            return LifecycleResponse::new(StateChange::Remove, diagnostics);
        };

        info!(
            "Launching destroy job template {} for job {}",
            cleanup.job_template_id, state.url
        );

        let cleanup_job = match self.launch_and_wait(&cleanup, cancel).await {
            Ok(record) => Some(record),
            Err((Stage::Launch, e)) => {
                diagnostics.add_error("Error launching destroy job", e.to_string());
                None
            }
            Err((Stage::Wait, e)) => {
                diagnostics.add_error("Error waiting for destroy job to complete", e.to_string());
                None
            }
        };

        LifecycleResponse {
            state: StateChange::Remove,
            diagnostics,
            cleanup_job,
        }
    }
}
