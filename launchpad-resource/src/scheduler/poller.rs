//! Completion poller
//!
//! Polls a launched job until it reaches a final state, the deadline passes or the
//! caller cancels. Each attempt takes the current snapshot and produces a new one
//! together with a classification; nothing is shared between attempts.
//!
//! The poller never spawns: it runs inside the caller's task, so dropping the
//! future or cancelling the token leaves nothing behind.

use launchpad_client::RemoteApi;
use launchpad_core::domain::job::JobRecord;
use launchpad_core::dto::job::JobApiModel;
use launchpad_core::ignored::IgnoredFieldReporter;
use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PollConfig;
use crate::error::{JobError, Result};

/// Deadline used when the requested timeout does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Outcome of a single poll attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollClass {
    /// Job reached a final state; stop polling
    Terminal,
    /// Job is still in flight or the fetch failed; try again
    Retryable(String),
}

/// Snapshot produced by a poll attempt
#[derive(Debug, Clone)]
pub struct PollStep {
    pub record: JobRecord,
    pub class: PollClass,
}

/// Job completion poller
pub struct CompletionPoller<'a> {
    client: &'a dyn RemoteApi,
    reporter: IgnoredFieldReporter,
    config: PollConfig,
}

impl<'a> CompletionPoller<'a> {
    /// Creates a new completion poller
    pub fn new(
        client: &'a dyn RemoteApi,
        reporter: IgnoredFieldReporter,
        config: PollConfig,
    ) -> Self {
        Self {
            client,
            reporter,
            config,
        }
    }

    /// Performs a single poll attempt
    ///
    /// Transport failures and non-200 answers are retryable and keep the previous
    /// snapshot. A body that is not a job document is fatal.
    pub async fn poll_once(&self, snapshot: &JobRecord) -> Result<PollStep> {
        let response = match self.client.fetch_with_status(&snapshot.url).await {
            Ok(response) => response,
            Err(e) => {
                return Ok(PollStep {
                    record: snapshot.clone(),
                    class: PollClass::Retryable(format!("error fetching job status: {}", e)),
                });
            }
        };

        if response.status != 200 {
            return Ok(PollStep {
                record: snapshot.clone(),
                class: PollClass::Retryable(format!(
                    "error fetching job status: status {}: {}",
                    response.status, response.body
                )),
            });
        }

        let model = JobApiModel::from_body(&response.body).map_err(|source| JobError::Parse {
            path: snapshot.url.clone(),
            body: response.body.clone(),
            source,
        })?;
        let record = snapshot.refreshed(model, &self.reporter);

        let class = if record.status.is_terminal() {
            PollClass::Terminal
        } else {
            PollClass::Retryable(format!(
                "job at {} hasn't yet reached a final state, current state: {}",
                record.url, record.status
            ))
        };

        Ok(PollStep { record, class })
    }

    /// Waits for the job to reach a final state
    ///
    /// # Arguments
    /// * `record` - A launched job record
    /// * `timeout` - How long to keep polling
    /// * `cancel` - Aborts the wait as soon as it fires
    ///
    /// # Returns
    /// The record as last observed in a final state. Reaching the deadline is
    /// [`JobError::TimeoutExceeded`], never success.
    pub async fn wait(
        &self,
        record: JobRecord,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<JobRecord> {
        if !record.is_launched() {
            return Err(JobError::MissingHandle);
        }

        let started = Instant::now();
        let deadline = started
            .checked_add(timeout)
            .unwrap_or_else(|| started + FAR_FUTURE);
        let mut snapshot = record;
        let mut interval = self.config.initial_interval;
        let mut attempt: u32 = 0;

        info!(
            "Waiting up to {}s for job {} to complete",
            timeout.as_secs(),
            snapshot.url
        );

        loop {
            attempt += 1;

            // The first attempt always runs to completion; later ones end at the deadline
            let bound = (attempt > 1).then_some(deadline);
            let fetch = async {
                match bound {
                    Some(deadline) => time::timeout_at(deadline, self.poll_once(&snapshot))
                        .await
                        .ok(),
                    None => Some(self.poll_once(&snapshot).await),
                }
            };

            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(&snapshot)),
                step = fetch => step,
            };
            let Some(step) = step else {
                return Err(self.timed_out(&snapshot, timeout, attempt));
            };
            let step = step?;
            snapshot = step.record;

            match step.class {
                PollClass::Terminal => {
                    info!(
                        "Job {} reached final state {} after {} attempt(s)",
                        snapshot.url, snapshot.status, attempt
                    );
                    return Ok(snapshot);
                }
                PollClass::Retryable(reason) => {
                    debug!("Poll attempt {} for job {}: {}", attempt, snapshot.url, reason);
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(self.timed_out(&snapshot, timeout, attempt));
            }

            let wake_at = (now + interval).min(deadline);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(&snapshot)),
                _ = time::sleep_until(wake_at) => {}
            }

            interval = self.config.next_interval(interval);
        }
    }

    fn timed_out(&self, snapshot: &JobRecord, timeout: Duration, attempt: u32) -> JobError {
        warn!(
            "Timed out waiting for job {} after {} attempt(s), last status: {}",
            snapshot.url, attempt, snapshot.status
        );
        JobError::TimeoutExceeded {
            handle: snapshot.url.clone(),
            timeout,
            last_status: snapshot.status.clone(),
        }
    }

    fn cancelled(&self, snapshot: &JobRecord) -> JobError {
        warn!("Stopped waiting for job {}: cancelled", snapshot.url);
        JobError::Cancelled {
            handle: snapshot.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedApi, job_body};
    use launchpad_core::domain::status::JobStatus;
    use launchpad_core::dto::resource::JobResourceConfig;

    fn launched(url: &str) -> JobRecord {
        let mut record = JobRecord::from_config(&JobResourceConfig {
            job_template_id: 7,
            inventory_id: Some(1),
            extra_vars: None,
            triggers: None,
            wait_for_completion: true,
            wait_for_completion_timeout_seconds: 120,
            destroy_job_template_id: None,
        });
        record.url = url.to_string();
        record.status = JobStatus::Pending;
        record
    }

    fn poller(api: &ScriptedApi) -> CompletionPoller<'_> {
        CompletionPoller::new(api, IgnoredFieldReporter::default(), PollConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_stops_on_first_terminal_status() {
        let api = ScriptedApi::new()
            .on_fetch(200, job_body("/jobs/42/", "pending", 7, 1))
            .on_fetch(200, job_body("/jobs/42/", "running", 7, 1))
            .on_fetch(200, job_body("/jobs/42/", "successful", 7, 1));
        let cancel = CancellationToken::new();

        let job = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(120), &cancel)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Successful);
        assert_eq!(api.fetch_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_is_a_completed_wait() {
        let api = ScriptedApi::new().on_fetch(200, job_body("/jobs/42/", "failed", 7, 1));
        let cancel = CancellationToken::new();

        let job = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(120), &cancel)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(api.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out_when_job_keeps_running() {
        let api = ScriptedApi::new().on_fetch(200, job_body("/jobs/42/", "running", 7, 1));
        let cancel = CancellationToken::new();

        let err = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(1), &cancel)
            .await
            .unwrap_err();

        match err {
            JobError::TimeoutExceeded { handle, last_status, .. } => {
                assert_eq!(handle, "/jobs/42/");
                assert_eq!(last_status, JobStatus::Running);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(api.fetch_count() >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_fetch_ends_at_deadline() {
        let api = ScriptedApi::new()
            .on_fetch(200, job_body("/jobs/42/", "running", 7, 1))
            .on_fetch_hang();
        let cancel = CancellationToken::new();

        let started = Instant::now();
        let err = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(5), &cancel)
            .await
            .unwrap_err();

        match err {
            JobError::TimeoutExceeded { last_status, .. } => {
                assert_eq!(last_status, JobStatus::Running);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(started.elapsed() <= Duration::from_secs(6));
        assert_eq!(api.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_timeout_does_not_overflow() {
        let api = ScriptedApi::new()
            .on_fetch(200, job_body("/jobs/42/", "running", 7, 1))
            .on_fetch(200, job_body("/jobs/42/", "successful", 7, 1));
        let cancel = CancellationToken::new();

        let job = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(u64::MAX), &cancel)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Successful);
        assert_eq!(api.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_null_fields_in_status_body_are_tolerated() {
        let api = ScriptedApi::new().on_fetch_raw(
            200,
            r#"{"url": "/jobs/42/", "status": "successful",
                "inventory": null, "job_template": null}"#,
        );
        let cancel = CancellationToken::new();

        let job = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(60), &cancel)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Successful);
        assert_eq!(job.inventory_id, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_still_fetches_once() {
        let api = ScriptedApi::new().on_fetch(200, job_body("/jobs/42/", "successful", 7, 1));
        let cancel = CancellationToken::new();

        let job = poller(&api)
            .wait(launched("/jobs/42/"), Duration::ZERO, &cancel)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Successful);
        assert_eq!(api.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_keeps_polling() {
        let api = ScriptedApi::new()
            .on_fetch(200, job_body("/jobs/42/", "awaiting_approval", 7, 1))
            .on_fetch(200, job_body("/jobs/42/", "canceled", 7, 1));
        let cancel = CancellationToken::new();

        let job = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(60), &cancel)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Canceled);
        assert_eq!(api.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failures_are_retried() {
        let api = ScriptedApi::new()
            .on_fetch_error()
            .on_fetch_raw(502, "bad gateway")
            .on_fetch(404, serde_json::json!({ "detail": "Not found." }))
            .on_fetch(200, job_body("/jobs/42/", "error", 7, 1));
        let cancel = CancellationToken::new();

        let job = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(60), &cancel)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(api.fetch_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_status_body_is_fatal() {
        let api = ScriptedApi::new().on_fetch_raw(200, "not json");
        let cancel = CancellationToken::new();

        let err = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(60), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Parse { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_attempt() {
        let api = ScriptedApi::new().on_fetch(200, job_body("/jobs/42/", "running", 7, 1));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(60), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Cancelled { .. }));
        assert_eq!(api.fetch_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_waiting_is_not_a_timeout() {
        let api = ScriptedApi::new().on_fetch(200, job_body("/jobs/42/", "running", 7, 1));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = poller(&api)
            .wait(launched("/jobs/42/"), Duration::from_secs(3600), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Cancelled { .. }));
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_wait_requires_launched_job() {
        let api = ScriptedApi::new();
        let cancel = CancellationToken::new();

        let err = poller(&api)
            .wait(launched(""), Duration::from_secs(1), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::MissingHandle));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_poll_once_keeps_snapshot_on_failure() {
        let api = ScriptedApi::new().on_fetch_error();
        let snapshot = launched("/jobs/42/");

        let step = poller(&api).poll_once(&snapshot).await.unwrap();

        assert_eq!(step.record, snapshot);
        assert!(matches!(step.class, PollClass::Retryable(_)));
    }
}
