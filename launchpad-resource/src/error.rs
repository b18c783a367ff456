//! Error types for job launches and status polling

use launchpad_client::ClientError;
use launchpad_core::domain::status::JobStatus;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for job operations
pub type Result<T> = std::result::Result<T, JobError>;

/// Errors that can occur while launching or tracking a job
#[derive(Debug, Error)]
pub enum JobError {
    /// Job template identifier is zero or negative
    #[error("job template id must be a positive number, got {0}")]
    InvalidTemplate(i64),

    /// Record has no URL to fetch its status from
    #[error("job has not been launched: no job URL to fetch status from")]
    MissingHandle,

    /// Launch request body could not be encoded
    #[error("could not create request body for job resource: {0}")]
    Encode(#[source] serde_json::Error),

    /// No response was received from the platform
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: ClientError,
    },

    /// Platform answered with a status outside the expected set
    #[error("unexpected status {status} from {path} (expected {expected}): {body}")]
    UnexpectedStatus {
        path: String,
        status: u16,
        expected: u16,
        body: String,
    },

    /// Response body is not a valid job document
    #[error("error parsing JSON response from {path}: {source}; body: {body}")]
    Parse {
        path: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// Job no longer exists on the platform
    #[error("job at {handle} was not found")]
    NotFound { handle: String },

    /// Job did not reach a final state before the deadline
    #[error(
        "job at {handle} hasn't reached a final state within {secs}s, last status: {last_status}",
        secs = .timeout.as_secs()
    )]
    TimeoutExceeded {
        handle: String,
        timeout: Duration,
        last_status: JobStatus,
    },

    /// Caller cancelled the wait
    #[error("waiting for job at {handle} was cancelled")]
    Cancelled { handle: String },
}

impl JobError {
    /// Returns `true` if a poll attempt that failed this way should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            JobError::Transport { .. }
                | JobError::UnexpectedStatus { .. }
                | JobError::NotFound { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, JobError::NotFound { .. })
    }
}
