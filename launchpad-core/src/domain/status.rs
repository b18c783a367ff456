//! Job status vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a job as reported by the automation platform
///
/// Unrecognized values are kept verbatim in `Unknown` and are never terminal, so a
/// newer platform reporting a status this crate does not know about keeps being polled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    New,
    Pending,
    Waiting,
    Running,
    Successful,
    Failed,
    Error,
    Canceled,
    Unknown(String),
}

impl JobStatus {
    /// Returns `true` if the job cannot transition any further
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Successful | JobStatus::Failed | JobStatus::Error | JobStatus::Canceled
        )
    }

    /// Wire representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::New => "new",
            JobStatus::Pending => "pending",
            JobStatus::Waiting => "waiting",
            JobStatus::Running => "running",
            JobStatus::Successful => "successful",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
            JobStatus::Canceled => "canceled",
            JobStatus::Unknown(value) => value.as_str(),
        }
    }
}

/// Returns `true` if the given status string names a terminal job state
pub fn is_terminal_status(status: &str) -> bool {
    JobStatus::from(status).is_terminal()
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        match value {
            "new" => JobStatus::New,
            "pending" => JobStatus::Pending,
            "waiting" => JobStatus::Waiting,
            "running" => JobStatus::Running,
            "successful" => JobStatus::Successful,
            "failed" => JobStatus::Failed,
            "error" => JobStatus::Error,
            "canceled" => JobStatus::Canceled,
            other => JobStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        JobStatus::from(value.as_str())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Unknown(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Unknown(String::new())
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
