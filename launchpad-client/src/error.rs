//! Errors raised while talking to the automation platform

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of a single exchange with the platform
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received (connection refused, TLS, request timeout)
    #[error("request to the platform failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Platform answered with a status the caller did not accept
    #[error("platform returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body is not a job document
    #[error("invalid job document: {0}")]
    InvalidJob(String),

    /// No job lives at the given URL
    #[error("no job found at {0}")]
    NotFound(String),
}

impl ClientError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}
