//! Resource configuration
//!
//! Defines the connection settings for the automation platform and the tuning
//! knobs of the completion poller.

use anyhow::Context;
use launchpad_client::{AutomationClient, Credentials, DEFAULT_API_ENDPOINT};
use std::time::Duration;

/// Connection settings for the automation platform
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Platform URL (e.g., "https://aap.example.com")
    pub host: String,

    /// Path prefix of the versioned API
    pub api_endpoint: String,

    /// Credentials sent with every request
    pub credentials: Credentials,

    /// Accept invalid TLS certificates
    pub insecure_skip_verify: bool,

    /// Upper bound for a single HTTP request
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(host: String) -> Self {
        Self {
            host,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            credentials: Credentials::None,
            insecure_skip_verify: false,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.host.is_empty() {
            anyhow::bail!("host cannot be empty");
        }

        if !self.host.starts_with("http://") && !self.host.starts_with("https://") {
            anyhow::bail!("host must start with http:// or https://");
        }

        if self.request_timeout.as_secs() == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if let Credentials::Basic { username, .. } = &self.credentials {
            if username.is_empty() {
                anyhow::bail!("username cannot be empty when a password is set");
            }
        }

        Ok(())
    }

    /// Builds a client from this configuration
    pub fn build_client(&self) -> anyhow::Result<AutomationClient> {
        self.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .danger_accept_invalid_certs(self.insecure_skip_verify)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(AutomationClient::with_client(self.host.clone(), http_client)
            .with_api_endpoint(self.api_endpoint.clone())
            .with_credentials(self.credentials.clone()))
    }
}

/// Picks credentials: a token wins over username/password
pub fn credentials_from(
    token: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Credentials {
    match (token, username, password) {
        (Some(token), _, _) if !token.is_empty() => Credentials::Token(token),
        (_, Some(username), password) if !username.is_empty() => Credentials::Basic {
            username,
            password: password.unwrap_or_default(),
        },
        _ => Credentials::None,
    }
}

/// Completion poller tuning
///
/// The delay between poll attempts starts at `initial_interval` and is multiplied by
/// `multiplier` after every non-terminal attempt, up to `max_interval`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollConfig {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: u32,
}

impl PollConfig {
    /// Delay to use after `current`
    pub fn next_interval(&self, current: Duration) -> Duration {
        current
            .saturating_mul(self.multiplier.max(1))
            .min(self.max_interval)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(10),
            multiplier: 2,
        }
    }
}
