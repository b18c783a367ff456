//! Configuration module
//!
//! Handles CLI configuration: the platform connection settings.

use launchpad_resource::ClientConfig;
use launchpad_resource::config::credentials_from;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection settings for the automation platform
    pub client: ClientConfig,
}

impl Config {
    pub fn from_args(
        host: String,
        api_endpoint: String,
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
        insecure_skip_verify: bool,
        timeout_secs: u64,
    ) -> Self {
        let mut client = ClientConfig::new(host);
        client.api_endpoint = api_endpoint;
        client.credentials = credentials_from(token, username, password);
        client.insecure_skip_verify = insecure_skip_verify;
        client.request_timeout = Duration::from_secs(timeout_secs);

        Self { client }
    }
}
