//! Launchpad HTTP Client
//!
//! A small, type-safe HTTP client for the automation platform API.
//!
//! The lifecycle service only talks to the platform through the [`RemoteApi`]
//! trait, which [`AutomationClient`] implements on top of `reqwest`. Tests swap in
//! a scripted implementation.
//!
//! # Example
//!
//! ```no_run
//! use launchpad_client::{AutomationClient, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), launchpad_client::ClientError> {
//!     let client = AutomationClient::new("https://aap.example.com")
//!         .with_credentials(Credentials::Token("secret".to_string()));
//!
//!     let job = client.get_job("/api/controller/v2/jobs/42/").await?;
//!     println!("Job status: {}", job.status);
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
mod jobs;

// Re-export commonly used types
pub use api::{RawResponse, RemoteApi};
pub use error::{ClientError, Result};
pub use jobs::launch_path;
pub use reqwest::Method;

use reqwest::{Client, RequestBuilder};

/// Default API endpoint path of the automation controller
pub const DEFAULT_API_ENDPOINT: &str = "/api/controller/v2";

/// Credentials attached to every request
#[derive(Clone, Default)]
pub enum Credentials {
    #[default]
    None,
    Basic { username: String, password: String },
    Token(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::None => write!(f, "None"),
            Credentials::Basic { username, .. } => write!(f, "Basic({username}, ***)"),
            Credentials::Token(_) => write!(f, "Token(***)"),
        }
    }
}

/// HTTP client for the automation platform API
///
/// Cheap to clone; clones share the underlying connection pool and can be used
/// concurrently from independent tasks.
#[derive(Debug, Clone)]
pub struct AutomationClient {
    /// Scheme and host of the platform (e.g., "https://aap.example.com")
    host_url: String,
    /// Path prefix of the versioned API (e.g., "/api/controller/v2")
    api_endpoint: String,
    credentials: Credentials,
    /// HTTP client instance
    client: Client,
}

impl AutomationClient {
    /// Create a new client with default settings
    ///
    /// # Arguments
    /// * `host_url` - The platform URL (e.g., "https://aap.example.com")
    ///
    /// # Example
    /// ```
    /// use launchpad_client::AutomationClient;
    ///
    /// let client = AutomationClient::new("https://aap.example.com");
    /// ```
    pub fn new(host_url: impl Into<String>) -> Self {
        Self::with_client(host_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `host_url` - The platform URL
    /// * `client` - A configured reqwest Client
    ///
    /// # Example
    /// ```
    /// use launchpad_client::AutomationClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = AutomationClient::with_client("https://aap.example.com", http_client);
    /// ```
    pub fn with_client(host_url: impl Into<String>, client: Client) -> Self {
        let host_url = host_url.into();
        Self {
            host_url: host_url.trim_end_matches('/').to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            credentials: Credentials::None,
            client,
        }
    }

    /// Use a different API endpoint path
    pub fn with_api_endpoint(mut self, api_endpoint: impl Into<String>) -> Self {
        let api_endpoint = api_endpoint.into();
        self.api_endpoint = format!("/{}", api_endpoint.trim_matches('/'));
        self
    }

    /// Attach credentials to every request
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Get the host URL of the platform
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    /// Resolve a host-relative path (or an absolute URL) to a full URL
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.host_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::None => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Token(token) => request.bearer_auth(token),
        }
    }
}
