//! Remote API capability set
//!
//! The narrow interface the lifecycle service needs from the platform. Everything
//! above it (launching, polling, reconciling) is written against this trait.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::AutomationClient;
use crate::error::{ClientError, Result};

/// Status code and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Operations the lifecycle service performs against the platform
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Path prefix of the versioned API (e.g., "/api/controller/v2")
    fn base_endpoint(&self) -> &str;

    /// Fetches a resource, failing on anything but `200 OK`
    ///
    /// A `404` is reported as [`ClientError::NotFound`].
    async fn fetch(&self, path: &str) -> Result<String>;

    /// Fetches a resource and returns whatever status the platform answered with
    ///
    /// Only transport failures are errors.
    async fn fetch_with_status(&self, path: &str) -> Result<RawResponse>;

    /// Sends an arbitrary request with an optional JSON body
    ///
    /// Only transport failures are errors; status checking is left to the caller.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse>;
}

#[async_trait]
impl RemoteApi for AutomationClient {
    fn base_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    async fn fetch(&self, path: &str) -> Result<String> {
        let response = self.fetch_with_status(path).await?;

        match response.status {
            200 => Ok(response.body),
            404 => Err(ClientError::NotFound(path.to_string())),
            status => Err(ClientError::status(status, response.body)),
        }
    }

    async fn fetch_with_status(&self, path: &str) -> Result<RawResponse> {
        self.request(Method::GET, path, None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request = self.authorize(self.client.request(method, &url));
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("{} answered {}", url, status);
        Ok(RawResponse { status, body })
    }
}
