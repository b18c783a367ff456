//! Scripted remote API for tests
//!
//! Replays queued responses and records every call. The last queued fetch response
//! is repeated once the queue is down to one entry, so "always running" is a single
//! scripted response.

use async_trait::async_trait;
use launchpad_client::{ClientError, Method, RawResponse, RemoteApi, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Scripted {
    Response(RawResponse),
    TransportError,
    Hang,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Default)]
pub struct ScriptedApi {
    launches: Mutex<VecDeque<Scripted>>,
    fetches: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_launch(self, status: u16, body: serde_json::Value) -> Self {
        self.launches
            .lock()
            .unwrap()
            .push_back(Scripted::Response(RawResponse::new(status, body.to_string())));
        self
    }

    pub fn on_launch_raw(self, status: u16, body: &str) -> Self {
        self.launches
            .lock()
            .unwrap()
            .push_back(Scripted::Response(RawResponse::new(status, body)));
        self
    }

    pub fn on_launch_error(self) -> Self {
        self.launches.lock().unwrap().push_back(Scripted::TransportError);
        self
    }

    pub fn on_fetch(self, status: u16, body: serde_json::Value) -> Self {
        self.fetches
            .lock()
            .unwrap()
            .push_back(Scripted::Response(RawResponse::new(status, body.to_string())));
        self
    }

    pub fn on_fetch_raw(self, status: u16, body: &str) -> Self {
        self.fetches
            .lock()
            .unwrap()
            .push_back(Scripted::Response(RawResponse::new(status, body)));
        self
    }

    pub fn on_fetch_error(self) -> Self {
        self.fetches.lock().unwrap().push_back(Scripted::TransportError);
        self
    }

    /// Fetches from here on never complete
    pub fn on_fetch_hang(self) -> Self {
        self.fetches.lock().unwrap().push_back(Scripted::Hang);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn launch_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == Method::POST)
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == Method::GET)
            .count()
    }

    fn record(&self, method: Method, path: &str, body: Option<&[u8]>) {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.map(|b| serde_json::from_slice(b).expect("request body is JSON")),
        });
    }

    fn next_fetch(&self) -> Scripted {
        let mut fetches = self.fetches.lock().unwrap();
        if fetches.len() > 1 {
            fetches.pop_front().unwrap()
        } else {
            fetches
                .front()
                .cloned()
                .expect("no fetch response scripted")
        }
    }

    fn next_launch(&self) -> Scripted {
        self.launches
            .lock()
            .unwrap()
            .pop_front()
            .expect("no launch response scripted")
    }
}

/// A genuine transport-level reqwest error, built without touching the network
pub fn transport_error() -> ClientError {
    let err = reqwest::Client::new()
        .get("http://[invalid")
        .build()
        .unwrap_err();
    ClientError::RequestFailed(err)
}

async fn into_result(scripted: Scripted) -> Result<RawResponse> {
    match scripted {
        Scripted::Response(response) => Ok(response),
        Scripted::TransportError => Err(transport_error()),
        Scripted::Hang => std::future::pending().await,
    }
}

#[async_trait]
impl RemoteApi for ScriptedApi {
    fn base_endpoint(&self) -> &str {
        "/api/controller/v2"
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
        self.record(Method::GET, path, None);
        into_result(self.next_fetch()).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        self.record(method, path, body.as_deref());
        into_result(self.next_launch()).await
    }
}

/// Job document as the platform returns it
pub fn job_body(url: &str, status: &str, template: i64, inventory: i64) -> serde_json::Value {
    serde_json::json!({
        "job_template": template,
        "job_type": "run",
        "url": url,
        "status": status,
        "inventory": inventory,
        "extra_vars": "",
    })
}
