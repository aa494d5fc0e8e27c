//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only I/O seam of the crate. `UreqTransport` disables
//! ureq's status-code-as-error behavior so 4xx/5xx responses come back as
//! data and `LessonClient` interprets them. ureq is blocking, so each call
//! runs on tokio's blocking pool.

use std::time::Duration;

use async_trait::async_trait;
use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP exchange. Only failures to obtain a response are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a shared ureq agent.
///
/// Requests run on tokio's blocking pool, so `execute` must be awaited from
/// within a tokio runtime. Outside one it fails with a `TransportError`
/// instead of sending anything.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| TransportError(format!("no tokio runtime available: {e}")))?;
        let agent = self.agent.clone();
        runtime
            .spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError(format!("transport task failed: {e}")))?
    }
}

fn execute_blocking(agent: &Agent, req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let url = req.path.as_str();
    let result = match req.method {
        HttpMethod::Get => with_headers(agent.get(url), &req.headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(url), &req.headers).call(),
        HttpMethod::Post => {
            let builder = with_headers(agent.post(url), &req.headers);
            match req.body.as_deref() {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
        HttpMethod::Put => {
            let builder = with_headers(agent.put(url), &req.headers);
            match req.body.as_deref() {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };
    let mut response = result.map_err(|e| TransportError(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError(e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
