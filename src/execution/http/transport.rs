//! HTTP transport abstraction.
//!
//! A transport performs exactly one HTTP exchange. It reports a received
//! response (whatever its status) as `Ok`. Connection failures and connect
//! timeouts become [`MeilisearchError::CommunicationError`] and
//! [`MeilisearchError::TimeoutError`], which the executor retries. A timeout
//! after the connection is up is [`MeilisearchError::ResponseTimeoutError`] and
//! is final, since the server may already be acting on the request.
//!
//! [`ReqwestTransport`] is the default. Custom transports can observe the final
//! URL/headers/body and return synthetic responses without a network.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::MeilisearchError;
use crate::types::{HttpVerb, QueryParams};

/// Transport-level request data.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub verb: HttpVerb,
    /// Base URL with the relative path appended.
    pub url: String,
    pub headers: HeaderMap,
    pub query: QueryParams,
    /// Encoded body; always `None` for GET and DELETE.
    pub body: Option<Bytes>,
    /// Connect-phase budget. The exchange after connecting gets the same
    /// budget again, so an attempt never runs longer than twice this value.
    pub timeout: Duration,
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    /// Reason phrase of the status line, if known.
    pub reason: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpTransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Custom HTTP transport.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, MeilisearchError>;
}

/// Default transport on top of `reqwest`.
///
/// Without a caller-supplied client, one client is built per distinct timeout
/// with `connect_timeout` set, so connect timeouts can be told apart from
/// slow responses.
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    client: Option<reqwest::Client>,
    by_connect_timeout: Mutex<HashMap<Duration, reqwest::Client>>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `client` for every request. Its own `connect_timeout`, if any, decides
    /// which timeouts are retried.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Some(client),
            by_connect_timeout: Mutex::default(),
        }
    }

    fn client_for(&self, connect_timeout: Duration) -> Result<reqwest::Client, MeilisearchError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let mut clients = self
            .by_connect_timeout
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(&connect_timeout) {
            return Ok(client.clone());
        }
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                MeilisearchError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
            })?;
        clients.insert(connect_timeout, client.clone());
        Ok(client)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, MeilisearchError> {
        let mut rb = self
            .client_for(request.timeout)?
            .request(request.verb.as_method(), &request.url)
            .headers(request.headers)
            .timeout(request.timeout.saturating_mul(2));
        if !request.query.is_empty() {
            rb = rb.query(&request.query);
        }
        if let Some(body) = request.body {
            rb = rb.body(body);
        }

        let resp = rb.send().await.map_err(|e| classify_reqwest_error(&e))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        // The response head has arrived: a body failure is no longer transient.
        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                MeilisearchError::response_timeout(error_chain(&e))
            } else {
                MeilisearchError::HttpError(format!(
                    "failed to read response body: {}",
                    error_chain(&e)
                ))
            }
        })?;

        Ok(HttpTransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            headers,
            body,
        })
    }
}

/// Map a `reqwest` send failure onto the library error types.
///
/// A connect timeout is reported by `reqwest` as both a connect and a timeout
/// error. Any other timeout fired once the request could have reached the
/// server, so it is terminal.
pub fn classify_reqwest_error(error: &reqwest::Error) -> MeilisearchError {
    let message = error_chain(error);
    if error.is_timeout() {
        if error.is_connect() {
            MeilisearchError::timeout(message)
        } else {
            MeilisearchError::response_timeout(message)
        }
    } else if error.is_connect() || error.is_request() || error.is_body() {
        MeilisearchError::communication(message)
    } else {
        MeilisearchError::HttpError(message)
    }
}

// reqwest's Display hides the io cause ("connection refused", "broken pipe").
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
