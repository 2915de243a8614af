//! Request executor.
//!
//! Every verb goes through [`RequestExecutor::execute`]:
//!
//! 1. merge per-call option overrides over the executor options
//! 2. clone the base headers, apply per-call headers, drop `Content-Type` for GET/DELETE
//! 3. encode the body (POST/PUT/PATCH only)
//! 4. dispatch through the transport with bounded retry and linear backoff
//! 5. validate the response
//!
//! Nothing on the executor changes between calls, so one instance can serve
//! concurrent requests.

use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::MeilisearchError;
use crate::execution::errors::validate_response;
use crate::execution::http::headers::{build_default_headers, merge_headers, without_content_type};
use crate::execution::http::transport::{HttpTransport, HttpTransportRequest, ReqwestTransport};
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::types::{ClientConfig, ClientOptions, QueryParams, RequestBody, RequestSpec};

/// Executes requests against a Meilisearch base URL.
#[derive(Clone)]
pub struct RequestExecutor {
    base_url: String,
    options: ClientOptions,
    headers: HeaderMap,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Create an executor with the default `reqwest` transport.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        options: ClientOptions,
    ) -> Result<Self, MeilisearchError> {
        let mut builder = Self::builder(base_url).options(options);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        builder.build()
    }

    /// Create an executor from a [`ClientConfig`].
    pub fn from_config(config: ClientConfig) -> Result<Self, MeilisearchError> {
        let mut builder = Self::builder(config.base_url).options(config.options);
        builder.api_key = config.api_key;
        builder.build()
    }

    /// Start a [`RequestExecutorBuilder`] for `base_url`.
    pub fn builder(base_url: impl Into<String>) -> RequestExecutorBuilder {
        RequestExecutorBuilder::new(base_url)
    }

    /// Base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Options used when a call carries no overrides.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Base header set shared by all calls.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// `GET path`, without a body or `Content-Type`.
    pub async fn get(
        &self,
        path: &str,
        query: Option<&QueryParams>,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.execute(with_query(RequestSpec::get(path), query)).await
    }

    /// `POST path` with an optional JSON or raw body.
    pub async fn post(
        &self,
        path: &str,
        body: Option<RequestBody>,
        query: Option<&QueryParams>,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.execute(with_query(RequestSpec::post(path, body), query))
            .await
    }

    /// `PUT path` with an optional JSON or raw body.
    pub async fn put(
        &self,
        path: &str,
        body: Option<RequestBody>,
        query: Option<&QueryParams>,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.execute(with_query(RequestSpec::put(path, body), query))
            .await
    }

    /// `PATCH path` with an optional JSON or raw body.
    pub async fn patch(
        &self,
        path: &str,
        body: Option<RequestBody>,
        query: Option<&QueryParams>,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.execute(with_query(RequestSpec::patch(path, body), query))
            .await
    }

    /// `DELETE path`, without a body or `Content-Type`.
    pub async fn delete(
        &self,
        path: &str,
        query: Option<&QueryParams>,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.execute(with_query(RequestSpec::delete(path), query)).await
    }

    /// Execute a request with its per-call headers and option overrides.
    ///
    /// Returns `Ok(None)` when the server answers with an empty success body.
    pub async fn execute(
        &self,
        request: RequestSpec,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        let options = self.options.merged(request.overrides());
        let transport_request = self.transport_request(&request, &options)?;
        let retry = RetryExecutor::new(
            RetryPolicy::new()
                .with_max_retries(options.max_retries)
                .with_backoff_unit(options.backoff_unit),
        );

        let response = retry
            .execute(|attempt| {
                let req = transport_request.clone();
                let transport = &self.transport;
                async move {
                    tracing::debug!(verb = %req.verb, url = %req.url, attempt, "sending request");
                    transport.send(req).await
                }
            })
            .await?;

        validate_response(response)
    }

    /// Execute a request and decode the response into `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        request: RequestSpec,
    ) -> Result<Option<T>, MeilisearchError> {
        self.execute(request)
            .await?
            .map(|value| {
                serde_json::from_value(value).map_err(|e| MeilisearchError::ParseError(e.to_string()))
            })
            .transpose()
    }

    fn transport_request(
        &self,
        request: &RequestSpec,
        options: &ClientOptions,
    ) -> Result<HttpTransportRequest, MeilisearchError> {
        let verb = request.verb();
        let mut headers = merge_headers(&self.headers, request.headers())?;
        let body = if verb.sends_body() {
            request
                .body()
                .map(|body| body.encode(options.convert_body))
                .transpose()?
        } else {
            headers = without_content_type(headers);
            None
        };

        Ok(HttpTransportRequest {
            verb,
            url: format!("{}{}", self.base_url, request.path()),
            headers,
            query: request.query().clone(),
            body,
            timeout: options.timeout,
        })
    }
}

fn with_query(spec: RequestSpec, query: Option<&QueryParams>) -> RequestSpec {
    match query {
        Some(params) => spec.with_query_params(params),
        None => spec,
    }
}

/// Builder for [`RequestExecutor`].
pub struct RequestExecutorBuilder {
    base_url: String,
    api_key: Option<SecretString>,
    options: ClientOptions,
    http_client: Option<reqwest::Client>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl RequestExecutorBuilder {
    /// Builder with default options, no API key and the default transport.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            options: ClientOptions::default(),
            http_client: None,
            transport: None,
        }
    }

    /// Send `Authorization: Bearer <api_key>` on every request.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Per-attempt timeout. Only connect timeouts are retried.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Retries after the first attempt.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.options.max_retries = max_retries;
        self
    }

    /// Whether JSON bodies are serialized before sending.
    pub fn convert_body(mut self, convert_body: bool) -> Self {
        self.options.convert_body = convert_body;
        self
    }

    /// Append a leading `User-Agent` segment.
    pub fn client_agent(mut self, agent: impl Into<String>) -> Self {
        self.options.client_agents.push(agent.into());
        self
    }

    /// Sleep unit of the linear backoff.
    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.options.backoff_unit = unit;
        self
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS roots, pooling).
    ///
    /// Set `connect_timeout` on it: timeouts are only retried when `reqwest`
    /// reports them as connect failures.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Use a custom transport. Takes precedence over [`Self::http_client`].
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the executor. Fails on an API key or agent that is not a valid header value.
    pub fn build(self) -> Result<RequestExecutor, MeilisearchError> {
        let headers = build_default_headers(
            self.api_key.as_ref().map(|key| key.expose_secret()),
            &self.options.client_agents,
        )?;
        let transport = match (self.transport, self.http_client) {
            (Some(transport), _) => transport,
            (None, Some(client)) => Arc::new(ReqwestTransport::with_client(client)),
            (None, None) => Arc::new(ReqwestTransport::new()),
        };

        Ok(RequestExecutor {
            base_url: self.base_url,
            options: self.options,
            headers,
            transport,
        })
    }
}
