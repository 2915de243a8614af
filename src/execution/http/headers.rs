//! HTTP Headers Utility
//!
//! Builds the executor's base header set and derives per-call copies from it.

use crate::defaults;
use crate::error::MeilisearchError;
use reqwest::header::{
    AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use std::collections::HashMap;

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add Bearer token authorization
    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, MeilisearchError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            MeilisearchError::ConfigurationError(format!("Invalid API key format: {e}"))
        })?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Add JSON content type
    pub fn with_json_content_type(mut self) -> Self {
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(defaults::http::JSON_CONTENT_TYPE),
        );
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Result<Self, MeilisearchError> {
        self.headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| {
                MeilisearchError::ConfigurationError(format!("Invalid user agent: {e}"))
            })?,
        );
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `User-Agent` value: the client agents followed by the SDK identifier, `;`-joined.
pub fn user_agent(client_agents: &[String]) -> String {
    client_agents
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(defaults::SDK_IDENTIFIER))
        .collect::<Vec<_>>()
        .join(";")
}

/// Base headers shared by every request of an executor.
pub fn build_default_headers(
    api_key: Option<&str>,
    client_agents: &[String],
) -> Result<HeaderMap, MeilisearchError> {
    let mut builder = HttpHeaderBuilder::new()
        .with_json_content_type()
        .with_user_agent(&user_agent(client_agents))?;
    if let Some(key) = api_key {
        builder = builder.with_bearer_auth(key)?;
    }
    Ok(builder.build())
}

/// Merge extra headers into a clone of `base`. Extra headers win on name clashes.
pub fn merge_headers(
    base: &HeaderMap,
    extra: &HashMap<String, String>,
) -> Result<HeaderMap, MeilisearchError> {
    let mut merged = base.clone();
    for (key, value) in extra {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            MeilisearchError::ConfigurationError(format!("Invalid header name '{key}': {e}"))
        })?;
        let mut value = HeaderValue::from_str(value).map_err(|e| {
            MeilisearchError::ConfigurationError(format!("Invalid header value for '{key}': {e}"))
        })?;
        if name == AUTHORIZATION {
            value.set_sensitive(true);
        }
        merged.insert(name, value);
    }
    Ok(merged)
}

/// Drop `Content-Type`, for requests that carry no body.
pub fn without_content_type(mut headers: HeaderMap) -> HeaderMap {
    headers.remove(CONTENT_TYPE);
    headers
}
