//! Request descriptions.

use bytes::Bytes;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use super::http::OptionOverrides;
use crate::error::MeilisearchError;

/// Query string parameters. Ordered so the encoded query string is stable.
pub type QueryParams = BTreeMap<String, String>;

/// The supported HTTP verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    /// POST, PUT and PATCH carry a body and a `Content-Type`; GET and DELETE do not.
    pub const fn sends_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub fn as_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON value, serialized to text when `convert_body` is enabled
    Json(serde_json::Value),
    /// Pre-encoded payload, always sent verbatim (NDJSON/CSV uploads, ...)
    Raw(Bytes),
}

impl RequestBody {
    /// Build a JSON body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, MeilisearchError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| MeilisearchError::SerializationError(e.to_string()))
    }

    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Self::Raw(bytes.into())
    }

    /// Encode the payload for the wire.
    ///
    /// With `convert_body` off, a JSON string is sent as its raw text (the caller
    /// pre-serialized it) and other JSON values fall back to their compact text.
    pub(crate) fn encode(&self, convert_body: bool) -> Result<Bytes, MeilisearchError> {
        match self {
            Self::Raw(bytes) => Ok(bytes.clone()),
            Self::Json(serde_json::Value::String(text)) if !convert_body => {
                Ok(Bytes::from(text.clone()))
            }
            Self::Json(value) => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(|e| MeilisearchError::SerializationError(e.to_string())),
        }
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::Raw(bytes)
    }
}

/// A complete request: verb, relative path and per-call extras.
///
/// Bodies can only be attached through the POST/PUT/PATCH constructors.
#[derive(Clone, PartialEq)]
pub struct RequestSpec {
    verb: HttpVerb,
    path: String,
    query: QueryParams,
    body: Option<RequestBody>,
    headers: HashMap<String, String>,
    overrides: OptionOverrides,
}

impl fmt::Debug for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Per-call credentials must not end up in logs.
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "Sensitive")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("RequestSpec")
            .field("verb", &self.verb)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("headers", &headers)
            .field("overrides", &self.overrides)
            .finish()
    }
}

impl RequestSpec {
    fn new(verb: HttpVerb, path: impl Into<String>, body: Option<RequestBody>) -> Self {
        Self {
            verb,
            path: path.into(),
            query: QueryParams::new(),
            body,
            headers: HashMap::new(),
            overrides: OptionOverrides::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpVerb::Get, path, None)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpVerb::Delete, path, None)
    }

    pub fn post(path: impl Into<String>, body: Option<RequestBody>) -> Self {
        Self::new(HttpVerb::Post, path, body)
    }

    pub fn put(path: impl Into<String>, body: Option<RequestBody>) -> Self {
        Self::new(HttpVerb::Put, path, body)
    }

    pub fn patch(path: impl Into<String>, body: Option<RequestBody>) -> Self {
        Self::new(HttpVerb::Patch, path, body)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_query_params(mut self, params: &QueryParams) -> Self {
        self.query
            .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Add a header for this call only; it overrides a base header of the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.overrides.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.overrides.max_retries = Some(max_retries);
        self
    }

    pub fn with_convert_body(mut self, convert_body: bool) -> Self {
        self.overrides.convert_body = Some(convert_body);
        self
    }

    pub fn with_overrides(mut self, overrides: OptionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn overrides(&self) -> &OptionOverrides {
        &self.overrides
    }
}
