//! HTTP configuration types.
//!
//! `ClientOptions` holds the executor-wide defaults. Per-call `OptionOverrides`
//! are folded over them with [`ClientOptions::merged`], which returns a new value
//! and never touches the executor's copy.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::defaults;

/// Executor-wide options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Connect timeout per attempt; the exchange after connecting gets the same
    /// budget again (milliseconds when serialized).
    #[serde(with = "duration_millis_serde")]
    pub timeout: Duration,
    /// Retries after the first attempt. `0` means exactly one attempt.
    pub max_retries: u32,
    /// Serialize bodies to JSON text before sending.
    pub convert_body: bool,
    /// Leading `User-Agent` segments, e.g. the name of an integration.
    pub client_agents: Vec<String>,
    /// Unit of the linear backoff (milliseconds when serialized).
    #[serde(with = "duration_millis_serde")]
    pub backoff_unit: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: defaults::http::REQUEST_TIMEOUT,
            max_retries: defaults::http::MAX_RETRIES,
            convert_body: defaults::http::CONVERT_BODY,
            client_agents: Vec::new(),
            backoff_unit: defaults::retry::BACKOFF_UNIT,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub const fn with_convert_body(mut self, convert_body: bool) -> Self {
        self.convert_body = convert_body;
        self
    }

    pub fn with_client_agent(mut self, agent: impl Into<String>) -> Self {
        self.client_agents.push(agent.into());
        self
    }

    pub const fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Return a copy of these options with `overrides` applied.
    pub fn merged(&self, overrides: &OptionOverrides) -> Self {
        Self {
            timeout: overrides.timeout.unwrap_or(self.timeout),
            max_retries: overrides.max_retries.unwrap_or(self.max_retries),
            convert_body: overrides.convert_body.unwrap_or(self.convert_body),
            client_agents: self.client_agents.clone(),
            backoff_unit: self.backoff_unit,
        }
    }
}

/// Per-call option overrides. Unset fields fall back to the executor's options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    pub convert_body: Option<bool>,
}

impl OptionOverrides {
    pub const fn is_empty(&self) -> bool {
        self.timeout.is_none() && self.max_retries.is_none() && self.convert_body.is_none()
    }
}

/// Everything needed to build a [`crate::RequestExecutor`].
#[derive(Debug)]
pub struct ClientConfig {
    /// Prefix every relative path is appended to. Not normalized.
    pub base_url: String,
    /// Sent as `Authorization: Bearer <key>` when present.
    pub api_key: Option<SecretString>,
    pub options: ClientOptions,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            options: ClientOptions::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }
}

// Durations travel as integer milliseconds.
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
