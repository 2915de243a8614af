//! meilisearch-http
//!
//! HTTP request, retry and error-normalization layer for Meilisearch clients.
//!
//! The [`RequestExecutor`] turns verb calls into HTTP requests against a base URL,
//! attaches the authentication and content-negotiation headers, encodes JSON bodies,
//! retries transient network failures with a linear backoff and normalizes every
//! outcome into either a decoded JSON value or a [`MeilisearchError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use meilisearch_http::prelude::*;
//!
//! # async fn example() -> Result<(), MeilisearchError> {
//! let executor = RequestExecutor::builder("http://localhost:7700")
//!     .api_key("masterKey")
//!     .max_retries(2)
//!     .build()?;
//!
//! let health = executor.get("/health", None).await?;
//! let task = executor
//!     .post("/indexes", Some(serde_json::json!({"uid": "movies"}).into()), None)
//!     .await?;
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod defaults;
pub mod error;
pub mod execution;
pub mod network;
pub mod retry;
pub mod types;

pub use error::MeilisearchError;
pub use execution::{RequestExecutor, RequestExecutorBuilder};

/// Commonly used types.
pub mod prelude {
    pub use crate::error::{ErrorCategory, MeilisearchError};
    pub use crate::execution::http::transport::{
        HttpTransport, HttpTransportRequest, HttpTransportResponse, ReqwestTransport,
    };
    pub use crate::execution::{RequestExecutor, RequestExecutorBuilder};
    pub use crate::network::{Network, Remote, RemoteUpdate};
    pub use crate::retry::{RetryExecutor, RetryPolicy};
    pub use crate::types::{
        ClientConfig, ClientOptions, HttpVerb, OptionOverrides, QueryParams, RequestBody,
        RequestSpec,
    };
}
