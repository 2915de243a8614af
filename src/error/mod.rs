//! Error Handling Module
//!
//! - Core error type (`MeilisearchError`, `ErrorCategory`)
//! - Helpers for decoding Meilisearch error bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use meilisearch_http::error::{ErrorCategory, MeilisearchError};
//!
//! let error = MeilisearchError::api_error(404, "Not Found", "{}");
//! assert_eq!(error.category(), ErrorCategory::Api);
//! assert!(!error.is_retryable());
//! ```

pub mod helpers;
pub mod types;

pub use helpers::*;
pub use types::*;
