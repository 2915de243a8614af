//! Helpers for inspecting API errors.
//!
//! Meilisearch reports failures as a JSON object:
//!
//! ```json
//! {"message": "Index `movies` not found.", "code": "index_not_found",
//!  "type": "invalid_request", "link": "https://docs.meilisearch.com/errors#index_not_found"}
//! ```
//!
//! [`MeilisearchError::ApiError`] keeps that body verbatim; [`MeilisearchError::api_details`]
//! decodes it on demand.

use serde::{Deserialize, Serialize};

use super::types::MeilisearchError;

/// Decoded Meilisearch error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetails {
    pub message: String,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub link: Option<String>,
}

impl MeilisearchError {
    /// Decode the body of an [`MeilisearchError::ApiError`].
    ///
    /// Returns `None` for other variants and for bodies that are not a
    /// Meilisearch error object (plain text, HTML from a proxy, ...).
    pub fn api_details(&self) -> Option<ApiErrorDetails> {
        match self {
            Self::ApiError { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}
