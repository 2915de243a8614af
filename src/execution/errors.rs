//! Response validation and error normalization.

use crate::error::MeilisearchError;
use crate::execution::http::transport::HttpTransportResponse;

/// Turn a received response into the call outcome.
///
/// - non-success status: `ApiError` with the raw body text
/// - empty success body: `Ok(None)`
/// - otherwise the body decoded as JSON
pub fn validate_response(
    response: HttpTransportResponse,
) -> Result<Option<serde_json::Value>, MeilisearchError> {
    if !response.is_success() {
        return Err(classify_http_error(&response));
    }
    if response.body.is_empty() {
        return Ok(None);
    }
    parse_json_bytes(&response.body).map(Some)
}

pub fn classify_http_error(response: &HttpTransportResponse) -> MeilisearchError {
    MeilisearchError::api_error(
        response.status,
        response.reason.clone().unwrap_or_default(),
        String::from_utf8_lossy(&response.body),
    )
}

pub fn parse_json_bytes(bytes: &[u8]) -> Result<serde_json::Value, MeilisearchError> {
    serde_json::from_slice(bytes).map_err(|e| MeilisearchError::ParseError(e.to_string()))
}
