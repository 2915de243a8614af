//! Default Configuration Values
//!
//! This module centralizes the default values used by the request executor.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default per-attempt request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

    /// Default number of retries after the first attempt (`0` means a single attempt).
    pub const MAX_RETRIES: u32 = 0;

    /// Whether bodies are serialized to JSON text by default.
    pub const CONVERT_BODY: bool = true;

    /// Content type sent with body-carrying requests.
    pub const JSON_CONTENT_TYPE: &str = "application/json";
}

/// Retry defaults
pub mod retry {
    use super::*;

    /// Unit of the linear backoff: attempt `i` is followed by a sleep of `i` units.
    pub const BACKOFF_UNIT: Duration = Duration::from_secs(1);
}

/// Identifier appended as the last segment of the `User-Agent` header.
pub const SDK_IDENTIFIER: &str = concat!("Meilisearch Rust HTTP (v", env!("CARGO_PKG_VERSION"), ")");
