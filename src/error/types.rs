//! Core error types.

use thiserror::Error;

/// Errors returned by the request executor.
///
/// Only [`MeilisearchError::CommunicationError`] and [`MeilisearchError::TimeoutError`]
/// are retried internally; every other variant is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeilisearchError {
    /// The transport could not establish or maintain a connection
    /// (refused, reset, broken pipe, unreachable peer).
    #[error("Communication error: {message}")]
    CommunicationError {
        /// Message reported by the underlying transport.
        message: String,
    },

    /// The connection could not be established within the configured timeout.
    /// Nothing was sent, so the attempt can be repeated.
    #[error("Timeout error: {message}")]
    TimeoutError {
        /// Message reported by the underlying transport.
        message: String,
    },

    /// The connection was up but no response arrived in time. The server may
    /// have processed the request, so this is never retried.
    #[error("Response timeout: {message}")]
    ResponseTimeoutError {
        /// Message reported by the underlying transport.
        message: String,
    },

    /// A complete HTTP response was received with a non-success status.
    #[error("API error: {status} {reason}: {body}")]
    ApiError {
        /// Numeric HTTP status code.
        status: u16,
        /// Status reason phrase (empty when the status has no canonical reason).
        reason: String,
        /// Raw response body text, not parsed.
        body: String,
    },

    /// A success response body could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A request body could not be encoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid client configuration (header names or values, API key, user agent).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Any other transport failure. Never retried.
    #[error("HTTP error: {0}")]
    HttpError(String),
}

/// Coarse classification of [`MeilisearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Network,
    Timeout,
    Api,
    Parsing,
    Configuration,
}

impl MeilisearchError {
    /// Build a communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Build a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError {
            message: message.into(),
        }
    }

    /// Build a timeout error for an exchange that started but never completed.
    pub fn response_timeout(message: impl Into<String>) -> Self {
        Self::ResponseTimeoutError {
            message: message.into(),
        }
    }

    /// Build an API error from a status, reason phrase and raw body text.
    pub fn api_error(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Whether the executor may retry after this error.
    ///
    /// Transient failures happen before any response is received; everything
    /// after a response (including error statuses) is terminal.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CommunicationError { .. } | Self::TimeoutError { .. }
        )
    }

    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::CommunicationError { .. } | Self::HttpError(_) => ErrorCategory::Network,
            Self::TimeoutError { .. } | Self::ResponseTimeoutError { .. } => {
                ErrorCategory::Timeout
            }
            Self::ApiError { .. } => ErrorCategory::Api,
            Self::ParseError(_) | Self::SerializationError(_) => ErrorCategory::Parsing,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
        }
    }

    /// HTTP status code, if the error came from a received response.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
