//! Shared value types: client configuration and request descriptions.

pub mod http;
pub mod request;

pub use http::{ClientConfig, ClientOptions, OptionOverrides};
pub use request::{HttpVerb, QueryParams, RequestBody, RequestSpec};
