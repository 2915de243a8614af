//! HTTP Utilities
//!
//! - Header management
//! - Transport abstraction and the `reqwest` implementation

pub mod headers;
pub mod transport;

pub use headers::*;
pub use transport::*;
