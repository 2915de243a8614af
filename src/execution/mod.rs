//! Request execution
//!
//! - `http`: header construction and the transport seam
//! - `errors`: response validation and error normalization
//! - `executor`: the verb API with bounded retry

pub mod errors;
pub mod executor;
pub mod http;

pub use executor::{RequestExecutor, RequestExecutorBuilder};
