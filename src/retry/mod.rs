//! Retry module
//! - policy.rs: attempt budget, linear backoff schedule and the retry loop

pub mod policy;

pub use policy::*;
