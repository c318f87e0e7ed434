//! HTTP client construction and per-iteration request execution.
mod client;
mod executor;

pub use client::{DEFAULT_USER_AGENT, build_client};
pub use executor::{execute_iteration, join_url};
