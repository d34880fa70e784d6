//! Utility modules shared by the remote-service bindings.
//!
//! - [`HttpClient`]: a `reqwest` client with sensible timeouts, shared by
//!   every request issued during one invocation.

mod http;

pub use http::{HttpClient, DEFAULT_TIMEOUT};
