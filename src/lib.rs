//! # News CLI
//!
//! A command-line client for a news search service with three endpoints:
//! source listing, full-text article search, and top headlines.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Query parameters and their normalization, the endpoint table,
//!   pages and unified results
//! - [`sources`]: The remote service seam ([`NewsSource`]) and its HTTP binding
//! - [`pipeline`]: Page fetching, merging, projection and persistence
//! - [`ui`]: Console rendering
//! - [`utils`]: HTTP client
//! - [`config`]: Configuration management

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use error::NewsError;
pub use models::{Endpoint, QueryParams, RawParams, UnifiedResult};
pub use pipeline::{PageFetcher, QueryRequest};
pub use sources::{NewsApiSource, NewsSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
