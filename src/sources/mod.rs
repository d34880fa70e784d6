//! Remote news service bindings.
//!
//! This module defines the [`NewsSource`] trait, the seam between the
//! fetch pipeline and whatever answers page requests. The production
//! implementation is [`NewsApiSource`], which talks to the NewsAPI v2 REST
//! service over HTTP. [`MockSource`] answers from canned responses and is
//! what the tests inject instead.
//!
//! A source is constructed once per invocation and shared read-only by every
//! concurrent page request, so implementations must be `Send + Sync` and
//! must not rely on per-request mutable state.

mod mock;
mod newsapi;

pub use mock::{page_body, MockSource};
pub use newsapi::{NewsApiSource, DEFAULT_BASE_URL};

use crate::models::{Endpoint, Page, QueryParams};
use async_trait::async_trait;

/// A remote service able to answer one page request at a time
#[async_trait]
pub trait NewsSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source, used in logs
    fn id(&self) -> &str;

    /// Fetch a single page of `endpoint` using `params` verbatim
    async fn fetch_page(&self, endpoint: Endpoint, params: &QueryParams)
        -> Result<Page, SourceError>;

    /// List publishers
    async fn sources(&self, params: &QueryParams) -> Result<Page, SourceError> {
        self.fetch_page(Endpoint::Sources, params).await
    }

    /// Full-text article search
    async fn everything(&self, params: &QueryParams) -> Result<Page, SourceError> {
        self.fetch_page(Endpoint::Everything, params).await
    }

    /// Top headlines
    async fn top_headlines(&self, params: &QueryParams) -> Result<Page, SourceError> {
        self.fetch_page(Endpoint::TopHeadlines, params).await
    }
}

/// Errors that can occur when talking to the remote service
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Credential missing or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// API error reported by the service
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
