//! The fetch → merge → project → persist pipeline.
//!
//! - [`PageFetcher`]: issues one request, or a concurrent fan-out of page
//!   requests, against an injected [`NewsSource`](crate::sources::NewsSource)
//! - [`merge`]: joins pages into one [`UnifiedResult`] in page-index order
//! - [`project`]: picks the displayed fields of each item
//! - [`persist`]: writes the unmodified result as JSON
//!
//! [`run`] drives all four for one command invocation. Display happens before
//! persistence, and persistence is only attempted once projection succeeded.

mod aggregate;
mod fetch;
mod persist;
mod project;

pub use aggregate::merge;
pub use fetch::{FailurePolicy, PageFetcher};
pub use persist::persist;
pub use project::{project, ProjectedField, ProjectedItem, ProjectedView, Summary, MISSING_VALUE};

use std::path::PathBuf;
use tracing::info;

use crate::error::NewsError;
use crate::models::{Endpoint, QueryParams, UnifiedResult};

/// Everything one command invocation asks for
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub endpoint: Endpoint,
    pub params: QueryParams,
    pub pages: u32,
    pub verbose: bool,
    pub write: Option<PathBuf>,
}

impl QueryRequest {
    /// Create a single-page, non-verbose request
    pub fn new(endpoint: Endpoint, params: QueryParams) -> Self {
        Self {
            endpoint,
            params,
            pages: 1,
            verbose: false,
            write: None,
        }
    }

    /// Set number of pages
    pub fn pages(mut self, pages: u32) -> Self {
        self.pages = pages;
        self
    }

    /// Enable/disable extended fields
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Save the result to a path
    pub fn write(mut self, path: impl Into<PathBuf>) -> Self {
        self.write = Some(path.into());
        self
    }
}

/// What a successful invocation produced
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub result: UnifiedResult,
    pub view: ProjectedView,
    pub saved_to: Option<PathBuf>,
}

/// Run one request end to end.
///
/// `display` receives the projected view before anything is written to disk.
pub async fn run<F>(
    fetcher: &PageFetcher,
    request: &QueryRequest,
    display: F,
) -> Result<QueryOutcome, NewsError>
where
    F: FnOnce(&ProjectedView),
{
    let result = fetcher
        .fetch(request.endpoint, &request.params, request.pages)
        .await?;

    let view = project(&result, request.endpoint, request.verbose)?;
    display(&view);

    let saved_to = match &request.write {
        Some(path) => Some(persist(&result, path).await?),
        None => None,
    };

    info!(
        endpoint = %request.endpoint,
        items = view.summary.processed,
        saved = saved_to.is_some(),
        "query complete"
    );

    Ok(QueryOutcome {
        result,
        view,
        saved_to,
    })
}
