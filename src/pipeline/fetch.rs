//! Page fetching with concurrent fan-out for multi-page queries.

use futures_util::future::{join_all, try_join_all};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::NewsError;
use crate::models::{Endpoint, Page, QueryParams, UnifiedResult};
use crate::pipeline::merge;
use crate::sources::{NewsSource, SourceError};

/// What to do when one request of a multi-page fan-out fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the first transport error unchanged and drop outstanding requests
    #[default]
    AbortOnFirst,
    /// Wait for every request, then report all failing page indices
    CollectFailures,
}

/// Issues page requests against an injected [`NewsSource`].
#[derive(Debug, Clone)]
pub struct PageFetcher {
    source: Arc<dyn NewsSource>,
    policy: FailurePolicy,
}

impl PageFetcher {
    /// Create a fetcher with the default failure policy
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self {
            source,
            policy: FailurePolicy::default(),
        }
    }

    /// Set the failure policy
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Fetch `pages` consecutive pages starting at `params.page()` and merge them.
    #[instrument(level = "info", skip_all, fields(endpoint = %endpoint, pages = pages))]
    pub async fn fetch(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
        pages: u32,
    ) -> Result<UnifiedResult, NewsError> {
        let fetched = self.fetch_pages(endpoint, params, pages).await?;
        merge(fetched)
    }

    /// Fetch pages without merging them.
    ///
    /// Pages come back tagged with their index. A single page is requested
    /// with `params` as given; several pages are dispatched together and
    /// joined, differing only in `page`.
    pub async fn fetch_pages(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
        pages: u32,
    ) -> Result<Vec<Page>, NewsError> {
        let start = params.page();
        if start < 1 {
            return Err(NewsError::InvalidPageRequest(format!(
                "page must be at least 1, got {}",
                start
            )));
        }
        if pages < 1 {
            return Err(NewsError::InvalidPageRequest(
                "at least one page must be requested".to_string(),
            ));
        }
        if pages > 1 && !endpoint.is_paginated() {
            return Err(NewsError::InvalidPageRequest(format!(
                "{} does not support paging",
                endpoint
            )));
        }

        if pages == 1 {
            debug!(source = self.source.id(), page = start, "single page request");
            let mut page = self.source.fetch_page(endpoint, params).await?;
            page.index = start;
            return Ok(vec![page]);
        }

        let indices: Vec<i64> = (start..start + i64::from(pages)).collect();
        info!(
            source = self.source.id(),
            first = start,
            count = indices.len(),
            "dispatching page requests"
        );

        let source = self.source.as_ref();
        let requests = indices.iter().map(|&index| {
            let page_params = params.with_page(index);
            async move {
                let mut page = source.fetch_page(endpoint, &page_params).await?;
                page.index = index;
                debug!(page = index, items = page.item_count(), "page received");
                Ok::<Page, SourceError>(page)
            }
        });

        match self.policy {
            FailurePolicy::AbortOnFirst => Ok(try_join_all(requests).await?),
            FailurePolicy::CollectFailures => {
                let outcomes = join_all(requests).await;
                let mut fetched = Vec::with_capacity(outcomes.len());
                let mut failed = Vec::new();

                for (&index, outcome) in indices.iter().zip(outcomes) {
                    match outcome {
                        Ok(page) if page.is_ok() => fetched.push(page),
                        Ok(page) => {
                            warn!(page = index, status = %page.status, "page reported non-ok status");
                            failed.push(index);
                        }
                        Err(e) => {
                            warn!(page = index, error = %e, "page request failed");
                            failed.push(index);
                        }
                    }
                }

                if failed.is_empty() {
                    Ok(fetched)
                } else {
                    Err(NewsError::PartialFetchFailure { failed })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawParams;
    use crate::sources::{page_body, MockSource};
    use serde_json::json;
    use std::time::Duration;

    fn fetcher(mock: &Arc<MockSource>) -> PageFetcher {
        PageFetcher::new(Arc::clone(mock) as Arc<dyn NewsSource>)
    }

    #[tokio::test]
    async fn test_single_page_is_identity() {
        let mock = Arc::new(MockSource::new());
        let items = vec![json!({"title": "a"}), json!({"title": "b"})];
        mock.set_page(
            Endpoint::Everything,
            1,
            page_body(Endpoint::Everything, 9, items.clone()),
        );

        let params = RawParams::new().set("q", "x").normalize();
        let result = fetcher(&mock)
            .fetch(Endpoint::Everything, &params, 1)
            .await
            .unwrap();

        assert_eq!(mock.call_count(), 1);
        assert_eq!(result.items, Some(items));
        assert_eq!(result.total_results, Some(9));
        assert!(!result.is_multi_page());
        assert_eq!(mock.calls()[0].1, params);
    }

    #[tokio::test]
    async fn test_page_below_one_is_rejected_before_fetching() {
        let mock = Arc::new(MockSource::new());
        let params = RawParams::new().set("page", 0i64).normalize();

        let err = fetcher(&mock)
            .fetch(Endpoint::TopHeadlines, &params, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, NewsError::InvalidPageRequest(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_pages_is_rejected() {
        let mock = Arc::new(MockSource::new());
        let params = RawParams::new().normalize();
        let err = fetcher(&mock)
            .fetch(Endpoint::Everything, &params, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::InvalidPageRequest(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sources_cannot_page() {
        let mock = Arc::new(MockSource::new());
        let params = RawParams::new().normalize();
        let err = fetcher(&mock)
            .fetch(Endpoint::Sources, &params, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::InvalidPageRequest(_)));
    }

    #[tokio::test]
    async fn test_fan_out_requests_each_index_with_same_filters() {
        let mock = Arc::new(MockSource::new());
        let params = RawParams::new()
            .set("q", "rust")
            .set("pageSize", 2i64)
            .normalize();

        let pages = fetcher(&mock)
            .fetch_pages(Endpoint::Everything, &params, 3)
            .await
            .unwrap();

        assert_eq!(pages.iter().map(|p| p.index).collect::<Vec<_>>(), vec![1, 2, 3]);

        let mut requested: Vec<i64> = mock.calls().iter().map(|(_, p)| p.page()).collect();
        requested.sort();
        assert_eq!(requested, vec![1, 2, 3]);
        for (_, call) in mock.calls() {
            assert_eq!(call.get("q"), params.get("q"));
            assert_eq!(call.page_size(), 2);
        }
    }

    #[tokio::test]
    async fn test_fan_out_dispatches_before_awaiting() {
        let mock = Arc::new(MockSource::new());
        for index in 1..=3 {
            mock.set_delay(Endpoint::Everything, index, Duration::from_millis(200));
        }
        let params = RawParams::new().normalize();

        let started = std::time::Instant::now();
        fetcher(&mock)
            .fetch_pages(Endpoint::Everything, &params, 3)
            .await
            .unwrap();

        // Serial dispatch would take at least 600ms.
        assert!(started.elapsed() < Duration::from_millis(550));
    }

    #[tokio::test]
    async fn test_abort_on_first_propagates_transport_error() {
        let mock = Arc::new(MockSource::new());
        mock.set_error(Endpoint::Everything, 2, SourceError::RateLimit);
        let params = RawParams::new().normalize();

        let err = fetcher(&mock)
            .fetch(Endpoint::Everything, &params, 3)
            .await
            .unwrap_err();

        assert!(matches!(err, NewsError::Source(SourceError::RateLimit)));
    }

    #[tokio::test]
    async fn test_collect_failures_lists_failed_indices() {
        let mock = Arc::new(MockSource::new());
        mock.set_error(
            Endpoint::TopHeadlines,
            3,
            SourceError::Network("connection reset".to_string()),
        );
        mock.set_page(
            Endpoint::TopHeadlines,
            1,
            json!({"status": "error", "code": "unexpectedError", "message": "boom"}),
        );
        let params = RawParams::new().normalize();

        let err = fetcher(&mock)
            .with_policy(FailurePolicy::CollectFailures)
            .fetch(Endpoint::TopHeadlines, &params, 4)
            .await
            .unwrap_err();

        match err {
            NewsError::PartialFetchFailure { failed } => assert_eq!(failed, vec![1, 3]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(mock.call_count(), 4);
    }

    #[test]
    fn test_failure_policy_config_names() {
        let policy: FailurePolicy = serde_json::from_str("\"collect_failures\"").unwrap();
        assert_eq!(policy, FailurePolicy::CollectFailures);
        assert_eq!(FailurePolicy::default(), FailurePolicy::AbortOnFirst);
    }
}
