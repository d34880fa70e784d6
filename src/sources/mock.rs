//! Mock source for testing purposes.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{Endpoint, Page, QueryParams};
use crate::sources::{NewsSource, SourceError};

type Canned = Result<Value, SourceError>;

/// A mock source that answers page requests from predefined responses.
///
/// Each `(endpoint, page)` pair can carry a response body or an error and an
/// optional delay, which lets tests control completion order of concurrent
/// requests. Every request is recorded in arrival order.
#[derive(Debug, Default)]
pub struct MockSource {
    responses: Mutex<HashMap<(Endpoint, i64), Canned>>,
    delays: Mutex<HashMap<(Endpoint, i64), Duration>>,
    calls: Mutex<Vec<(Endpoint, QueryParams)>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response body for one page.
    pub fn set_page(&self, endpoint: Endpoint, page: i64, body: Value) {
        let mut guard = self.responses.lock().unwrap();
        guard.insert((endpoint, page), Ok(body));
    }

    /// Make one page fail with the given error.
    pub fn set_error(&self, endpoint: Endpoint, page: i64, error: SourceError) {
        let mut guard = self.responses.lock().unwrap();
        guard.insert((endpoint, page), Err(error));
    }

    /// Delay the answer for one page.
    pub fn set_delay(&self, endpoint: Endpoint, page: i64, delay: Duration) {
        let mut guard = self.delays.lock().unwrap();
        guard.insert((endpoint, page), delay);
    }

    /// Requests received so far, in arrival order.
    pub fn calls(&self) -> Vec<(Endpoint, QueryParams)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl NewsSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    async fn fetch_page(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
    ) -> Result<Page, SourceError> {
        let index = params.page();
        self.calls.lock().unwrap().push((endpoint, params.clone()));

        let delay = self.delays.lock().unwrap().get(&(endpoint, index)).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let canned = self
            .responses
            .lock()
            .unwrap()
            .get(&(endpoint, index))
            .cloned();

        match canned {
            Some(Ok(body)) => Ok(Page::from_json(endpoint, index, &body)),
            Some(Err(e)) => Err(e),
            None => Ok(Page::new(index, Vec::new())),
        }
    }
}

/// Helper to build an ok response body for an endpoint.
pub fn page_body(endpoint: Endpoint, total: u64, items: Vec<Value>) -> Value {
    let mut body = serde_json::Map::new();
    body.insert("status".to_string(), Value::from("ok"));
    if endpoint.is_paginated() {
        body.insert("totalResults".to_string(), Value::from(total));
    }
    body.insert(endpoint.collection_key().to_string(), Value::from(items));
    Value::Object(body)
}
