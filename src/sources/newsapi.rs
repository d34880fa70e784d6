//! NewsAPI v2 source implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::models::{Endpoint, Page, QueryParams};
use crate::sources::{NewsSource, SourceError};
use crate::utils::HttpClient;

/// Production service root
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

const API_KEY_HEADER: &str = "X-Api-Key";

/// NewsAPI source
///
/// Uses the NewsAPI v2 REST API. The credential travels in a header, never
/// in the query string.
#[derive(Clone)]
pub struct NewsApiSource {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl NewsApiSource {
    /// Create a source against the production service
    pub fn new(api_key: impl Into<String>, client: HttpClient) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the source at another service root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build request URL
    fn build_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }
}

impl fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn id(&self) -> &str {
        "newsapi"
    }

    async fn fetch_page(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
    ) -> Result<Page, SourceError> {
        let (query, index) = if endpoint.is_paginated() {
            (params.to_query_pairs(), params.page())
        } else {
            (params.without_pagination().to_query_pairs(), 1)
        };

        let url = self.build_url(endpoint);
        debug!(%url, page = index, "requesting page");

        let response = self
            .client
            .client()
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to query {}: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        Ok(Page::from_json(endpoint, index, &body))
    }
}

/// Error body the service sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

fn error_from_response(status: StatusCode, body: &str) -> SourceError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|b| b.code.clone())
        .unwrap_or_else(|| status.as_u16().to_string());
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("service returned status {}", status));

    match status {
        StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimit,
        StatusCode::UNAUTHORIZED => SourceError::Unauthorized(message),
        _ => SourceError::Api { code, message },
    }
}
