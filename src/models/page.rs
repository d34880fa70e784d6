//! Page and unified result models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Endpoint;

/// Status string the service reports for a successful response
pub const STATUS_OK: &str = "ok";

/// One raw response from the service for a single page index
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page index this response was requested for
    pub index: i64,

    /// Reported status (`"ok"` on success)
    pub status: String,

    /// Total number of matches across all pages, if reported
    pub total_results: Option<u64>,

    /// Items in service order; `None` when the collection key was missing
    pub items: Option<Vec<Value>>,

    /// Error message reported alongside a non-ok status
    pub message: Option<String>,
}

impl Page {
    /// Create an ok page
    pub fn new(index: i64, items: Vec<Value>) -> Self {
        Self {
            index,
            status: STATUS_OK.to_string(),
            total_results: None,
            items: Some(items),
            message: None,
        }
    }

    /// Set total results
    pub fn total_results(mut self, total: u64) -> Self {
        self.total_results = Some(total);
        self
    }

    /// Set status
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Build a page from a decoded response body.
    ///
    /// The item list is read from the endpoint's collection key. Item
    /// contents are kept as-is.
    pub fn from_json(endpoint: Endpoint, index: i64, body: &Value) -> Self {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let total_results = body.get("totalResults").and_then(Value::as_u64);

        let items = body
            .get(endpoint.collection_key())
            .and_then(Value::as_array)
            .cloned();

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            index,
            status,
            total_results,
            items,
            message,
        }
    }

    /// Whether the service reported success for this page
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Number of items, zero when the collection was missing
    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }
}

/// The logical merge of every page fetched for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedResult {
    pub status: String,

    #[serde(rename = "totalResults", default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Value>>,

    /// How many pages were merged into this result
    #[serde(skip, default = "one")]
    pub page_count: usize,
}

fn one() -> usize {
    1
}

impl UnifiedResult {
    /// Whether more than one page contributed to this result
    pub fn is_multi_page(&self) -> bool {
        self.page_count > 1
    }

    /// Number of items, zero when the collection was missing
    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }
}

impl From<Page> for UnifiedResult {
    fn from(page: Page) -> Self {
        Self {
            status: page.status,
            total_results: page.total_results,
            items: page.items,
            page_count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_from_articles_body() {
        let body = json!({
            "status": "ok",
            "totalResults": 42,
            "articles": [{"title": "A"}, {"title": "B"}]
        });

        let page = Page::from_json(Endpoint::Everything, 2, &body);
        assert_eq!(page.index, 2);
        assert!(page.is_ok());
        assert_eq!(page.total_results, Some(42));
        assert_eq!(page.item_count(), 2);
    }

    #[test]
    fn test_page_from_sources_body_has_no_total() {
        let body = json!({"status": "ok", "sources": [{"id": "bbc-news"}]});
        let page = Page::from_json(Endpoint::Sources, 1, &body);
        assert_eq!(page.total_results, None);
        assert_eq!(page.item_count(), 1);
    }

    #[test]
    fn test_page_missing_collection_key() {
        let body = json!({"status": "ok", "totalResults": 3});
        let page = Page::from_json(Endpoint::TopHeadlines, 1, &body);
        assert!(page.items.is_none());
    }

    #[test]
    fn test_page_error_body() {
        let body = json!({"status": "error", "code": "apiKeyInvalid", "message": "bad key"});
        let page = Page::from_json(Endpoint::Everything, 1, &body);
        assert!(!page.is_ok());
        assert_eq!(page.message.as_deref(), Some("bad key"));
    }

    #[test]
    fn test_unified_result_serialization_shape() {
        let result = UnifiedResult::from(Page::new(1, vec![json!({"title": "T"})]).total_results(7));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"status": "ok", "totalResults": 7, "items": [{"title": "T"}]})
        );
    }

    #[test]
    fn test_unified_result_omits_missing_total() {
        let result = UnifiedResult::from(Page::new(1, vec![]));
        let text = serde_json::to_string(&result).unwrap();
        assert_eq!(text, r#"{"status":"ok","items":[]}"#);
    }
}
