//! Display projection of a unified result.

use serde_json::Value;

use crate::error::NewsError;
use crate::models::{Endpoint, UnifiedResult};

/// Placeholder for fields that are missing or null
pub const MISSING_VALUE: &str = "-";

/// One rendered `name: value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedField {
    pub name: &'static str,
    pub value: String,
}

/// The rendered fields of one item, base fields first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedItem {
    pub fields: Vec<ProjectedField>,
}

/// Trailing count record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of items rendered
    pub processed: usize,

    /// Total reported by the service; only set for multi-page results
    pub total_results: Option<u64>,
}

/// Display-only view of a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedView {
    pub items: Vec<ProjectedItem>,
    pub summary: Summary,
}

/// Select the displayed fields of every item, in result order.
///
/// Base fields of `endpoint` are always rendered; verbose fields are
/// appended after them when `verbose` is set. A result without an item
/// collection is an error, never an empty view.
pub fn project(
    result: &UnifiedResult,
    endpoint: Endpoint,
    verbose: bool,
) -> Result<ProjectedView, NewsError> {
    let items = result.items.as_ref().ok_or_else(|| {
        NewsError::EmptyOrMalformedResult(format!(
            "no {} present in the response",
            endpoint.collection_key()
        ))
    })?;

    let spec = endpoint.spec();
    let extra: &[&'static str] = if verbose { spec.verbose_fields } else { &[] };

    let items: Vec<ProjectedItem> = items
        .iter()
        .map(|item| ProjectedItem {
            fields: spec
                .base_fields
                .iter()
                .chain(extra.iter())
                .map(|&name| ProjectedField {
                    name,
                    value: render_value(item.get(name)),
                })
                .collect(),
        })
        .collect();

    let summary = Summary {
        processed: items.len(),
        total_results: if result.is_multi_page() {
            result.total_results
        } else {
            None
        },
    };

    Ok(ProjectedView { items, summary })
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_VALUE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
