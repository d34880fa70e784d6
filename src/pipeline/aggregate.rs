//! Merging of per-page responses into one result.

use tracing::{debug, warn};

use crate::error::NewsError;
use crate::models::{Page, UnifiedResult, STATUS_OK};

/// Merge the pages of one logical query.
///
/// A single page is passed through unchanged. Several pages are ordered by
/// page index (not by the order they arrived in) and their items
/// concatenated. `totalResults` comes from the lowest-indexed page; pages
/// disagreeing with it only produce a warning. Any page with a non-ok status
/// fails the merge with [`NewsError::PartialFetchFailure`].
pub fn merge(mut pages: Vec<Page>) -> Result<UnifiedResult, NewsError> {
    match pages.len() {
        0 => Err(NewsError::EmptyOrMalformedResult(
            "no pages to merge".to_string(),
        )),
        1 => Ok(pages.remove(0).into()),
        _ => {
            pages.sort_by_key(|p| p.index);
            merge_ordered(pages)
        }
    }
}

fn merge_ordered(pages: Vec<Page>) -> Result<UnifiedResult, NewsError> {
    let failed: Vec<i64> = pages
        .iter()
        .filter(|p| !p.is_ok())
        .inspect(|p| {
            warn!(
                page = p.index,
                status = %p.status,
                message = p.message.as_deref().unwrap_or(""),
                "page reported non-ok status"
            )
        })
        .map(|p| p.index)
        .collect();
    if !failed.is_empty() {
        return Err(NewsError::PartialFetchFailure { failed });
    }

    let total_results = pages[0].total_results;
    for page in &pages[1..] {
        if page.total_results != total_results {
            warn!(
                first = ?total_results,
                page = page.index,
                reported = ?page.total_results,
                "pages disagree on totalResults; keeping the first page's value"
            );
        }
    }

    let page_count = pages.len();
    let capacity = pages.iter().map(Page::item_count).sum();
    let mut items = Some(Vec::with_capacity(capacity));

    for page in pages {
        match page.items {
            Some(page_items) => {
                if let Some(merged) = items.as_mut() {
                    merged.extend(page_items);
                }
            }
            None => {
                warn!(page = page.index, "page is missing its item collection");
                items = None;
            }
        }
    }

    debug!(
        pages = page_count,
        items = items.as_ref().map_or(0, Vec::len),
        "merged pages"
    );

    Ok(UnifiedResult {
        status: STATUS_OK.to_string(),
        total_results,
        items,
        page_count,
    })
}
