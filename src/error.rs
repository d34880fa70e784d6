//! Errors raised by the fetch, merge, projection and persistence pipeline.

use std::path::PathBuf;

use crate::sources::SourceError;

/// Pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    /// A page index or page count below 1, or paging on an endpoint without pages.
    /// Raised before any remote call is made.
    #[error("Invalid page request: {0}")]
    InvalidPageRequest(String),

    /// One or more pages of a multi-page fetch failed or reported a non-ok status
    #[error("Failed to fetch page(s) {}", join_indices(.failed))]
    PartialFetchFailure { failed: Vec<i64> },

    /// The result carries no item collection
    #[error("Empty or malformed result: {0}")]
    EmptyOrMalformedResult(String),

    /// Writing the result to disk failed
    #[error("Failed to write {}: {source}", .path.display())]
    PersistenceError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The result could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Error from the remote service, passed through unchanged
    #[error(transparent)]
    Source(#[from] SourceError),
}

fn join_indices(indices: &[i64]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_lists_pages() {
        let err = NewsError::PartialFetchFailure { failed: vec![2, 4] };
        assert_eq!(err.to_string(), "Failed to fetch page(s) 2, 4");
    }

    #[test]
    fn test_source_error_is_transparent() {
        let err = NewsError::from(SourceError::RateLimit);
        assert_eq!(err.to_string(), SourceError::RateLimit.to_string());
        assert!(matches!(err, NewsError::Source(SourceError::RateLimit)));
    }
}
