//! Writing a unified result to disk.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

use crate::error::NewsError;
use crate::models::UnifiedResult;

/// Serialize the full result as compact JSON to `destination`.
///
/// Any existing file is overwritten. Missing parent directories are not
/// created. Returns the path written on success.
#[instrument(level = "info", skip_all, fields(destination = %destination.display()))]
pub async fn persist(result: &UnifiedResult, destination: &Path) -> Result<PathBuf, NewsError> {
    let json = serde_json::to_string(result)?;

    if let Err(source) = fs::write(destination, &json).await {
        error!(error = %source, "Failed to write result");
        return Err(NewsError::PersistenceError {
            path: destination.to_path_buf(),
            source,
        });
    }

    info!(bytes = json.len(), "Wrote result");
    Ok(destination.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    fn sample() -> UnifiedResult {
        Page::new(
            1,
            vec![json!({
                "title": "T",
                "author": "A",
                "url": "U",
                "source": {"id": null, "name": "Example"},
                "publishedAt": "2018-07-07T01:07:36Z"
            })],
        )
        .total_results(1)
        .into()
    }

    #[tokio::test]
    async fn test_persist_writes_full_items() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("result.json");

        let written = persist(&sample(), &path).await.unwrap();
        assert_eq!(written, path);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.ends_with('\n'));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["totalResults"], 1);
        assert_eq!(value["items"][0]["publishedAt"], "2018-07-07T01:07:36Z");
        assert_eq!(value["items"][0]["source"]["name"], "Example");
    }

    #[tokio::test]
    async fn test_persist_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(&path, "x".repeat(4096)).unwrap();

        persist(&sample(), &path).await.unwrap();

        let back: UnifiedResult =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.items, sample().items);
    }

    #[tokio::test]
    async fn test_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("result.json");

        let err = persist(&sample(), &path).await.unwrap_err();
        match err {
            NewsError::PersistenceError { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
