//! Shared read cache for token source files.
//!
//! The cache maps canonical absolute paths to parsed values. A per-key
//! single-flight gate guarantees that concurrent misses for the same path
//! load the file once; later tasks await the in-flight load. Cycle state
//! is never stored here — `visited` sets belong to individual resolution
//! calls.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use strata_core::{FileError, Result, StrataError, ValidationError, Value};
use tokio::sync::OnceCell;
use tracing::debug;

/// Process-wide file cache, keyed by canonical absolute path.
#[derive(Debug, Default)]
pub struct FileCache {
    entries: Mutex<HashMap<PathBuf, Arc<OnceCell<Arc<Value>>>>>,
}

impl FileCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and parse a JSON document, deduplicating concurrent loads.
    ///
    /// Returns the canonical path alongside the parsed value so callers
    /// can key cycle trails consistently.
    pub async fn load(&self, path: &Path) -> Result<(PathBuf, Arc<Value>)> {
        let canonical = tokio::fs::canonicalize(path)
            .await
            .map_err(|source| FileError::read(path, source))?;

        let cell = {
            let mut entries = self.entries.lock().expect("file cache poisoned");
            entries.entry(canonical.clone()).or_default().clone()
        };

        let value = cell
            .get_or_try_init(|| async {
                debug!(path = %canonical.display(), "loading token source");
                let text = tokio::fs::read_to_string(&canonical)
                    .await
                    .map_err(|source| StrataError::from(FileError::read(&canonical, source)))?;
                let json: serde_json::Value = serde_json::from_str(&text).map_err(|err| {
                    StrataError::from(ValidationError::Parse {
                        path: canonical.display().to_string(),
                        message: err.to_string(),
                    })
                })?;
                Ok::<_, StrataError>(Arc::new(Value::from_json(&json)))
            })
            .await?
            .clone();

        Ok((canonical, value))
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("file cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_parses_json() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("core.json");
        fs::write(&file, r##"{"color": {"$value": "#fff"}}"##).unwrap();

        let cache = FileCache::new();
        let (_, value) = cache.load(&file).await.unwrap();
        assert!(value.pointer("/color/$value").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_file_error() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new();
        let err = cache.load(&dir.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, StrataError::File(_)));
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_parse() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("shared.json");
        fs::write(&file, r#"{"a": 1}"#).unwrap();

        let cache = Arc::new(FileCache::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let file = file.clone();
            handles.push(tokio::spawn(async move { cache.load(&file).await }));
        }
        let mut values = Vec::new();
        for handle in handles {
            let (_, value) = handle.await.unwrap().unwrap();
            values.push(value);
        }
        // All callers see the same parsed allocation.
        for value in &values[1..] {
            assert!(Arc::ptr_eq(&values[0], value));
        }
        assert_eq!(cache.len(), 1);
    }
}
