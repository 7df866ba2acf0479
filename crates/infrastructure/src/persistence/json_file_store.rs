//! JSON-file key-value store.
//!
//! One file per key under a root directory, written as deterministic JSON
//! so stored files diff cleanly.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use quiver_application::ports::{KeyValueStore, StoreError};

use crate::serialization::to_json_stable_bytes;

/// Durable store keeping each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `root`. The directory is created on the
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a store in the platform data directory (`<data_dir>/quiver`),
    /// falling back to the current directory when none is known.
    #[must_use]
    pub fn in_data_dir() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("quiver"))
    }

    /// The directory holding the store files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", slugify(key)))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let value = serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        let bytes = to_json_stable_bytes(&value).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        debug!(key, path = %path.display(), "writing store value");
        fs::write(&path, bytes).await?;
        Ok(())
    }
}

/// Reduces a key to a safe file stem: lowercase alphanumerics with single
/// dashes between runs of anything else.
fn slugify(key: &str) -> String {
    let mut slug = String::with_capacity(key.len());
    let mut last_dash = true;
    for c in key.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("collections"), "collections");
        assert_eq!(slugify("Active Environment!"), "active-environment");
        assert_eq!(slugify("__a__b__"), "a-b");
    }

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert!(store.get("collections").await.unwrap().is_none());
        store
            .set("collections", json!([{"name": "API"}]))
            .await
            .unwrap();

        assert_eq!(
            store.get("collections").await.unwrap(),
            Some(json!([{"name": "API"}]))
        );
        assert!(dir.path().join("collections.json").is_file());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported_with_its_key() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("state.json"), "{broken")
            .await
            .unwrap();

        let store = JsonFileStore::new(dir.path());
        let err = store.get("state").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { key, .. } if key == "state"));
    }
}
