//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use quiver_application::ports::{KeyValueStore, StoreError};

/// Volatile store backed by a map; the default for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        #[allow(clippy::expect_used)]
        let values = self.values.lock().expect("store lock poisoned");
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        #[allow(clippy::expect_used)]
        let mut values = self.values.lock().expect("store lock poisoned");
        values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());

        store.set("key", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some(json!({"a": 1})));

        store.set("key", json!([2])).await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some(json!([2])));
    }
}
