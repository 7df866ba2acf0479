//! Persistent key-value store port
//!
//! The store is the single persistence collaborator: JSON values keyed by
//! string, with whole-value writes (no partial updates).

use async_trait::async_trait;
use serde_json::Value;

/// Errors that can occur in the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error on the backing medium.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be parsed as JSON.
    #[error("Corrupt value for key '{key}': {message}")]
    Corrupt {
        /// The key whose value is corrupt.
        key: String,
        /// Parse failure detail.
        message: String,
    },
}

/// Persistent JSON store keyed by string.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the value is not
    /// valid JSON.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}
