//! Collection repository port
//!
//! Importers and callers go through this interface; nothing outside an
//! adapter touches the backing collection set directly.

use async_trait::async_trait;

use quiver_domain::Collection;

use super::StoreError;

/// Errors that can occur during collection repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Collection not found.
    #[error("Collection not found: {0}")]
    NotFound(String),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Persisted data could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Repository over the full collection set.
///
/// Writes are write-through: every mutation persists the whole updated set
/// immediately. Concurrent writers race (last writer wins); the repository
/// does not arbitrate.
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Returns every stored collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be loaded.
    async fn list(&self) -> Result<Vec<Collection>, RepositoryError>;

    /// Finds a collection by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be loaded.
    async fn find_by_id(&self, id: &str) -> Result<Option<Collection>, RepositoryError>;

    /// Finds a collection by exact name match.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be loaded.
    async fn find_by_name(&self, name: &str) -> Result<Option<Collection>, RepositoryError>;

    /// Adds a collection and persists the updated set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be persisted.
    async fn add(&self, collection: Collection) -> Result<(), RepositoryError>;

    /// Removes a collection by ID and persists the updated set.
    ///
    /// Child folders and requests live inside the collection, so the
    /// removal takes them along; there is no cross-collection cascade.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no collection has this ID.
    async fn remove(&self, id: &str) -> Result<(), RepositoryError>;
}
