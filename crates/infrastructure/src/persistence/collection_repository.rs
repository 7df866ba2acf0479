//! Store-backed collection repository.

use async_trait::async_trait;
use serde_json::Value;

use quiver_application::ports::{CollectionRepository, KeyValueStore, RepositoryError};
use quiver_domain::Collection;

/// Store key holding the full collection set.
const COLLECTIONS_KEY: &str = "collections";

/// Collection repository persisting the whole set under one store key.
#[derive(Debug)]
pub struct StoreCollectionRepository<S> {
    store: S,
}

impl<S: KeyValueStore> StoreCollectionRepository<S> {
    /// Creates a repository over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    async fn load_all(&self) -> Result<Vec<Collection>, RepositoryError> {
        match self.store.get(COLLECTIONS_KEY).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn save_all(&self, collections: &[Collection]) -> Result<(), RepositoryError> {
        let value: Value = serde_json::to_value(collections)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.store.set(COLLECTIONS_KEY, value).await?;
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore> CollectionRepository for StoreCollectionRepository<S> {
    async fn list(&self) -> Result<Vec<Collection>, RepositoryError> {
        self.load_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Collection>, RepositoryError> {
        Ok(self.load_all().await?.into_iter().find(|c| c.id == id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Collection>, RepositoryError> {
        Ok(self.load_all().await?.into_iter().find(|c| c.name == name))
    }

    async fn add(&self, collection: Collection) -> Result<(), RepositoryError> {
        let mut collections = self.load_all().await?;
        collections.push(collection);
        self.save_all(&collections).await
    }

    async fn remove(&self, id: &str) -> Result<(), RepositoryError> {
        let mut collections = self.load_all().await?;
        let before = collections.len();
        collections.retain(|c| c.id != id);
        if collections.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        self.save_all(&collections).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use pretty_assertions::assert_eq;
    use quiver_domain::CollectionBuilder;

    fn collection(name: &str) -> Collection {
        CollectionBuilder::new(name).build()
    }

    #[tokio::test]
    async fn test_add_list_find() {
        let repo = StoreCollectionRepository::new(MemoryStore::new());
        assert!(repo.list().await.unwrap().is_empty());

        let api = collection("API");
        let id = api.id.clone();
        repo.add(api).await.unwrap();
        repo.add(collection("Other")).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert_eq!(repo.find_by_id(&id).await.unwrap().unwrap().name, "API");
        assert_eq!(repo.find_by_name("Other").await.unwrap().unwrap().name, "Other");
        assert!(repo.find_by_name("Missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = StoreCollectionRepository::new(MemoryStore::new());
        let api = collection("API");
        let id = api.id.clone();
        repo.add(api).await.unwrap();

        repo.remove(&id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());

        let err = repo.remove(&id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
