//! Store-backed environment repository.

use async_trait::async_trait;
use serde_json::Value;

use quiver_application::ports::{EnvironmentError, EnvironmentRepository, KeyValueStore};
use quiver_domain::Environment;

/// Store key holding the full environment set.
const ENVIRONMENTS_KEY: &str = "environments";
/// Store key holding the active environment name.
const ACTIVE_KEY: &str = "active_environment";

/// Environment repository persisting the set and the active-name selector
/// under two store keys.
#[derive(Debug)]
pub struct StoreEnvironmentRepository<S> {
    store: S,
}

impl<S: KeyValueStore> StoreEnvironmentRepository<S> {
    /// Creates a repository over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    async fn load_all(&self) -> Result<Vec<Environment>, EnvironmentError> {
        match self.store.get(ENVIRONMENTS_KEY).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| EnvironmentError::Serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn save_all(&self, environments: &[Environment]) -> Result<(), EnvironmentError> {
        let value: Value = serde_json::to_value(environments)
            .map_err(|e| EnvironmentError::Serialization(e.to_string()))?;
        self.store.set(ENVIRONMENTS_KEY, value).await?;
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore> EnvironmentRepository for StoreEnvironmentRepository<S> {
    async fn list(&self) -> Result<Vec<Environment>, EnvironmentError> {
        self.load_all().await
    }

    async fn find(&self, name: &str) -> Result<Option<Environment>, EnvironmentError> {
        Ok(self.load_all().await?.into_iter().find(|e| e.name == name))
    }

    async fn save(&self, environment: Environment) -> Result<(), EnvironmentError> {
        let mut environments = self.load_all().await?;
        match environments.iter_mut().find(|e| e.name == environment.name) {
            Some(existing) => *existing = environment,
            None => environments.push(environment),
        }
        self.save_all(&environments).await
    }

    async fn remove(&self, name: &str) -> Result<(), EnvironmentError> {
        let mut environments = self.load_all().await?;
        let before = environments.len();
        environments.retain(|e| e.name != name);
        if environments.len() == before {
            return Err(EnvironmentError::NotFound(name.to_string()));
        }
        self.save_all(&environments).await?;

        // Deselect rather than leave the selector dangling.
        if self.active_name().await?.as_deref() == Some(name) {
            self.store.set(ACTIVE_KEY, Value::Null).await?;
        }
        Ok(())
    }

    async fn active_name(&self) -> Result<Option<String>, EnvironmentError> {
        match self.store.get(ACTIVE_KEY).await? {
            Some(Value::String(name)) => Ok(Some(name)),
            _ => Ok(None),
        }
    }

    async fn set_active(&self, name: &str) -> Result<(), EnvironmentError> {
        if self.find(name).await?.is_none() {
            return Err(EnvironmentError::NotFound(name.to_string()));
        }
        self.store
            .set(ACTIVE_KEY, Value::String(name.to_string()))
            .await?;
        Ok(())
    }
}
