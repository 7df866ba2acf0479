//! Environment repository port
//!
//! Holds the named environments plus the process-wide "active environment
//! name" selector the templating engine reads.

use async_trait::async_trait;

use quiver_domain::Environment;

use super::StoreError;

/// Errors that can occur during environment operations.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    /// Environment not found.
    #[error("Environment not found: {0}")]
    NotFound(String),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Persisted data could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Repository for environments and the active-environment selector.
#[async_trait]
pub trait EnvironmentRepository: Send + Sync {
    /// Returns every stored environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be loaded.
    async fn list(&self) -> Result<Vec<Environment>, EnvironmentError>;

    /// Finds an environment by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be loaded.
    async fn find(&self, name: &str) -> Result<Option<Environment>, EnvironmentError>;

    /// Inserts or replaces an environment, keyed by its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be persisted.
    async fn save(&self, environment: Environment) -> Result<(), EnvironmentError>;

    /// Removes an environment by name.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::NotFound`] if no environment has this
    /// name.
    async fn remove(&self, name: &str) -> Result<(), EnvironmentError>;

    /// Returns the active environment name, if one is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector cannot be loaded.
    async fn active_name(&self) -> Result<Option<String>, EnvironmentError>;

    /// Selects the active environment.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::NotFound`] if no environment has this
    /// name.
    async fn set_active(&self, name: &str) -> Result<(), EnvironmentError>;

    /// Loads the active environment, if one is selected and still exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read.
    async fn active(&self) -> Result<Option<Environment>, EnvironmentError> {
        match self.active_name().await? {
            Some(name) => self.find(&name).await,
            None => Ok(None),
        }
    }
}
