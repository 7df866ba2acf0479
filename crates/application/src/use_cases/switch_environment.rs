//! Switch environment use case

use quiver_domain::Environment;

use crate::ports::{EnvironmentError, EnvironmentRepository};
use crate::templating::VariableResolver;

/// Errors that can occur when switching environments.
#[derive(Debug, thiserror::Error)]
pub enum SwitchEnvironmentError {
    /// Environment not found.
    #[error("environment not found: {0}")]
    NotFound(String),

    /// Failed to load or persist the selection.
    #[error("failed to switch environment: {0}")]
    Repository(String),
}

impl From<EnvironmentError> for SwitchEnvironmentError {
    fn from(error: EnvironmentError) -> Self {
        match error {
            EnvironmentError::NotFound(name) => Self::NotFound(name),
            other => Self::Repository(other.to_string()),
        }
    }
}

/// Output of a successful switch.
pub struct SwitchEnvironmentOutput {
    /// The newly active environment.
    pub environment: Environment,
    /// A resolver over the new environment, ready for request building.
    pub resolver: VariableResolver,
}

/// Selects the active environment and hands back a matching resolver.
pub struct SwitchEnvironment<E> {
    environments: E,
}

impl<E: EnvironmentRepository> SwitchEnvironment<E> {
    /// Creates the use case over an environment repository.
    pub const fn new(environments: E) -> Self {
        Self { environments }
    }

    /// Switches the active environment to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchEnvironmentError::NotFound`] when no environment has
    /// this name, or a repository error when persistence fails.
    pub async fn execute(
        &self,
        name: &str,
    ) -> Result<SwitchEnvironmentOutput, SwitchEnvironmentError> {
        let environment = self
            .environments
            .find(name)
            .await?
            .ok_or_else(|| SwitchEnvironmentError::NotFound(name.to_string()))?;

        self.environments.set_active(name).await?;

        let resolver = VariableResolver::for_environment(&environment);
        Ok(SwitchEnvironmentOutput {
            environment,
            resolver,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockEnvRepository {
        environments: Mutex<HashMap<String, Environment>>,
        active: Mutex<Option<String>>,
    }

    impl MockEnvRepository {
        fn add(&self, env: Environment) {
            let mut envs = self.environments.lock().expect("lock poisoned");
            envs.insert(env.name.clone(), env);
        }
    }

    #[async_trait]
    impl EnvironmentRepository for MockEnvRepository {
        async fn list(&self) -> Result<Vec<Environment>, EnvironmentError> {
            let envs = self.environments.lock().expect("lock poisoned");
            Ok(envs.values().cloned().collect())
        }

        async fn find(&self, name: &str) -> Result<Option<Environment>, EnvironmentError> {
            let envs = self.environments.lock().expect("lock poisoned");
            Ok(envs.get(name).cloned())
        }

        async fn save(&self, environment: Environment) -> Result<(), EnvironmentError> {
            let mut envs = self.environments.lock().expect("lock poisoned");
            envs.insert(environment.name.clone(), environment);
            Ok(())
        }

        async fn remove(&self, name: &str) -> Result<(), EnvironmentError> {
            let mut envs = self.environments.lock().expect("lock poisoned");
            envs.remove(name)
                .map(|_| ())
                .ok_or_else(|| EnvironmentError::NotFound(name.to_string()))
        }

        async fn active_name(&self) -> Result<Option<String>, EnvironmentError> {
            Ok(self.active.lock().expect("lock poisoned").clone())
        }

        async fn set_active(&self, name: &str) -> Result<(), EnvironmentError> {
            *self.active.lock().expect("lock poisoned") = Some(name.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_switch_success_returns_working_resolver() {
        let repo = MockEnvRepository::default();
        repo.add(Environment::new("Staging").with_value("host", "staging.example.com"));

        let use_case = SwitchEnvironment::new(repo);
        let output = use_case.execute("Staging").await.expect("should switch");

        assert_eq!(output.environment.name, "Staging");
        assert_eq!(
            output.resolver.resolve_text("https://{{host}}/ping"),
            "https://staging.example.com/ping"
        );
    }

    #[tokio::test]
    async fn test_switch_persists_the_active_name() {
        let repo = MockEnvRepository::default();
        repo.add(Environment::new("Production"));

        let use_case = SwitchEnvironment::new(repo);
        use_case.execute("Production").await.expect("should switch");

        assert_eq!(
            use_case.environments.active_name().await.unwrap().as_deref(),
            Some("Production")
        );
    }

    #[tokio::test]
    async fn test_switch_to_unknown_environment_fails() {
        let use_case = SwitchEnvironment::new(MockEnvRepository::default());
        let result = use_case.execute("nonexistent").await;
        assert!(matches!(result, Err(SwitchEnvironmentError::NotFound(_))));
    }
}
