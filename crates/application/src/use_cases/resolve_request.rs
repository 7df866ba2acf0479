//! Resolve request use case
//!
//! Request-build-time variable resolution: loads the active environment and
//! substitutes its variables into a request's templated fields.

use quiver_domain::Request;

use crate::ports::{EnvironmentError, EnvironmentRepository};
use crate::templating::VariableResolver;

/// Errors that can occur while resolving a request.
#[derive(Debug, thiserror::Error)]
pub enum ResolveRequestError {
    /// The environment repository failed.
    #[error("failed to load the active environment: {0}")]
    Environment(#[from] EnvironmentError),
}

/// A request after variable resolution.
pub struct ResolvedRequest {
    /// The request with placeholders substituted.
    pub request: Request,
    /// The environment name used, or `None` when no environment is active.
    pub environment: Option<String>,
    /// Keys that stayed unresolved in the URL (still literal `{{key}}`).
    pub unresolved_keys: Vec<String>,
}

/// Resolves a request against the active environment.
pub struct ResolveRequest<E> {
    environments: E,
}

impl<E: EnvironmentRepository> ResolveRequest<E> {
    /// Creates the use case over an environment repository.
    pub const fn new(environments: E) -> Self {
        Self { environments }
    }

    /// Resolves `request` against the active environment's variables.
    ///
    /// With no active environment the request passes through unchanged;
    /// unresolved placeholders are reported, never an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the repository cannot be read.
    pub async fn execute(&self, request: &Request) -> Result<ResolvedRequest, ResolveRequestError> {
        let active = self.environments.active().await?;
        let environment = active.as_ref().map(|env| env.name.clone());
        let resolver = active
            .as_ref()
            .map_or_else(VariableResolver::empty, VariableResolver::for_environment);

        let resolved = resolver.resolve_request(request);
        let unresolved_keys = resolver.resolve(&request.url).unresolved_keys;

        Ok(ResolvedRequest {
            request: resolved,
            environment,
            unresolved_keys,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use quiver_domain::{Environment, HttpMethod};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockEnvRepository {
        environments: Mutex<HashMap<String, Environment>>,
        active: Mutex<Option<String>>,
    }

    impl MockEnvRepository {
        fn with_active(env: Environment) -> Self {
            let repo = Self::default();
            *repo.active.lock().expect("lock poisoned") = Some(env.name.clone());
            repo.environments
                .lock()
                .expect("lock poisoned")
                .insert(env.name.clone(), env);
            repo
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
    async fn test_resolves_against_active_environment() {
        let repo = MockEnvRepository::with_active(
            Environment::new("Dev").with_value("id", "42"),
        );
        let request = Request::new("Get", HttpMethod::Get, "https://x/{{id}}");

        let output = ResolveRequest::new(repo).execute(&request).await.unwrap();
        assert_eq!(output.request.url, "https://x/42");
        assert_eq!(output.environment.as_deref(), Some("Dev"));
        assert!(output.unresolved_keys.is_empty());
    }

    #[tokio::test]
    async fn test_no_active_environment_passes_through() {
        let request = Request::new("Get", HttpMethod::Get, "https://x/{{id}}");

        let output = ResolveRequest::new(MockEnvRepository::default())
            .execute(&request)
            .await
            .unwrap();
        assert_eq!(output.request.url, "https://x/{{id}}");
        assert!(output.environment.is_none());
        assert_eq!(output.unresolved_keys, vec!["id"]);
    }

    #[tokio::test]
    async fn test_reports_unresolved_url_keys() {
        let repo = MockEnvRepository::with_active(
            Environment::new("Dev").with_value("host", "example.com"),
        );
        let request = Request::new("Get", HttpMethod::Get, "https://{{host}}/{{missing}}");

        let output = ResolveRequest::new(repo).execute(&request).await.unwrap();
        assert_eq!(output.request.url, "https://example.com/{{missing}}");
        assert_eq!(output.unresolved_keys, vec!["missing"]);
    }
}
