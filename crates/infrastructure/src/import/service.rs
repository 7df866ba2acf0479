//! Import orchestration: detect, decode, commit, notify.

use std::path::Path;

use tracing::{debug, error, info, warn};

use quiver_application::ports::{
    CollectionRepository, EnvironmentError, EnvironmentRepository, FileSystem, FileSystemError,
    Notifier, RepositoryError, Severity,
};

use super::{
    DecodeError, DecoderRegistry, FormatTag, ImportBundle, ImportLimits, ImportWarning,
    WarningStats, detect_format,
};

/// Errors that abort an import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The input matched no known format.
    #[error("unrecognized input format")]
    UnrecognizedFormat,

    /// The input exceeds the size limit.
    #[error("input of {size} bytes exceeds the {max} byte limit")]
    InputTooLarge {
        /// Input size in bytes.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The decoder rejected the input.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Decoded collections could not be persisted.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Decoded environments could not be persisted.
    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    /// The input file could not be read.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),
}

/// What an import (or preview) produced.
#[derive(Debug)]
pub struct ImportSummary {
    /// Detected input format.
    pub format: FormatTag,
    /// Names of the collections, after any collision rename.
    pub collections: Vec<String>,
    /// Names of the environments.
    pub environments: Vec<String>,
    /// Total requests across the collections.
    pub requests: usize,
    /// Total folders across the collections.
    pub folders: usize,
    /// Items skipped during decoding.
    pub skipped: usize,
    /// Item-level warnings gathered during decoding.
    pub warnings: Vec<ImportWarning>,
}

impl ImportSummary {
    fn from_bundle(format: FormatTag, bundle: &ImportBundle) -> Self {
        Self {
            format,
            collections: bundle.collections.iter().map(|c| c.name.clone()).collect(),
            environments: bundle.environments.iter().map(|e| e.name.clone()).collect(),
            requests: bundle.request_count(),
            folders: bundle.folder_count(),
            skipped: bundle.skipped,
            warnings: bundle.warnings.clone(),
        }
    }
}

/// Drives imports end to end: detect the format, decode, persist the
/// results, and notify the user.
#[derive(Debug)]
pub struct ImportService<R, E, N> {
    collections: R,
    environments: E,
    notifier: N,
    registry: DecoderRegistry,
}

impl<R, E, N> ImportService<R, E, N>
where
    R: CollectionRepository,
    E: EnvironmentRepository,
    N: Notifier,
{
    /// Creates a service with default limits.
    pub fn new(collections: R, environments: E, notifier: N) -> Self {
        Self::with_limits(collections, environments, notifier, ImportLimits::default())
    }

    /// Creates a service with explicit limits.
    pub fn with_limits(
        collections: R,
        environments: E,
        notifier: N,
        limits: ImportLimits,
    ) -> Self {
        Self {
            collections,
            environments,
            notifier,
            registry: DecoderRegistry::new(limits),
        }
    }

    /// The collection repository imports commit into.
    pub const fn collection_repository(&self) -> &R {
        &self.collections
    }

    /// The environment repository imports commit into.
    pub const fn environment_repository(&self) -> &E {
        &self.environments
    }

    /// Detects and decodes without persisting anything.
    ///
    /// The summary shows what an [`import_text`](Self::import_text) of the
    /// same input would store, minus collision renames.
    ///
    /// # Errors
    ///
    /// Returns the same errors as a full import, short of persistence
    /// failures.
    pub fn preview(
        &self,
        text: &str,
        filename: Option<&str>,
    ) -> Result<ImportSummary, ImportError> {
        let (format, bundle) = self.decode(text, filename)?;
        Ok(ImportSummary::from_bundle(format, &bundle))
    }

    /// Imports from text, persisting decoded collections and environments.
    ///
    /// Collections whose name is already taken are stored under
    /// `"<name> (Imported)"`; the suffix is appended exactly once.
    /// Environments are upserts keyed by name.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::UnrecognizedFormat`] for unclassifiable
    /// input, [`ImportError::InputTooLarge`] past the size limit, a decode
    /// error when the input is structurally bad, and a persistence error
    /// when the repositories fail.
    pub async fn import_text(
        &self,
        text: &str,
        filename: Option<&str>,
    ) -> Result<ImportSummary, ImportError> {
        let (format, mut bundle) = match self.decode(text, filename) {
            Ok(decoded) => decoded,
            Err(err) => {
                error!(%err, "import failed");
                self.notifier
                    .notify("Import failed", &err.to_string(), Severity::Error);
                return Err(err);
            }
        };

        if let Err(err) = self.commit(&mut bundle).await {
            error!(%err, "import failed");
            self.notifier
                .notify("Import failed", &err.to_string(), Severity::Error);
            return Err(err);
        }

        let summary = ImportSummary::from_bundle(format, &bundle);
        info!(
            format = %summary.format,
            collections = summary.collections.len(),
            environments = summary.environments.len(),
            requests = summary.requests,
            skipped = summary.skipped,
            "import committed"
        );
        if !summary.warnings.is_empty() {
            let stats = WarningStats::from_warnings(&summary.warnings);
            warn!(%stats, "import finished with warnings");
            self.notifier.notify(
                "Import finished with warnings",
                &stats.to_string(),
                Severity::Warning,
            );
        }
        self.notifier.notify(
            "Import complete",
            &format!(
                "{} request(s) in {} collection(s), {} environment(s)",
                summary.requests,
                summary.collections.len(),
                summary.environments.len()
            ),
            Severity::Info,
        );
        Ok(summary)
    }

    /// Reads a file and imports its content, using the file name as a
    /// detection hint.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::FileSystem`] when the file cannot be read,
    /// plus every [`import_text`](Self::import_text) error.
    pub async fn import_file(
        &self,
        fs: &impl FileSystem,
        path: &Path,
    ) -> Result<ImportSummary, ImportError> {
        let text = fs.read_to_string(path).await?;
        let filename = path.file_name().and_then(|n| n.to_str());
        self.import_text(&text, filename).await
    }

    /// Persists the decoded bundle, renaming colliding collections.
    async fn commit(&self, bundle: &mut ImportBundle) -> Result<(), ImportError> {
        for collection in &mut bundle.collections {
            if self.collections.find_by_name(&collection.name).await?.is_some() {
                let renamed = format!("{} (Imported)", collection.name);
                debug!(from = %collection.name, to = %renamed, "renaming colliding collection");
                collection.name = renamed;
            }
            self.collections.add(collection.clone()).await?;
        }
        for environment in &bundle.environments {
            self.environments.save(environment.clone()).await?;
        }
        Ok(())
    }

    fn decode(
        &self,
        text: &str,
        filename: Option<&str>,
    ) -> Result<(FormatTag, ImportBundle), ImportError> {
        let size = text.len();
        let max = self.registry.limits().max_input_bytes;
        if size > max {
            return Err(ImportError::InputTooLarge { size, max });
        }

        let format = detect_format(text, filename);
        debug!(%format, ?filename, size, "detected input format");
        if !self.registry.supports(format) {
            return Err(ImportError::UnrecognizedFormat);
        }

        let bundle = self.registry.decode(format, text)?;
        Ok((format, bundle))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use quiver_domain::{Collection, Environment};

    #[derive(Default)]
    struct MemCollections {
        items: Mutex<Vec<Collection>>,
    }

    #[async_trait]
    impl CollectionRepository for MemCollections {
        async fn list(&self) -> Result<Vec<Collection>, RepositoryError> {
            Ok(self.items.lock().unwrap().clone())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Collection>, RepositoryError> {
            Ok(self.items.lock().unwrap().iter().find(|c| c.id == id).cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Collection>, RepositoryError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.name == name)
                .cloned())
        }

        async fn add(&self, collection: Collection) -> Result<(), RepositoryError> {
            self.items.lock().unwrap().push(collection);
            Ok(())
        }

        async fn remove(&self, id: &str) -> Result<(), RepositoryError> {
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|c| c.id != id);
            if items.len() == before {
                return Err(RepositoryError::NotFound(id.to_string()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemEnvironments {
        items: Mutex<HashMap<String, Environment>>,
        active: Mutex<Option<String>>,
    }

    #[async_trait]
    impl EnvironmentRepository for MemEnvironments {
        async fn list(&self) -> Result<Vec<Environment>, EnvironmentError> {
            Ok(self.items.lock().unwrap().values().cloned().collect())
        }

        async fn find(&self, name: &str) -> Result<Option<Environment>, EnvironmentError> {
            Ok(self.items.lock().unwrap().get(name).cloned())
        }

        async fn save(&self, environment: Environment) -> Result<(), EnvironmentError> {
            self.items
                .lock()
                .unwrap()
                .insert(environment.name.clone(), environment);
            Ok(())
        }

        async fn remove(&self, name: &str) -> Result<(), EnvironmentError> {
            self.items
                .lock()
                .unwrap()
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| EnvironmentError::NotFound(name.to_string()))
        }

        async fn active_name(&self) -> Result<Option<String>, EnvironmentError> {
            Ok(self.active.lock().unwrap().clone())
        }

        async fn set_active(&self, name: &str) -> Result<(), EnvironmentError> {
            *self.active.lock().unwrap() = Some(name.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<(String, String, Severity)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, message: &str, severity: Severity) {
            self.messages
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string(), severity));
        }
    }

    /// Repository whose writes always fail, for the persistence error path.
    struct FailingCollections;

    #[async_trait]
    impl CollectionRepository for FailingCollections {
        async fn list(&self) -> Result<Vec<Collection>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<Collection>, RepositoryError> {
            Ok(None)
        }

        async fn find_by_name(&self, _name: &str) -> Result<Option<Collection>, RepositoryError> {
            Ok(None)
        }

        async fn add(&self, _collection: Collection) -> Result<(), RepositoryError> {
            Err(RepositoryError::Serialization("store unavailable".to_string()))
        }

        async fn remove(&self, id: &str) -> Result<(), RepositoryError> {
            Err(RepositoryError::NotFound(id.to_string()))
        }
    }

    fn postman_text(name: &str) -> String {
        format!(
            r#"{{"info":{{"name":"{name}","schema":"https://schema.getpostman.com/json/collection/v2.1.0/collection.json"}},
                "item":[{{"name":"Ping","request":{{"method":"GET","url":"https://x/ping"}}}}]}}"#
        )
    }

    fn service() -> ImportService<MemCollections, MemEnvironments, RecordingNotifier> {
        ImportService::new(
            MemCollections::default(),
            MemEnvironments::default(),
            RecordingNotifier::default(),
        )
    }

    #[tokio::test]
    async fn test_import_commits_and_notifies() {
        let service = service();
        let summary = service
            .import_text(&postman_text("My API"), None)
            .await
            .unwrap();

        assert_eq!(summary.format, FormatTag::PostmanCollection);
        assert_eq!(summary.collections, vec!["My API".to_string()]);
        assert_eq!(summary.requests, 1);

        let stored = service.collections.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "My API");

        let notes = service.notifier.messages.lock().unwrap();
        assert!(
            notes
                .iter()
                .any(|(t, _, s)| t == "Import complete" && *s == Severity::Info)
        );
    }

    #[tokio::test]
    async fn test_name_collision_appends_suffix_once() {
        let service = service();
        service.import_text(&postman_text("API"), None).await.unwrap();
        let summary = service.import_text(&postman_text("API"), None).await.unwrap();

        assert_eq!(summary.collections, vec!["API (Imported)".to_string()]);
        let stored = service.collections.list().await.unwrap();
        let names: Vec<&str> = stored.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["API", "API (Imported)"]);
    }

    #[tokio::test]
    async fn test_environment_import_is_an_upsert() {
        let service = service();
        let env = r#"{"name":"Dev","values":[{"key":"host","value":"localhost"}]}"#;
        service.import_text(env, None).await.unwrap();

        let updated = r#"{"name":"Dev","values":[{"key":"host","value":"dev.example.com"}]}"#;
        let summary = service.import_text(updated, None).await.unwrap();
        assert_eq!(summary.format, FormatTag::PostmanEnvironment);

        let stored = service.environments.find("Dev").await.unwrap().unwrap();
        assert_eq!(stored.get("host"), Some("dev.example.com"));
        assert_eq!(service.environments.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_input_is_rejected() {
        let service = service();
        let err = service
            .import_text("completely unrelated text", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::UnrecognizedFormat));
        assert!(service.collections.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_input_is_rejected_before_decoding() {
        let service = ImportService::with_limits(
            MemCollections::default(),
            MemEnvironments::default(),
            RecordingNotifier::default(),
            ImportLimits {
                max_input_bytes: 64,
                ..ImportLimits::default()
            },
        );

        let err = service
            .import_text(&postman_text("Too Big"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::InputTooLarge { max: 64, .. }));
    }

    #[tokio::test]
    async fn test_decode_failure_notifies_error() {
        let service = service();
        let err = service
            .import_text("{broken", Some("api.postman.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Decode(DecodeError::MalformedInput(_))));

        let notes = service.notifier.messages.lock().unwrap();
        assert!(
            notes
                .iter()
                .any(|(t, _, s)| t == "Import failed" && *s == Severity::Error)
        );
    }

    #[tokio::test]
    async fn test_persistence_failure_notifies_error() {
        let service = ImportService::new(
            FailingCollections,
            MemEnvironments::default(),
            RecordingNotifier::default(),
        );

        let err = service
            .import_text(&postman_text("Doomed"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Repository(_)));

        let notes = service.notifier.messages.lock().unwrap();
        assert!(
            notes
                .iter()
                .any(|(t, _, s)| t == "Import failed" && *s == Severity::Error)
        );
    }

    #[tokio::test]
    async fn test_warning_notification_reports_severity_counts() {
        let service = service();
        let text = r#"{"info":{"name":"Mixed","schema":"https://schema.getpostman.com/json/collection/v2.1.0/collection.json"},
            "item":[
                {"name":"Bad","request":{"method":"FETCH","url":"https://x"}},
                {"name":"Ping","request":{"method":"GET","url":"https://x/ping"}}
            ]}"#;

        let summary = service.import_text(text, None).await.unwrap();
        assert_eq!(summary.skipped, 1);

        let notes = service.notifier.messages.lock().unwrap();
        let (_, message, severity) = notes
            .iter()
            .find(|(t, _, _)| t == "Import finished with warnings")
            .unwrap();
        assert_eq!(*severity, Severity::Warning);
        assert_eq!(message, "1 item(s) skipped");
    }

    #[tokio::test]
    async fn test_preview_does_not_persist() {
        let service = service();
        let summary = service.preview(&postman_text("Dry Run"), None).unwrap();
        assert_eq!(summary.collections, vec!["Dry Run".to_string()]);
        assert!(service.collections.list().await.unwrap().is_empty());
        assert!(service.notifier.messages.lock().unwrap().is_empty());
    }
}
