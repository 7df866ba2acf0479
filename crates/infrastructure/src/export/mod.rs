//! Export infrastructure.
//!
//! Encoders are pure functions from domain values to deterministic JSON
//! text; [`ExportService`] picks one by [`ExportFormat`] and wraps the
//! result with enough metadata to write a file.

pub mod native;
pub mod postman;

pub use native::NativeEnvelope;

use quiver_domain::{Collection, Environment};
use thiserror::Error;

use crate::serialization::SerializationError;

/// Errors raised while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing was given to export.
    #[error("nothing to export")]
    NothingToExport,

    /// Postman collection documents hold exactly one collection each.
    #[error("postman export takes one collection at a time, got {0}")]
    PostmanSingleCollection(usize),

    /// The selected encoder failed to serialize.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Postman Collection v2.1 (or Postman Environment) JSON.
    Postman,
    /// The native archival envelope.
    Native,
}

impl ExportFormat {
    /// Conventional file extension for the format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Postman => "postman_collection.json",
            Self::Native => "quiver.json",
        }
    }

    /// MIME type of the encoded document.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        "application/json"
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postman => write!(f, "postman"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// An encoded export: the document text plus what went into it.
#[derive(Debug)]
pub struct ExportResult {
    /// Format that was encoded.
    pub format: ExportFormat,
    /// The encoded JSON document.
    pub content: String,
    /// Names of the exported collections.
    pub collections: Vec<String>,
}

/// Encodes collections and environments into export documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportService;

impl ExportService {
    /// Creates the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Exports collections (and, for the native format, environments).
    ///
    /// The native envelope carries any number of collections and
    /// environments in one document. Postman documents carry exactly one
    /// collection; export collections one at a time for that format.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NothingToExport`] when both inputs are empty,
    /// [`ExportError::PostmanSingleCollection`] when the Postman format is
    /// given more than one collection, and a serialization error when
    /// encoding fails.
    pub fn export(
        &self,
        collections: &[Collection],
        environments: &[Environment],
        format: ExportFormat,
    ) -> Result<ExportResult, ExportError> {
        if collections.is_empty() && environments.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let content = match format {
            ExportFormat::Native => {
                NativeEnvelope::new(collections.to_vec(), environments.to_vec()).encode()?
            }
            ExportFormat::Postman => match collections {
                [collection] => postman::encode_collection(collection)?,
                [] => {
                    // Environments only: a Postman environment document.
                    match environments {
                        [environment] => postman::encode_environment(environment)?,
                        other => {
                            return Err(ExportError::PostmanSingleCollection(other.len()));
                        }
                    }
                }
                many => return Err(ExportError::PostmanSingleCollection(many.len())),
            },
        };

        Ok(ExportResult {
            format,
            content,
            collections: collections.iter().map(|c| c.name.clone()).collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quiver_domain::{CollectionBuilder, HttpMethod, Request};

    fn sample_collection() -> Collection {
        let mut builder = CollectionBuilder::new("Sample");
        builder
            .add_request(Request::new("Ping", HttpMethod::Get, "https://x/ping"), None)
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_empty_export_is_rejected() {
        let err = ExportService::new()
            .export(&[], &[], ExportFormat::Native)
            .unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
    }

    #[test]
    fn test_postman_rejects_multiple_collections() {
        let collections = vec![sample_collection(), sample_collection()];
        let err = ExportService::new()
            .export(&collections, &[], ExportFormat::Postman)
            .unwrap_err();
        assert!(matches!(err, ExportError::PostmanSingleCollection(2)));
    }

    #[test]
    fn test_export_result_carries_names() {
        let result = ExportService::new()
            .export(&[sample_collection()], &[], ExportFormat::Postman)
            .unwrap();
        assert_eq!(result.collections, vec!["Sample".to_string()]);
        assert_eq!(result.format, ExportFormat::Postman);
        assert!(result.content.ends_with('\n'));
    }

    #[test]
    fn test_native_export_accepts_many() {
        let collections = vec![sample_collection(), sample_collection()];
        let environments = vec![Environment::new("Dev")];
        let result = ExportService::new()
            .export(&collections, &environments, ExportFormat::Native)
            .unwrap();
        assert!(result.content.contains("quiver_export"));
        assert_eq!(result.collections.len(), 2);
    }
}
