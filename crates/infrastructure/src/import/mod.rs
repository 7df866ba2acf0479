//! Import infrastructure.
//!
//! One decoder per input format, all funnelled through the same signature:
//! text in, an [`ImportBundle`] of canonical fragments out. The
//! [`ImportService`] orchestrates detect → decode → persist.

pub mod curl;
pub mod detect;
pub mod har;
pub mod insomnia;
pub mod native;
pub mod openapi;
pub mod postman;
pub mod registry;
pub mod service;
pub mod warning;

pub use detect::{FormatTag, detect_format};
pub use registry::DecoderRegistry;
pub use service::{ImportError, ImportService, ImportSummary};
pub use warning::{ImportWarning, WarningSeverity, WarningStats};

use quiver_domain::{Collection, Environment};
use thiserror::Error;

/// Errors that abort a whole decode.
///
/// Item-level conversion failures are never surfaced here; they become
/// warnings and skip counts on the [`ImportBundle`] instead.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is not parseable in its detected format.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A field the format requires is absent.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    /// The document holds more items than the import limits allow.
    #[error("too many items: {count} exceeds maximum of {max}")]
    TooManyItems {
        /// Counted items (requests plus folders).
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Folder nesting exceeds the import limits.
    #[error("nesting too deep: exceeds maximum depth of {max}")]
    TooDeep {
        /// Configured maximum depth.
        max: usize,
    },
}

/// Resource bounds applied to every import.
#[derive(Debug, Clone, Copy)]
pub struct ImportLimits {
    /// Maximum input size in bytes.
    pub max_input_bytes: usize,
    /// Maximum folder nesting depth.
    pub max_depth: usize,
    /// Maximum number of items (requests plus folders).
    pub max_items: usize,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: 10 * 1024 * 1024,
            max_depth: 10,
            max_items: 1000,
        }
    }
}

/// A decoder's output: canonical fragments plus what was skipped.
#[derive(Debug, Default)]
pub struct ImportBundle {
    /// Decoded collections.
    pub collections: Vec<Collection>,
    /// Decoded environments.
    pub environments: Vec<Environment>,
    /// Item-level warnings gathered during the decode.
    pub warnings: Vec<ImportWarning>,
    /// Number of items skipped because they could not be converted.
    pub skipped: usize,
}

impl ImportBundle {
    /// A bundle holding one collection.
    #[must_use]
    pub fn from_collection(collection: Collection) -> Self {
        Self {
            collections: vec![collection],
            ..Self::default()
        }
    }

    /// A bundle holding one environment.
    #[must_use]
    pub fn from_environment(environment: Environment) -> Self {
        Self {
            environments: vec![environment],
            ..Self::default()
        }
    }

    /// Total requests across all decoded collections.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.collections.iter().map(Collection::request_count).sum()
    }

    /// Total folders across all decoded collections.
    #[must_use]
    pub fn folder_count(&self) -> usize {
        self.collections.iter().map(Collection::folder_count).sum()
    }

    /// Records one skipped item with its warning.
    pub fn skip(&mut self, warning: ImportWarning) {
        self.skipped += 1;
        self.warnings.push(warning);
    }
}
