//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or model assembly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A folder reference points at no folder in the collection.
    ///
    /// Raised at construction time when a request's `folder_id` or a
    /// folder's `parent_id` does not name an already-added folder.
    #[error("unknown folder id: {0}")]
    UnknownFolder(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
