//! File system abstraction port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Error type for file system operations.
#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    /// File not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read access to files, the one suspending step of an import.
///
/// This trait allows mocking file access in tests.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Reads a whole file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    async fn read_to_string(&self, path: &Path) -> Result<String, FileSystemError>;
}
