//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait implemented by an adapter in the
//! infrastructure layer, or by a test double.

mod collection_repository;
mod environment_repository;
mod file_system;
mod key_value_store;
mod notifier;

pub use collection_repository::{CollectionRepository, RepositoryError};
pub use environment_repository::{EnvironmentError, EnvironmentRepository};
pub use file_system::{FileSystem, FileSystemError};
pub use key_value_store::{KeyValueStore, StoreError};
pub use notifier::{Notifier, Severity};
