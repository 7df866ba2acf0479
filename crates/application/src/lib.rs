//! Quiver Application - Ports, templating, and use cases
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for collaborators like storage and notification)
//! - The `{{variable}}` templating engine
//! - Use case orchestration around environments and requests

pub mod ports;
pub mod templating;
pub mod use_cases;

pub use ports::{
    CollectionRepository, EnvironmentError, EnvironmentRepository, FileSystem, FileSystemError,
    KeyValueStore, Notifier, RepositoryError, Severity, StoreError,
};
pub use templating::{Placeholder, Resolution, VariableResolver, parse_placeholders};
pub use use_cases::{
    ResolveRequest, ResolveRequestError, ResolvedRequest, SwitchEnvironment,
    SwitchEnvironmentError, SwitchEnvironmentOutput,
};
