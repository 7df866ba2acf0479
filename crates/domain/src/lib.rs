//! Quiver Domain - Canonical collection model
//!
//! This crate defines the canonical shape for API-request collections,
//! independent of any interchange format they were imported from.
//! All types here are pure Rust with no I/O dependencies.

pub mod collection;
pub mod environment;
pub mod error;
pub mod id;
pub mod request;

pub use collection::{Collection, CollectionBuilder, Folder};
pub use environment::Environment;
pub use error::{DomainError, DomainResult};
pub use id::{EntityKind, generate_id};
pub use request::{ApiKeyLocation, Auth, Body, HttpMethod, KeyValue, Request};
