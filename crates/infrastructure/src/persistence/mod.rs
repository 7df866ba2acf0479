//! Persistence adapters.
//!
//! Everything persists through the [`KeyValueStore`] port: the repositories
//! serialize whole sets under fixed keys, and the store decides whether
//! that lands in memory or in JSON files on disk.
//!
//! [`KeyValueStore`]: quiver_application::ports::KeyValueStore

pub mod collection_repository;
pub mod environment_repository;
pub mod file_system;
pub mod json_file_store;
pub mod memory_store;

pub use collection_repository::StoreCollectionRepository;
pub use environment_repository::StoreEnvironmentRepository;
pub use file_system::TokioFileSystem;
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
