//! Quiver Infrastructure - Adapters and implementations
//!
//! This crate provides the format detector, the per-format decoders and
//! encoders, the import orchestrator, and concrete implementations of the
//! ports defined in the application layer.

pub mod adapters;
pub mod export;
pub mod import;
pub mod persistence;
pub mod serialization;

pub use adapters::TracingNotifier;
pub use export::{ExportError, ExportFormat, ExportResult, ExportService};
pub use import::{
    DecodeError, DecoderRegistry, FormatTag, ImportBundle, ImportError, ImportLimits,
    ImportService, ImportSummary, ImportWarning, WarningSeverity, WarningStats, detect_format,
};
pub use persistence::{
    JsonFileStore, MemoryStore, StoreCollectionRepository, StoreEnvironmentRepository,
    TokioFileSystem,
};
pub use serialization::{SerializationError, from_json, to_json_stable, to_json_stable_bytes};
