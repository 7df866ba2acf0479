//! Outbound adapters for application ports.

pub mod tracing_notifier;

pub use tracing_notifier::TracingNotifier;
