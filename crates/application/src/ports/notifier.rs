//! Notification sink port

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational, e.g. a completed import.
    Info,
    /// Something was skipped or degraded.
    Warning,
    /// An operation failed.
    Error,
}

/// Sink for user-facing notifications.
///
/// The application layer never decides how a message is shown; adapters
/// route it to a toast, a log, or nowhere.
pub trait Notifier: Send + Sync {
    /// Emits one notification.
    fn notify(&self, title: &str, message: &str, severity: Severity);
}
