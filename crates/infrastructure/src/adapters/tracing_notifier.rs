//! Notifier adapter that routes notifications to `tracing`.

use tracing::{error, info, warn};

use quiver_application::ports::{Notifier, Severity};

/// Emits notifications as tracing events. No subscriber is installed here;
/// the embedding binary decides where events go.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates the notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info => info!(title, "{message}"),
            Severity::Warning => warn!(title, "{message}"),
            Severity::Error => error!(title, "{message}"),
        }
    }
}
