//! Structured warnings for degraded imports.
//!
//! A decoder that cannot fully convert an item records what happened and
//! where instead of failing the whole file. The warnings travel with the
//! bundle into the import summary, and their severity counts phrase the
//! end-of-import notification.

use serde::{Deserialize, Serialize};

/// How bad a degraded mapping is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Nothing was lost; the source carried something this model ignores.
    Info,
    /// The item imported, but part of it was dropped or approximated.
    Warning,
    /// The item could not be converted and was skipped.
    Error,
}

impl WarningSeverity {
    /// Lowercase label, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One degraded mapping, tied to the source item it happened at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportWarning {
    /// Where in the source the item sits, e.g. `"Orders / List Orders"`.
    pub path: String,
    /// What happened to the item.
    pub message: String,
    /// How bad it is.
    pub severity: WarningSeverity,
}

impl ImportWarning {
    fn tagged(severity: WarningSeverity, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity,
        }
    }

    /// Records an ignored source feature.
    pub fn info(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::tagged(WarningSeverity::Info, path, message)
    }

    /// Records a lossy conversion.
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::tagged(WarningSeverity::Warning, path, message)
    }

    /// Records a skipped item.
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::tagged(WarningSeverity::Error, path, message)
    }

    /// Whether the item behind this warning was skipped entirely.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, WarningSeverity::Error)
    }
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.message, self.severity)
    }
}

/// Severity counts over a batch of warnings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WarningStats {
    /// Ignored source features.
    pub info: usize,
    /// Lossy conversions.
    pub warnings: usize,
    /// Skipped items.
    pub errors: usize,
}

impl WarningStats {
    /// Tallies a batch of warnings by severity.
    #[must_use]
    pub fn from_warnings(warnings: &[ImportWarning]) -> Self {
        warnings.iter().fold(Self::default(), |mut stats, warning| {
            match warning.severity {
                WarningSeverity::Info => stats.info += 1,
                WarningSeverity::Warning => stats.warnings += 1,
                WarningSeverity::Error => stats.errors += 1,
            }
            stats
        })
    }

    /// Total warnings counted.
    #[must_use]
    pub const fn total(self) -> usize {
        self.info + self.warnings + self.errors
    }

    /// The highest severity present, `None` for an empty batch.
    #[must_use]
    pub const fn worst(self) -> Option<WarningSeverity> {
        if self.errors > 0 {
            Some(WarningSeverity::Error)
        } else if self.warnings > 0 {
            Some(WarningSeverity::Warning)
        } else if self.info > 0 {
            Some(WarningSeverity::Info)
        } else {
            None
        }
    }
}

impl std::fmt::Display for WarningStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!("{} item(s) skipped", self.errors));
        }
        if self.warnings > 0 {
            parts.push(format!("{} item(s) imported with losses", self.warnings));
        }
        if self.info > 0 {
            parts.push(format!("{} note(s)", self.info));
        }
        if parts.is_empty() {
            f.write_str("no warnings")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}
