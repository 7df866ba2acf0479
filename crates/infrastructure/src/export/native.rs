//! The native archival envelope.
//!
//! A lossless round-trip format: `{quiver_export: true, version,
//! collections: [...], environments: {name: {key: value}}, exported_at}`.
//! The importer also accepts the partial forms
//! `{quiver_collection: true, collection: {...}}` and
//! `{quiver_environments: true, environments: {...}}` for hand-assembled
//! files.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiver_domain::{Collection, Environment};

use crate::serialization::{SerializationError, to_json_stable};

/// Current envelope version; bumped when the layout changes.
pub const ENVELOPE_VERSION: &str = "1";

/// Environments as they appear in the envelope: name to variable map.
pub type EnvironmentMap = BTreeMap<String, BTreeMap<String, String>>;

/// The full export envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeEnvelope {
    /// Format marker, always `true`.
    pub quiver_export: bool,
    /// Envelope layout version.
    pub version: String,
    /// Exported collections.
    #[serde(default)]
    pub collections: Vec<Collection>,
    /// Exported environments, keyed by name.
    #[serde(default)]
    pub environments: EnvironmentMap,
    /// Export timestamp.
    pub exported_at: DateTime<Utc>,
}

impl NativeEnvelope {
    /// Wraps collections and environments in a fresh envelope.
    #[must_use]
    pub fn new(collections: Vec<Collection>, environments: Vec<Environment>) -> Self {
        Self {
            quiver_export: true,
            version: ENVELOPE_VERSION.to_string(),
            collections,
            environments: environments
                .into_iter()
                .map(|e| (e.name, e.values))
                .collect(),
            exported_at: Utc::now(),
        }
    }

    /// The environments as domain values.
    #[must_use]
    pub fn environments(&self) -> Vec<Environment> {
        self.environments
            .iter()
            .map(|(name, values)| Environment {
                name: name.clone(),
                values: values.clone(),
            })
            .collect()
    }

    /// Encodes the envelope as deterministic JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, SerializationError> {
        to_json_stable(self)
    }
}
