//! Named variable environments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named set of template variables.
///
/// Exactly one environment is "active" at a time; the active name is held
/// by the environment repository, not on the environment itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name, unique among environments.
    pub name: String,
    /// Variable key-value pairs, ordered for stable serialization.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl Environment {
    /// Creates an empty environment with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Adds a variable, builder style.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Sets a variable, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Looks up a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns true if the environment defines no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
