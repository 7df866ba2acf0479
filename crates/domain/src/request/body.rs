//! Request body types

use serde::{Deserialize, Serialize};

use super::KeyValue;

/// Request body payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Body {
    /// No body.
    #[default]
    None,
    /// A JSON payload, kept as its source text.
    Json {
        /// JSON text.
        data: String,
    },
    /// Form fields (urlencoded or multipart in source formats).
    Form {
        /// Form fields.
        data: Vec<KeyValue>,
    },
    /// Any other textual payload.
    Raw {
        /// Body text.
        data: String,
    },
}

impl Body {
    /// Creates a JSON body from source text.
    #[must_use]
    pub fn json(data: impl Into<String>) -> Self {
        Self::Json { data: data.into() }
    }

    /// Creates a form body.
    #[must_use]
    pub const fn form(data: Vec<KeyValue>) -> Self {
        Self::Form { data }
    }

    /// Creates a raw text body.
    #[must_use]
    pub fn raw(data: impl Into<String>) -> Self {
        Self::Raw { data: data.into() }
    }

    /// Classifies free text: `Json` when it parses as JSON, `Raw` otherwise.
    ///
    /// This is the shared rule importers apply to raw payloads whose source
    /// format does not declare a content type.
    #[must_use]
    pub fn from_text(data: impl Into<String>) -> Self {
        let data = data.into();
        if serde_json::from_str::<serde_json::Value>(&data).is_ok() {
            Self::Json { data }
        } else {
            Self::Raw { data }
        }
    }

    /// Returns true when there is no body.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_text_detects_json() {
        assert_eq!(Body::from_text(r#"{"a":1}"#), Body::json(r#"{"a":1}"#));
        assert_eq!(Body::from_text("[1,2,3]"), Body::json("[1,2,3]"));
    }

    #[test]
    fn test_from_text_falls_back_to_raw() {
        assert_eq!(Body::from_text("plain text"), Body::raw("plain text"));
        assert_eq!(Body::from_text(""), Body::raw(""));
    }

    #[test]
    fn test_default_is_none() {
        assert!(Body::default().is_none());
        assert!(!Body::json("{}").is_none());
    }
}
