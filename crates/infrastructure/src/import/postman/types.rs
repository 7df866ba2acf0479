//! Postman Collection v2 and Environment wire types.
//!
//! These structs mirror the JSON Postman emits, using `#[serde(default)]`
//! liberally because real exports vary between Postman versions. They never
//! leave this module's decoders.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

/// Root structure for a Postman Collection v2 document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanCollection {
    pub info: PostmanInfo,
    #[serde(default)]
    pub item: Vec<PostmanItem>,
    #[serde(default)]
    pub variable: Vec<PostmanVariable>,
    #[serde(default)]
    pub auth: Option<PostmanAuth>,
    #[serde(default)]
    pub event: Vec<PostmanEvent>,
}

/// Collection metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// An item is a folder when it carries child `item`s, a request when it
/// carries a `request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Vec<Self>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<PostmanRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<PostmanEvent>,
}

impl PostmanItem {
    /// Returns true if this item is a folder (has sub-items).
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        self.item.is_some()
    }
}

/// Postman request definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanRequest {
    pub method: String,
    #[serde(default)]
    pub url: PostmanUrl,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<PostmanHeader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PostmanBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<PostmanAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The three URL shapes Postman emits: a bare string, `{raw}`, or the full
/// structured object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PostmanUrl {
    #[default]
    Empty,
    Simple(String),
    Structured(PostmanUrlStructured),
}

impl PostmanUrl {
    /// The raw URL string, when one is present.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Simple(s) => Some(s),
            Self::Structured(s) => s.raw.as_deref(),
        }
    }

    /// Query parameters from the structured shape.
    #[must_use]
    pub fn query(&self) -> &[PostmanQueryParam] {
        match self {
            Self::Structured(s) => &s.query,
            _ => &[],
        }
    }
}

/// Structured URL object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostmanUrlStructured {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<PostmanQueryParam>,
}

/// Query parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanQueryParam {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Request header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanHeader {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanBody {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urlencoded: Vec<PostmanFormParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formdata: Vec<PostmanFormParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<PostmanBodyOptions>,
}

/// Form field, shared by `urlencoded` and `formdata` modes. `formdata`
/// additionally allows file-typed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanFormParam {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl PostmanFormParam {
    /// Returns true when the field carries a file instead of text.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.param_type.as_deref() == Some("file")
    }
}

/// Body options (raw language declaration).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanBodyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<PostmanRawOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanRawOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Authentication configuration with per-type parameter arrays.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostmanAuth {
    #[serde(rename = "type", default)]
    pub auth_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub basic: Vec<PostmanAuthParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bearer: Vec<PostmanAuthParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apikey: Vec<PostmanAuthParam>,
}

impl PostmanAuth {
    /// Looks up a parameter value by key within one parameter array.
    #[must_use]
    pub fn param(params: &[PostmanAuthParam], key: &str) -> Option<String> {
        params.iter().find(|p| p.key == key).and_then(|p| p.value.clone())
    }
}

/// Auth parameter (key-value pair).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanAuthParam {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
}

/// Collection-level variable definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanVariable {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Event (pre-request or test script); not representable, only counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEvent {
    pub listen: String,
}

/// Root structure for a Postman Environment document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEnvironment {
    pub name: String,
    #[serde(default)]
    pub values: Vec<PostmanEnvValue>,
}

/// Postman environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEnvValue {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_collection() {
        let json = r#"{
            "info": {
                "name": "Test Collection",
                "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
            },
            "item": []
        }"#;

        let collection: PostmanCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.info.name, "Test Collection");
        assert!(collection.item.is_empty());
    }

    #[test]
    fn test_url_shapes() {
        let simple: PostmanUrl = serde_json::from_str(r#""https://x/a""#).unwrap();
        assert_eq!(simple.raw(), Some("https://x/a"));

        let wrapped: PostmanUrl = serde_json::from_str(r#"{"raw":"https://x/b"}"#).unwrap();
        assert_eq!(wrapped.raw(), Some("https://x/b"));

        let structured: PostmanUrl = serde_json::from_str(
            r#"{"protocol":"https","host":["api","example","com"],"path":["users"],
                "query":[{"key":"page","value":"1"}]}"#,
        )
        .unwrap();
        assert_eq!(structured.raw(), None);
        assert_eq!(structured.query().len(), 1);
    }

    #[test]
    fn test_auth_param_lookup() {
        let auth: PostmanAuth = serde_json::from_str(
            r#"{"type":"bearer","bearer":[{"key":"token","value":"abc123"}]}"#,
        )
        .unwrap();
        assert_eq!(auth.auth_type, "bearer");
        assert_eq!(
            PostmanAuth::param(&auth.bearer, "token"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_environment_value_enabled_defaults_true() {
        let value: PostmanEnvValue = serde_json::from_str(r#"{"key":"k","value":"v"}"#).unwrap();
        assert!(value.enabled);
    }
}
