//! Canonical request types.

pub mod auth;
pub mod body;
pub mod method;

pub use auth::{ApiKeyLocation, Auth};
pub use body::Body;
pub use method::HttpMethod;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::id::{EntityKind, generate_id};

/// A key-value entry used for headers, query params, cookies, and form
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Entry key.
    pub key: String,
    /// Entry value.
    pub value: String,
}

impl KeyValue {
    /// Creates a new entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns true when the key is non-empty.
    ///
    /// Entries with an empty key are never persisted; collection assembly
    /// drops them.
    #[must_use]
    pub const fn has_key(&self) -> bool {
        !self.key.is_empty()
    }
}

/// A single HTTP request in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Unique identifier (`req_` prefixed).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// HTTP method.
    pub method: HttpMethod,
    /// Target URL; may contain `{{variable}}` placeholders.
    pub url: String,
    /// HTTP headers.
    #[serde(default)]
    pub headers: Vec<KeyValue>,
    /// Query parameters.
    #[serde(default)]
    pub params: Vec<KeyValue>,
    /// Cookies.
    #[serde(default)]
    pub cookies: Vec<KeyValue>,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: Auth,
    /// Request body.
    #[serde(default)]
    pub body: Body,
    /// Owning folder, or `None` for a collection-root request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Request {
    /// Creates a request with a fresh `req_` ID and creation timestamp.
    #[must_use]
    pub fn new(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: generate_id(EntityKind::Request),
            name: name.into(),
            description: None,
            method,
            url: url.into(),
            headers: Vec::new(),
            params: Vec::new(),
            cookies: Vec::new(),
            auth: Auth::None,
            body: Body::None,
            folder_id: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the description, builder style.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a header, builder style.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(KeyValue::new(key, value));
        self
    }

    /// Appends a query parameter, builder style.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(KeyValue::new(key, value));
        self
    }

    /// Sets the authentication, builder style.
    #[must_use]
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the body, builder style.
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Parses the URL field.
    ///
    /// Meaningful only after variable resolution; a URL still carrying
    /// `{{...}}` placeholders will not parse.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn parse_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }

    /// Drops every key-value entry with an empty key.
    pub fn strip_empty_keys(&mut self) {
        self.headers.retain(KeyValue::has_key);
        self.params.retain(KeyValue::has_key);
        self.cookies.retain(KeyValue::has_key);
        if let Body::Form { data } = &mut self.body {
            data.retain(KeyValue::has_key);
        }
    }
}
