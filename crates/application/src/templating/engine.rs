//! Variable resolution engine.
//!
//! Substitutes `{{key}}` placeholders with values from an environment's
//! key-value map. Resolution is single-pass and non-recursive: a substituted
//! value that itself contains `{{...}}` is left as-is, and a key absent from
//! the map keeps its literal `{{key}}` text.

use std::collections::BTreeMap;

use quiver_domain::{Auth, Body, Environment, Request};

use super::parser::parse_placeholders;

/// Outcome of resolving one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The input with every known placeholder substituted.
    pub resolved: String,
    /// Keys that were substituted.
    pub resolved_keys: Vec<String>,
    /// Keys that had no value and were left as literal `{{key}}` text.
    pub unresolved_keys: Vec<String>,
}

impl Resolution {
    /// Returns true when every placeholder in the input was substituted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved_keys.is_empty()
    }
}

/// Resolves `{{key}}` placeholders against one environment's variable map.
#[derive(Debug, Clone, Default)]
pub struct VariableResolver {
    values: BTreeMap<String, String>,
}

impl VariableResolver {
    /// Creates a resolver over an explicit key-value map.
    #[must_use]
    pub const fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Creates a resolver over an environment's variables.
    #[must_use]
    pub fn for_environment(environment: &Environment) -> Self {
        Self::new(environment.values.clone())
    }

    /// Creates a resolver that substitutes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a single variable value.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Resolves every placeholder in `input` in one pass.
    #[must_use]
    pub fn resolve(&self, input: &str) -> Resolution {
        let placeholders = parse_placeholders(input);
        if placeholders.is_empty() {
            return Resolution {
                resolved: input.to_string(),
                resolved_keys: Vec::new(),
                unresolved_keys: Vec::new(),
            };
        }

        let mut resolved = String::with_capacity(input.len());
        let mut resolved_keys = Vec::new();
        let mut unresolved_keys = Vec::new();
        let mut last_end = 0;

        for placeholder in &placeholders {
            resolved.push_str(&input[last_end..placeholder.span.start]);
            if let Some(value) = self.values.get(&placeholder.name) {
                resolved.push_str(value);
                resolved_keys.push(placeholder.name.clone());
            } else {
                resolved.push_str(&input[placeholder.span.clone()]);
                unresolved_keys.push(placeholder.name.clone());
            }
            last_end = placeholder.span.end;
        }
        resolved.push_str(&input[last_end..]);

        Resolution {
            resolved,
            resolved_keys,
            unresolved_keys,
        }
    }

    /// Shorthand for [`Self::resolve`] when only the text is wanted.
    #[must_use]
    pub fn resolve_text(&self, input: &str) -> String {
        self.resolve(input).resolved
    }

    /// Applies resolution to every templated field of a request.
    ///
    /// Touches the URL, header/param/cookie values (never keys), the auth
    /// credential fields, and the body text or form field values. Everything
    /// else is copied unchanged.
    #[must_use]
    pub fn resolve_request(&self, request: &Request) -> Request {
        let mut resolved = request.clone();
        resolved.url = self.resolve_text(&request.url);

        for header in &mut resolved.headers {
            header.value = self.resolve_text(&header.value);
        }
        for param in &mut resolved.params {
            param.value = self.resolve_text(&param.value);
        }
        for cookie in &mut resolved.cookies {
            cookie.value = self.resolve_text(&cookie.value);
        }

        resolved.auth = match &request.auth {
            Auth::None => Auth::None,
            Auth::Bearer { token } => Auth::bearer(self.resolve_text(token)),
            Auth::Basic { username, password } => {
                Auth::basic(self.resolve_text(username), self.resolve_text(password))
            }
            Auth::ApiKey {
                key,
                value,
                location,
            } => Auth::api_key(key.clone(), self.resolve_text(value), *location),
        };

        resolved.body = match &request.body {
            Body::None => Body::None,
            Body::Json { data } => Body::json(self.resolve_text(data)),
            Body::Raw { data } => Body::raw(self.resolve_text(data)),
            Body::Form { data } => Body::form(
                data.iter()
                    .map(|field| {
                        let mut field = field.clone();
                        field.value = self.resolve_text(&field.value);
                        field
                    })
                    .collect(),
            ),
        };

        resolved
    }
}
