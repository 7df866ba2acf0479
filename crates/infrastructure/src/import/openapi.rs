//! OpenAPI 3 / Swagger 2 decoder.
//!
//! Specs are request *descriptions*, not request *collections*, so the
//! conversion is lossy by design: every path/method pair becomes one
//! request templated on a `{{baseUrl}}` collection variable, and JSON
//! request bodies are synthesized from examples or schemas.

use serde_json::Value;

use quiver_domain::{Body, CollectionBuilder, HttpMethod, Request};

use super::{DecodeError, ImportBundle, ImportLimits};
use crate::import::warning::ImportWarning;

const METHODS: [(&str, HttpMethod); 7] = [
    ("get", HttpMethod::Get),
    ("post", HttpMethod::Post),
    ("put", HttpMethod::Put),
    ("patch", HttpMethod::Patch),
    ("delete", HttpMethod::Delete),
    ("head", HttpMethod::Head),
    ("options", HttpMethod::Options),
];

/// Decodes an OpenAPI 3 or Swagger 2 JSON spec into one collection.
///
/// # Errors
///
/// Returns [`DecodeError::MissingRequiredField`] when `paths` is absent,
/// [`DecodeError::MalformedInput`] when the JSON does not parse, and
/// [`DecodeError::TooManyItems`] when the operation count exceeds `limits`.
pub fn decode(text: &str, limits: &ImportLimits) -> Result<ImportBundle, DecodeError> {
    let json: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
    let Some(paths) = json.get("paths").and_then(Value::as_object) else {
        return Err(DecodeError::MissingRequiredField("paths".to_string()));
    };

    let count = paths
        .values()
        .filter_map(Value::as_object)
        .map(|ops| METHODS.iter().filter(|(name, _)| ops.contains_key(*name)).count())
        .sum();
    if count > limits.max_items {
        return Err(DecodeError::TooManyItems {
            count,
            max: limits.max_items,
        });
    }

    let title = json
        .pointer("/info/title")
        .and_then(Value::as_str)
        .unwrap_or("Imported API");
    let mut builder = CollectionBuilder::new(title);
    if let Some(description) = json.pointer("/info/description").and_then(Value::as_str) {
        builder = builder.with_description(description);
    }
    builder.set_variable("baseUrl", base_url(&json));

    let mut bundle = ImportBundle::default();
    for (path, operations) in paths {
        let Some(operations) = operations.as_object() else {
            continue;
        };
        for (method_name, method) in METHODS {
            let Some(operation) = operations.get(method_name) else {
                continue;
            };
            let request = convert_operation(path, method, operation, &mut bundle);
            builder
                .add_request(request, None)
                .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
        }
    }

    bundle.collections.push(builder.build());
    Ok(bundle)
}

/// `servers[0].url` for OpenAPI 3, reassembled `schemes/host/basePath` for
/// Swagger 2, empty when neither is declared.
fn base_url(json: &Value) -> String {
    if let Some(url) = json.pointer("/servers/0/url").and_then(Value::as_str) {
        return url.trim_end_matches('/').to_string();
    }
    if let Some(host) = json.get("host").and_then(Value::as_str) {
        let scheme = json
            .pointer("/schemes/0")
            .and_then(Value::as_str)
            .unwrap_or("https");
        let base_path = json
            .get("basePath")
            .and_then(Value::as_str)
            .unwrap_or("");
        return format!("{scheme}://{host}{}", base_path.trim_end_matches('/'));
    }
    String::new()
}

fn convert_operation(
    path: &str,
    method: HttpMethod,
    operation: &Value,
    bundle: &mut ImportBundle,
) -> Request {
    let fallback = format!("{method} {path}");
    let name = operation
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| operation.get("operationId").and_then(Value::as_str))
        .unwrap_or(&fallback);

    let mut request = Request::new(name, method, format!("{{{{baseUrl}}}}{path}"));
    if let Some(description) = operation
        .get("description")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        request = request.with_description(description);
    }

    if let Some(parameters) = operation.get("parameters").and_then(Value::as_array) {
        for parameter in parameters {
            let Some(name) = parameter.get("name").and_then(Value::as_str) else {
                continue;
            };
            match parameter.get("in").and_then(Value::as_str) {
                Some("query") => request = request.with_param(name, parameter_value(parameter)),
                Some("header") => request = request.with_header(name, parameter_value(parameter)),
                _ => {}
            }
        }
    }

    if let Some(body) = convert_body(path, operation, bundle) {
        request = request.with_body(body);
    }
    request
}

/// Example or default value of a parameter, stringified.
fn parameter_value(parameter: &Value) -> String {
    parameter
        .get("example")
        .or_else(|| parameter.get("default"))
        .or_else(|| parameter.pointer("/schema/example"))
        .or_else(|| parameter.pointer("/schema/default"))
        .map(stringify)
        .unwrap_or_default()
}

fn convert_body(path: &str, operation: &Value, bundle: &mut ImportBundle) -> Option<Body> {
    // OpenAPI 3 requestBody with media types. The first declared media
    // type decides the body; declaration order is kept by serde_json's
    // `preserve_order` feature.
    if let Some(content) = operation.pointer("/requestBody/content").and_then(Value::as_object) {
        let (media_type, media) = content.iter().next()?;
        if !media_type.contains("json") {
            bundle.warnings.push(ImportWarning::warning(
                path,
                format!("request body media type '{media_type}' is not converted"),
            ));
            return None;
        }
        let example = media
            .get("example")
            .cloned()
            .or_else(|| media.get("schema").map(synthesize));
        return example.map(|value| Body::json(pretty(&value)));
    }

    // Swagger 2 body parameter with a schema.
    let parameters = operation.get("parameters").and_then(Value::as_array)?;
    let body_param = parameters
        .iter()
        .find(|p| p.get("in").and_then(Value::as_str) == Some("body"))?;
    let schema = body_param.get("schema")?;
    Some(Body::json(pretty(&synthesize(schema))))
}

/// Builds a placeholder JSON value from a schema: explicit examples win,
/// otherwise each type gets a fixed stand-in.
fn synthesize(schema: &Value) -> Value {
    if let Some(example) = schema.get("example") {
        return example.clone();
    }
    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        let fields = properties
            .iter()
            .map(|(key, property)| (key.clone(), synthesize(property)))
            .collect();
        return Value::Object(fields);
    }
    match schema.get("type").and_then(Value::as_str) {
        Some("string") => Value::String("string".to_string()),
        Some("integer" | "number") => Value::from(0),
        Some("boolean") => Value::Bool(true),
        Some("array") => Value::Array(Vec::new()),
        _ => Value::Object(serde_json::Map::new()),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
