//! Postman Collection v2 and Environment decoders.

pub mod types;

use quiver_domain::{
    ApiKeyLocation, Auth, Body, CollectionBuilder, Environment, Folder, HttpMethod, KeyValue,
    Request,
};

use super::{DecodeError, ImportBundle, ImportLimits};
use crate::import::warning::ImportWarning;
use types::{
    PostmanAuth, PostmanBody, PostmanCollection, PostmanEnvironment, PostmanItem, PostmanRequest,
    PostmanUrl,
};

/// Decodes a Postman Collection v2 document into one canonical collection.
///
/// Items that cannot be converted (unknown verb, unrepresentable feature)
/// are skipped with a warning; structural problems abort the whole decode.
///
/// # Errors
///
/// Returns [`DecodeError::MissingRequiredField`] when `info` or `item` is
/// absent, [`DecodeError::MalformedInput`] when the JSON does not parse,
/// and the limit variants when the document exceeds `limits`.
pub fn decode_collection(
    text: &str,
    limits: &ImportLimits,
) -> Result<ImportBundle, DecodeError> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
    if json.get("info").is_none() {
        return Err(DecodeError::MissingRequiredField("info".to_string()));
    }
    if json.get("item").is_none() {
        return Err(DecodeError::MissingRequiredField("item".to_string()));
    }

    let collection: PostmanCollection =
        serde_json::from_value(json).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;

    let count = count_items(&collection.item);
    if count > limits.max_items {
        return Err(DecodeError::TooManyItems {
            count,
            max: limits.max_items,
        });
    }

    let mut bundle = ImportBundle::default();
    let mut builder = CollectionBuilder::new(&collection.info.name);
    if let Some(description) = &collection.info.description {
        builder = builder.with_description(description);
    }

    for variable in &collection.variable {
        if !variable.disabled {
            builder.set_variable(&variable.key, variable.value.clone().unwrap_or_default());
        }
    }

    if collection.auth.is_some() {
        bundle.warnings.push(ImportWarning::warning(
            &collection.info.name,
            "collection-level auth is not applied to individual requests",
        ));
    }
    if !collection.event.is_empty() {
        bundle.warnings.push(ImportWarning::info(
            &collection.info.name,
            "collection-level scripts were skipped",
        ));
    }

    walk_items(
        &collection.item,
        None,
        "",
        1,
        limits,
        &mut builder,
        &mut bundle,
    )?;

    bundle.collections.push(builder.build());
    Ok(bundle)
}

/// Decodes a Postman Environment document into one canonical environment.
///
/// Disabled values and values with empty keys are skipped.
///
/// # Errors
///
/// Returns [`DecodeError::MissingRequiredField`] when `name` or `values` is
/// absent and [`DecodeError::MalformedInput`] when the JSON does not parse.
pub fn decode_environment(text: &str) -> Result<ImportBundle, DecodeError> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
    if json.get("name").is_none() {
        return Err(DecodeError::MissingRequiredField("name".to_string()));
    }
    if json.get("values").is_none() {
        return Err(DecodeError::MissingRequiredField("values".to_string()));
    }

    let source: PostmanEnvironment =
        serde_json::from_value(json).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;

    let mut bundle = ImportBundle::default();
    let mut environment = Environment::new(&source.name);
    let mut skipped = 0usize;
    for value in &source.values {
        if value.enabled && !value.key.is_empty() {
            environment.set(&value.key, &value.value);
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        bundle.warnings.push(ImportWarning::info(
            &source.name,
            format!("{skipped} disabled or empty-keyed value(s) were skipped"),
        ));
    }

    bundle.environments.push(environment);
    Ok(bundle)
}

fn count_items(items: &[PostmanItem]) -> usize {
    items
        .iter()
        .map(|item| 1 + item.item.as_deref().map_or(0, count_items))
        .sum()
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}/{name}")
    }
}

#[allow(clippy::too_many_arguments)]
fn walk_items(
    items: &[PostmanItem],
    parent: Option<&str>,
    path: &str,
    depth: usize,
    limits: &ImportLimits,
    builder: &mut CollectionBuilder,
    bundle: &mut ImportBundle,
) -> Result<(), DecodeError> {
    if depth > limits.max_depth {
        return Err(DecodeError::TooDeep {
            max: limits.max_depth,
        });
    }

    for item in items {
        let item_path = join_path(path, &item.name);
        if !item.event.is_empty() {
            bundle
                .warnings
                .push(ImportWarning::info(&item_path, "scripts were skipped"));
        }

        if let Some(children) = &item.item {
            let mut folder = Folder::new(&item.name);
            if let Some(description) = &item.description {
                folder = folder.with_description(description);
            }
            // Parent IDs always come from this builder, so linking them
            // back in cannot fail.
            let folder_id = builder
                .add_folder(folder, parent)
                .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
            walk_items(
                children,
                Some(&folder_id),
                &item_path,
                depth + 1,
                limits,
                builder,
                bundle,
            )?;
        } else if let Some(request) = &item.request {
            if let Some(converted) = convert_request(&item.name, &item_path, request, bundle) {
                builder
                    .add_request(converted, parent)
                    .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
            }
        } else {
            bundle.skip(ImportWarning::error(
                &item_path,
                "item is neither a folder nor a request",
            ));
        }
    }
    Ok(())
}

fn convert_request(
    name: &str,
    path: &str,
    source: &PostmanRequest,
    bundle: &mut ImportBundle,
) -> Option<Request> {
    let Ok(method) = source.method.parse::<HttpMethod>() else {
        bundle.skip(ImportWarning::error(
            path,
            format!("unsupported HTTP method '{}'", source.method),
        ));
        return None;
    };

    let (url, params) = convert_url(&source.url, path, bundle);
    let mut request = Request::new(name, method, url);
    request.params = params;
    if let Some(description) = &source.description {
        request = request.with_description(description);
    }

    let mut disabled_headers = 0usize;
    for header in &source.header {
        if header.disabled {
            disabled_headers += 1;
        } else {
            request = request.with_header(&header.key, &header.value);
        }
    }
    if disabled_headers > 0 {
        bundle.warnings.push(ImportWarning::info(
            path,
            format!("{disabled_headers} disabled header(s) were skipped"),
        ));
    }

    if let Some(auth) = &source.auth {
        request = request.with_auth(convert_auth(auth, path, bundle));
    }
    if let Some(body) = &source.body {
        request = request.with_body(convert_body(body, path, bundle));
    }
    Some(request)
}

/// Canonicalizes the URL and extracts enabled query parameters.
///
/// When the source lacks a `raw` string, the URL is reconstructed from the
/// structured parts, appending enabled query parameters.
fn convert_url(
    url: &PostmanUrl,
    path: &str,
    bundle: &mut ImportBundle,
) -> (String, Vec<KeyValue>) {
    let params: Vec<KeyValue> = url
        .query()
        .iter()
        .filter(|q| !q.disabled)
        .map(|q| KeyValue::new(&q.key, q.value.clone().unwrap_or_default()))
        .collect();
    let disabled = url.query().iter().filter(|q| q.disabled).count();
    if disabled > 0 {
        bundle.warnings.push(ImportWarning::info(
            path,
            format!("{disabled} disabled query parameter(s) were skipped"),
        ));
    }

    if let Some(raw) = url.raw() {
        return (raw.to_string(), params);
    }

    let PostmanUrl::Structured(parts) = url else {
        return (String::new(), params);
    };

    let mut rebuilt = String::new();
    if let Some(protocol) = &parts.protocol {
        rebuilt.push_str(protocol);
        rebuilt.push_str("://");
    }
    rebuilt.push_str(&parts.host.join("."));
    for segment in &parts.path {
        rebuilt.push('/');
        rebuilt.push_str(segment);
    }
    if !params.is_empty() {
        let query: Vec<String> = params
            .iter()
            .map(|p| format!("{}={}", p.key, p.value))
            .collect();
        rebuilt.push('?');
        rebuilt.push_str(&query.join("&"));
    }
    (rebuilt, params)
}

fn convert_auth(auth: &PostmanAuth, path: &str, bundle: &mut ImportBundle) -> Auth {
    match auth.auth_type.as_str() {
        "bearer" => Auth::bearer(PostmanAuth::param(&auth.bearer, "token").unwrap_or_default()),
        "basic" => Auth::basic(
            PostmanAuth::param(&auth.basic, "username").unwrap_or_default(),
            PostmanAuth::param(&auth.basic, "password").unwrap_or_default(),
        ),
        "apikey" => {
            let location = if PostmanAuth::param(&auth.apikey, "in").as_deref() == Some("query") {
                ApiKeyLocation::Query
            } else {
                ApiKeyLocation::Header
            };
            Auth::api_key(
                PostmanAuth::param(&auth.apikey, "key").unwrap_or_default(),
                PostmanAuth::param(&auth.apikey, "value").unwrap_or_default(),
                location,
            )
        }
        "" | "noauth" => Auth::None,
        other => {
            bundle.warnings.push(ImportWarning::warning(
                path,
                format!("unsupported auth type '{other}' degraded to none"),
            ));
            Auth::None
        }
    }
}

fn convert_body(body: &PostmanBody, path: &str, bundle: &mut ImportBundle) -> Body {
    match body.mode.as_str() {
        "raw" => {
            let raw = body.raw.clone().unwrap_or_default();
            if raw.is_empty() {
                return Body::None;
            }
            let language = body
                .options
                .as_ref()
                .and_then(|o| o.raw.as_ref())
                .and_then(|r| r.language.as_deref());
            if language == Some("json") {
                Body::json(raw)
            } else {
                Body::from_text(raw)
            }
        }
        "urlencoded" => convert_form(&body.urlencoded, path, bundle),
        "formdata" => convert_form(&body.formdata, path, bundle),
        "file" => {
            bundle.warnings.push(ImportWarning::warning(
                path,
                "file bodies are not supported and were dropped",
            ));
            Body::None
        }
        "graphql" => {
            bundle.warnings.push(ImportWarning::warning(
                path,
                "GraphQL bodies are not supported and were dropped",
            ));
            Body::None
        }
        other => {
            bundle.warnings.push(ImportWarning::warning(
                path,
                format!("unsupported body mode '{other}' dropped"),
            ));
            Body::None
        }
    }
}

fn convert_form(
    fields: &[types::PostmanFormParam],
    path: &str,
    bundle: &mut ImportBundle,
) -> Body {
    let mut data = Vec::new();
    for field in fields {
        if field.disabled {
            continue;
        }
        if field.is_file() {
            bundle.warnings.push(ImportWarning::warning(
                path,
                format!("file form field '{}' was dropped", field.key),
            ));
            continue;
        }
        data.push(KeyValue::new(
            &field.key,
            field.value.clone().unwrap_or_default(),
        ));
    }
    Body::form(data)
}
