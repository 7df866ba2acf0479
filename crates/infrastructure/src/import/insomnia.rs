//! Insomnia export decoder.
//!
//! Insomnia exports are a flat `resources` array linked by `parentId`. Each
//! workspace becomes a collection, request groups become folders, and
//! environment resources become environments with their scalar values
//! coerced to strings.

use std::collections::HashMap;

use serde::Deserialize;

use quiver_domain::{
    ApiKeyLocation, Auth, Body, CollectionBuilder, Environment, Folder, HttpMethod, KeyValue,
    Request,
};

use super::{DecodeError, ImportBundle, ImportLimits};
use crate::import::warning::ImportWarning;

#[derive(Debug, Deserialize)]
struct InsomniaExport {
    resources: Vec<InsomniaResource>,
}

#[derive(Debug, Deserialize)]
struct InsomniaResource {
    #[serde(rename = "_type")]
    resource_type: String,
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(rename = "parentId", default)]
    parent_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    headers: Vec<InsomniaPair>,
    #[serde(default)]
    parameters: Vec<InsomniaPair>,
    #[serde(default)]
    body: Option<InsomniaBody>,
    #[serde(default)]
    authentication: Option<InsomniaAuth>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl InsomniaResource {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed")
    }
}

#[derive(Debug, Deserialize)]
struct InsomniaPair {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    disabled: bool,
}

#[derive(Debug, Deserialize)]
struct InsomniaBody {
    #[serde(rename = "mimeType", default)]
    mime_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    params: Vec<InsomniaPair>,
}

#[derive(Debug, Deserialize)]
struct InsomniaAuth {
    #[serde(rename = "type", default)]
    auth_type: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(rename = "addTo", default)]
    add_to: Option<String>,
    #[serde(default)]
    disabled: bool,
}

/// Decodes an Insomnia export into collections and environments.
///
/// Workspaces that end up with neither folders nor requests are dropped.
///
/// # Errors
///
/// Returns [`DecodeError::MissingRequiredField`] when `resources` is absent,
/// [`DecodeError::MalformedInput`] when the JSON does not parse, and the
/// limit variants when the export exceeds `limits`.
pub fn decode(text: &str, limits: &ImportLimits) -> Result<ImportBundle, DecodeError> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
    if json.get("resources").is_none() {
        return Err(DecodeError::MissingRequiredField("resources".to_string()));
    }

    let export: InsomniaExport =
        serde_json::from_value(json).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;

    let count = export
        .resources
        .iter()
        .filter(|r| matches!(r.resource_type.as_str(), "request" | "request_group"))
        .count();
    if count > limits.max_items {
        return Err(DecodeError::TooManyItems {
            count,
            max: limits.max_items,
        });
    }

    let mut bundle = ImportBundle::default();

    let workspaces: Vec<&InsomniaResource> = export
        .resources
        .iter()
        .filter(|r| r.resource_type == "workspace")
        .collect();
    let groups: HashMap<&str, &InsomniaResource> = export
        .resources
        .iter()
        .filter(|r| r.resource_type == "request_group")
        .map(|r| (r.id.as_str(), r))
        .collect();
    let workspace_ids: HashMap<&str, &str> = workspaces
        .iter()
        .map(|w| (w.id.as_str(), w.display_name()))
        .collect();

    for workspace in &workspaces {
        let collection =
            build_workspace(workspace, &export.resources, &groups, limits, &mut bundle)?;
        if let Some(collection) = collection {
            bundle.collections.push(collection);
        }
    }

    for resource in &export.resources {
        if resource.resource_type == "environment" {
            decode_environment(resource, &mut bundle);
        }
    }

    // Requests parented to something outside any workspace chain are lost.
    for resource in &export.resources {
        if resource.resource_type == "request"
            && resolve_workspace(resource, &groups, &workspace_ids, limits).is_none()
        {
            bundle.skip(ImportWarning::warning(
                resource.display_name(),
                "request is not attached to any workspace",
            ));
        }
    }

    Ok(bundle)
}

fn build_workspace(
    workspace: &InsomniaResource,
    resources: &[InsomniaResource],
    groups: &HashMap<&str, &InsomniaResource>,
    limits: &ImportLimits,
    bundle: &mut ImportBundle,
) -> Result<Option<quiver_domain::Collection>, DecodeError> {
    let mut builder = CollectionBuilder::new(workspace.display_name());
    if let Some(description) = &workspace.description {
        if !description.is_empty() {
            builder = builder.with_description(description);
        }
    }

    // Folders first, shallowest chains first, so parents always exist when
    // their children link in.
    let mut owned_groups: Vec<(&InsomniaResource, usize)> = Vec::new();
    for group in groups.values().copied() {
        if let Some((owner, depth)) = chain_to_workspace(group, groups, limits)? {
            if owner == workspace.id {
                owned_groups.push((group, depth));
            }
        }
    }
    owned_groups.sort_by_key(|(group, depth)| (*depth, group.id.clone()));

    let mut folder_ids: HashMap<&str, String> = HashMap::new();
    for (group, _) in &owned_groups {
        let parent = group
            .parent_id
            .as_deref()
            .and_then(|p| folder_ids.get(p))
            .cloned();
        let mut folder = Folder::new(group.display_name());
        if let Some(description) = &group.description {
            if !description.is_empty() {
                folder = folder.with_description(description);
            }
        }
        let id = builder
            .add_folder(folder, parent.as_deref())
            .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
        folder_ids.insert(group.id.as_str(), id);
    }

    for resource in resources {
        if resource.resource_type != "request" {
            continue;
        }
        let folder = match resource.parent_id.as_deref() {
            Some(p) if p == workspace.id => None,
            Some(p) => match folder_ids.get(p) {
                Some(id) => Some(id.clone()),
                None => continue,
            },
            None => continue,
        };
        if let Some(request) = convert_request(resource, bundle) {
            builder
                .add_request(request, folder.as_deref())
                .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
        }
    }

    if builder.is_empty() {
        return Ok(None);
    }
    Ok(Some(builder.build()))
}

/// Walks `parentId` links up to the owning workspace, returning its ID and
/// the number of hops. `None` when the chain dead-ends.
fn chain_to_workspace<'a>(
    group: &'a InsomniaResource,
    groups: &HashMap<&str, &'a InsomniaResource>,
    limits: &ImportLimits,
) -> Result<Option<(&'a str, usize)>, DecodeError> {
    let mut current = group;
    let mut depth = 1usize;
    loop {
        if depth > limits.max_depth {
            return Err(DecodeError::TooDeep {
                max: limits.max_depth,
            });
        }
        let Some(parent) = current.parent_id.as_deref() else {
            return Ok(None);
        };
        match groups.get(parent) {
            Some(parent_group) => {
                current = parent_group;
                depth += 1;
            }
            // Not a group: either the workspace ID or a dead end the caller
            // will fail to match against any workspace.
            None => return Ok(Some((parent, depth))),
        }
    }
}

fn resolve_workspace<'a>(
    request: &InsomniaResource,
    groups: &HashMap<&str, &InsomniaResource>,
    workspace_ids: &HashMap<&'a str, &'a str>,
    limits: &ImportLimits,
) -> Option<&'a str> {
    let mut parent = request.parent_id.as_deref()?;
    for _ in 0..=limits.max_depth {
        if let Some((id, _)) = workspace_ids.get_key_value(parent) {
            return Some(id);
        }
        parent = groups.get(parent)?.parent_id.as_deref()?;
    }
    None
}

fn convert_request(resource: &InsomniaResource, bundle: &mut ImportBundle) -> Option<Request> {
    let name = resource.display_name();
    let method_text = resource.method.as_deref().unwrap_or("GET");
    let Ok(method) = method_text.parse::<HttpMethod>() else {
        bundle.skip(ImportWarning::error(
            name,
            format!("unsupported HTTP method '{method_text}'"),
        ));
        return None;
    };

    let url = resource.url.clone().unwrap_or_default();
    let mut request = Request::new(name, method, url);
    if let Some(description) = &resource.description {
        if !description.is_empty() {
            request = request.with_description(description);
        }
    }

    for header in &resource.headers {
        if !header.disabled {
            request = request.with_header(&header.name, &header.value);
        }
    }
    for param in &resource.parameters {
        if !param.disabled {
            request = request.with_param(&param.name, &param.value);
        }
    }

    if let Some(auth) = &resource.authentication {
        request = request.with_auth(convert_auth(auth, name, bundle));
    }
    if let Some(body) = &resource.body {
        request = request.with_body(convert_body(body, name, bundle));
    }
    Some(request)
}

fn convert_auth(auth: &InsomniaAuth, path: &str, bundle: &mut ImportBundle) -> Auth {
    if auth.disabled {
        return Auth::None;
    }
    match auth.auth_type.as_deref() {
        Some("bearer") => Auth::bearer(auth.token.clone().unwrap_or_default()),
        Some("basic") => Auth::basic(
            auth.username.clone().unwrap_or_default(),
            auth.password.clone().unwrap_or_default(),
        ),
        Some("apikey") => {
            let location = if auth.add_to.as_deref() == Some("queryParams") {
                ApiKeyLocation::Query
            } else {
                ApiKeyLocation::Header
            };
            Auth::api_key(
                auth.key.clone().unwrap_or_default(),
                auth.value.clone().unwrap_or_default(),
                location,
            )
        }
        None | Some("none" | "") => Auth::None,
        Some(other) => {
            bundle.warnings.push(ImportWarning::warning(
                path,
                format!("unsupported auth type '{other}' degraded to none"),
            ));
            Auth::None
        }
    }
}

fn convert_body(body: &InsomniaBody, path: &str, bundle: &mut ImportBundle) -> Body {
    let mime = body.mime_type.as_deref().unwrap_or("");
    if mime.contains("form") {
        let data = body
            .params
            .iter()
            .filter(|p| !p.disabled)
            .map(|p| KeyValue::new(&p.name, &p.value))
            .collect();
        return Body::form(data);
    }

    let text = body.text.clone().unwrap_or_default();
    if text.is_empty() {
        return Body::None;
    }
    if mime.contains("json") {
        return Body::json(text);
    }
    if mime.is_empty() {
        return Body::from_text(text);
    }
    if mime.contains("graphql") {
        bundle.warnings.push(ImportWarning::warning(
            path,
            "GraphQL bodies are not supported and were dropped",
        ));
        return Body::None;
    }
    Body::raw(text)
}

/// Converts an environment resource, coercing scalar values to strings.
/// Nested objects and arrays cannot be flattened and are skipped.
fn decode_environment(resource: &InsomniaResource, bundle: &mut ImportBundle) {
    let Some(serde_json::Value::Object(data)) = &resource.data else {
        return;
    };
    if data.is_empty() {
        return;
    }

    let name = resource.display_name();
    let mut environment = Environment::new(name);
    for (key, value) in data {
        match value {
            serde_json::Value::String(s) => environment.set(key, s),
            serde_json::Value::Number(n) => environment.set(key, n.to_string()),
            serde_json::Value::Bool(b) => environment.set(key, b.to_string()),
            _ => {
                bundle.warnings.push(ImportWarning::warning(
                    name,
                    format!("value '{key}' is not a scalar and was skipped"),
                ));
            }
        }
    }

    if !environment.is_empty() {
        bundle.environments.push(environment);
    }
}
