//! Postman Collection v2.1 encoder.
//!
//! Reuses the import-side wire types, so anything this encoder emits is by
//! construction something the decoder can read back.

use quiver_domain::{ApiKeyLocation, Auth, Body, Collection, Environment, Folder, Request};

use crate::import::postman::types::{
    PostmanAuth, PostmanAuthParam, PostmanBody, PostmanBodyOptions, PostmanCollection,
    PostmanEnvValue, PostmanEnvironment, PostmanFormParam, PostmanHeader, PostmanInfo,
    PostmanItem, PostmanQueryParam, PostmanRawOptions, PostmanUrl, PostmanUrlStructured,
    PostmanVariable,
};
use crate::serialization::{SerializationError, to_json_stable};

/// Schema URL stamped into every exported collection.
pub const SCHEMA_V2_1: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Encodes a collection as a Postman Collection v2.1 document.
///
/// Request cookies have no Postman representation and are not emitted.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_collection(collection: &Collection) -> Result<String, SerializationError> {
    let wire = PostmanCollection {
        info: PostmanInfo {
            name: collection.name.clone(),
            description: collection.description.clone(),
            schema: Some(SCHEMA_V2_1.to_string()),
        },
        item: encode_level(collection, None),
        variable: collection
            .variables
            .iter()
            .map(|(key, value)| PostmanVariable {
                key: key.clone(),
                value: Some(value.clone()),
                disabled: false,
            })
            .collect(),
        auth: None,
        event: Vec::new(),
    };
    to_json_stable(&wire)
}

/// Encodes an environment as a Postman Environment document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_environment(environment: &Environment) -> Result<String, SerializationError> {
    let wire = PostmanEnvironment {
        name: environment.name.clone(),
        values: environment
            .values
            .iter()
            .map(|(key, value)| PostmanEnvValue {
                key: key.clone(),
                value: value.clone(),
                enabled: true,
            })
            .collect(),
    };
    to_json_stable(&wire)
}

/// Emits one nesting level: folders (recursively) first, then requests.
fn encode_level(collection: &Collection, parent: Option<&str>) -> Vec<PostmanItem> {
    let mut items: Vec<PostmanItem> = collection
        .child_folders(parent)
        .map(|folder| encode_folder(collection, folder))
        .collect();
    items.extend(collection.folder_requests(parent).map(encode_request));
    items
}

fn encode_folder(collection: &Collection, folder: &Folder) -> PostmanItem {
    PostmanItem {
        name: folder.name.clone(),
        description: folder.description.clone(),
        item: Some(encode_level(collection, Some(&folder.id))),
        request: None,
        event: Vec::new(),
    }
}

fn encode_request(request: &Request) -> PostmanItem {
    let url = if request.params.is_empty() {
        PostmanUrl::Simple(request.url.clone())
    } else {
        PostmanUrl::Structured(PostmanUrlStructured {
            raw: Some(request.url.clone()),
            query: request
                .params
                .iter()
                .map(|p| PostmanQueryParam {
                    key: p.key.clone(),
                    value: Some(p.value.clone()),
                    disabled: false,
                })
                .collect(),
            ..PostmanUrlStructured::default()
        })
    };

    PostmanItem {
        name: request.name.clone(),
        description: None,
        item: None,
        request: Some(crate::import::postman::types::PostmanRequest {
            method: request.method.as_str().to_string(),
            url,
            header: request
                .headers
                .iter()
                .map(|h| PostmanHeader {
                    key: h.key.clone(),
                    value: h.value.clone(),
                    disabled: false,
                })
                .collect(),
            body: encode_body(&request.body),
            auth: encode_auth(&request.auth),
            description: request.description.clone(),
        }),
        event: Vec::new(),
    }
}

fn encode_body(body: &Body) -> Option<PostmanBody> {
    match body {
        Body::None => None,
        Body::Json { data } => Some(PostmanBody {
            mode: "raw".to_string(),
            raw: Some(data.clone()),
            urlencoded: Vec::new(),
            formdata: Vec::new(),
            options: Some(PostmanBodyOptions {
                raw: Some(PostmanRawOptions {
                    language: Some("json".to_string()),
                }),
            }),
        }),
        Body::Raw { data } => Some(PostmanBody {
            mode: "raw".to_string(),
            raw: Some(data.clone()),
            urlencoded: Vec::new(),
            formdata: Vec::new(),
            options: None,
        }),
        Body::Form { data } => Some(PostmanBody {
            mode: "urlencoded".to_string(),
            raw: None,
            urlencoded: data
                .iter()
                .map(|field| PostmanFormParam {
                    key: field.key.clone(),
                    value: Some(field.value.clone()),
                    param_type: None,
                    disabled: false,
                })
                .collect(),
            formdata: Vec::new(),
            options: None,
        }),
    }
}

fn encode_auth(auth: &Auth) -> Option<PostmanAuth> {
    let param = |key: &str, value: &str| PostmanAuthParam {
        key: key.to_string(),
        value: Some(value.to_string()),
        param_type: Some("string".to_string()),
    };

    match auth {
        Auth::None => None,
        Auth::Bearer { token } => Some(PostmanAuth {
            auth_type: "bearer".to_string(),
            bearer: vec![param("token", token)],
            ..PostmanAuth::default()
        }),
        Auth::Basic { username, password } => Some(PostmanAuth {
            auth_type: "basic".to_string(),
            basic: vec![param("username", username), param("password", password)],
            ..PostmanAuth::default()
        }),
        Auth::ApiKey {
            key,
            value,
            location,
        } => {
            let location = match location {
                ApiKeyLocation::Header => "header",
                ApiKeyLocation::Query => "query",
            };
            Some(PostmanAuth {
                auth_type: "apikey".to_string(),
                apikey: vec![
                    param("key", key),
                    param("value", value),
                    param("in", location),
                ],
                ..PostmanAuth::default()
            })
        }
    }
}
