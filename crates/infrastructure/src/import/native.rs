//! Native envelope decoder.
//!
//! Accepts the full `quiver_export` envelope plus the partial forms
//! `{"quiver_collection": true, "collection": {...}}` and
//! `{"quiver_environments": true, "environments": {...}}`. IDs are never
//! trusted from the file: every collection is rebuilt through
//! [`CollectionBuilder`] with fresh IDs, remapping folder links as it goes.

use std::collections::HashMap;

use quiver_domain::{Collection, CollectionBuilder, Environment, Folder, Request};

use super::{DecodeError, ImportBundle, ImportLimits};
use crate::export::native::{ENVELOPE_VERSION, EnvironmentMap, NativeEnvelope};
use crate::import::warning::ImportWarning;

/// Decodes a native export document.
///
/// # Errors
///
/// Returns [`DecodeError::MissingRequiredField`] when no marker key is
/// present, [`DecodeError::MalformedInput`] when the JSON does not parse,
/// and [`DecodeError::TooManyItems`] when the content exceeds `limits`.
pub fn decode(text: &str, limits: &ImportLimits) -> Result<ImportBundle, DecodeError> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;

    let mut bundle = ImportBundle::default();
    let (collections, environments) = if json.get("quiver_export").is_some() {
        let envelope: NativeEnvelope = serde_json::from_value(json)
            .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
        if envelope.version != ENVELOPE_VERSION {
            bundle.warnings.push(ImportWarning::warning(
                "quiver_export",
                format!(
                    "envelope version '{}' is newer than '{ENVELOPE_VERSION}', importing anyway",
                    envelope.version
                ),
            ));
        }
        let environments = envelope.environments();
        (envelope.collections, environments)
    } else if json.get("quiver_collection").is_some() {
        let value = json
            .get("collection")
            .ok_or_else(|| DecodeError::MissingRequiredField("collection".to_string()))?;
        let collection: Collection = serde_json::from_value(value.clone())
            .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
        (vec![collection], Vec::new())
    } else if json.get("quiver_environments").is_some() {
        let value = json
            .get("environments")
            .ok_or_else(|| DecodeError::MissingRequiredField("environments".to_string()))?;
        let map: EnvironmentMap = serde_json::from_value(value.clone())
            .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
        let environments = map
            .into_iter()
            .map(|(name, values)| Environment { name, values })
            .collect();
        (Vec::new(), environments)
    } else {
        return Err(DecodeError::MissingRequiredField(
            "quiver_export".to_string(),
        ));
    };

    let count: usize = collections
        .iter()
        .map(|c| c.request_count() + c.folder_count())
        .sum();
    if count > limits.max_items {
        return Err(DecodeError::TooManyItems {
            count,
            max: limits.max_items,
        });
    }

    for collection in collections {
        let rebuilt = rebuild(collection, &mut bundle);
        bundle.collections.push(rebuilt);
    }
    bundle.environments.extend(environments);
    Ok(bundle)
}

/// Re-assembles a decoded collection with fresh IDs.
///
/// Folders are added parent-first over repeated passes; anything still
/// unplaced afterwards has a dangling or cyclic `parentId` and is skipped
/// along with the requests inside it.
fn rebuild(source: Collection, bundle: &mut ImportBundle) -> Collection {
    let mut builder = CollectionBuilder::new(&source.name);
    if let Some(description) = &source.description {
        builder = builder.with_description(description);
    }
    for (key, value) in &source.variables {
        builder.set_variable(key, value);
    }

    let mut id_map: HashMap<String, String> = HashMap::new();
    let mut pending: Vec<&Folder> = source.folders.iter().collect();
    loop {
        let mut placed_any = false;
        pending.retain(|folder| {
            let parent = match folder.parent_id.as_deref() {
                None => None,
                Some(old) => match id_map.get(old) {
                    Some(new) => Some(new.clone()),
                    None => return true,
                },
            };
            let mut fresh = Folder::new(&folder.name);
            fresh.description = folder.description.clone();
            if let Ok(id) = builder.add_folder(fresh, parent.as_deref()) {
                id_map.insert(folder.id.clone(), id);
                placed_any = true;
            }
            false
        });
        if pending.is_empty() || !placed_any {
            break;
        }
    }
    for folder in pending {
        bundle.skip(ImportWarning::warning(
            &folder.name,
            "folder has a dangling or cyclic parent link",
        ));
    }

    for request in &source.requests {
        let folder = match request.folder_id.as_deref() {
            None => None,
            Some(old) => match id_map.get(old) {
                Some(new) => Some(new.clone()),
                None => {
                    bundle.skip(ImportWarning::warning(
                        &request.name,
                        "request points at a missing folder",
                    ));
                    continue;
                }
            },
        };
        let mut fresh = Request::new(&request.name, request.method, &request.url);
        fresh.description = request.description.clone();
        fresh.headers = request.headers.clone();
        fresh.params = request.params.clone();
        fresh.cookies = request.cookies.clone();
        fresh.auth = request.auth.clone();
        fresh.body = request.body.clone();
        // The folder ID was just handed out by this builder.
        if builder.add_request(fresh, folder.as_deref()).is_err() {
            bundle.skip(ImportWarning::warning(
                &request.name,
                "request points at a missing folder",
            ));
        }
    }

    builder.build()
}
