//! Collection and folder types.
//!
//! A collection holds flat `folders` and `requests` arrays linked by ID:
//! `Request::folder_id` points at a folder (or is `None` for root) and
//! `Folder::parent_id` points at another folder (or is `None`). The links
//! form a forest; [`CollectionBuilder`] is the assembly path that keeps
//! them consistent.

pub mod builder;

pub use builder::CollectionBuilder;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{EntityKind, generate_id};
use crate::request::Request;

/// A folder within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique identifier (`folder_` prefixed).
    pub id: String,
    /// Folder name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent folder, or `None` for a collection-root folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Folder {
    /// Creates a root-level folder with a fresh `folder_` ID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(EntityKind::Folder),
            name: name.into(),
            description: None,
            parent_id: None,
        }
    }

    /// Sets the description, builder style.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A collection of requests organized in a folder forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Unique identifier (`col_` prefixed).
    pub id: String,
    /// Collection name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// All folders, any nesting expressed through `parent_id`.
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// All requests, folder membership expressed through `folder_id`.
    #[serde(default)]
    pub requests: Vec<Request>,
    /// Collection-scoped template variables.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Creates an empty collection with a fresh `col_` ID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(EntityKind::Collection),
            name: name.into(),
            description: None,
            folders: Vec::new(),
            requests: Vec::new(),
            variables: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamps the collection as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Looks up a folder by ID.
    #[must_use]
    pub fn find_folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Iterates the folders directly under `parent_id` (`None` for root).
    pub fn child_folders<'a>(
        &'a self,
        parent_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Folder> {
        self.folders
            .iter()
            .filter(move |f| f.parent_id.as_deref() == parent_id)
    }

    /// Iterates the requests directly inside `folder_id` (`None` for root).
    pub fn folder_requests<'a>(
        &'a self,
        folder_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Request> {
        self.requests
            .iter()
            .filter(move |r| r.folder_id.as_deref() == folder_id)
    }

    /// Returns the number of requests.
    #[must_use]
    pub const fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Returns the number of folders.
    #[must_use]
    pub const fn folder_count(&self) -> usize {
        self.folders.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use pretty_assertions::assert_eq;

    fn sample() -> Collection {
        let mut builder = CollectionBuilder::new("Sample");
        let users = builder
            .add_folder(Folder::new("Users"), None)
            .unwrap();
        builder
            .add_request(
                Request::new("List", HttpMethod::Get, "https://x/users"),
                Some(&users),
            )
            .unwrap();
        builder
            .add_request(Request::new("Ping", HttpMethod::Get, "https://x/ping"), None)
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_child_folders_and_requests() {
        let collection = sample();
        assert_eq!(collection.child_folders(None).count(), 1);
        assert_eq!(collection.folder_requests(None).count(), 1);

        let folder_id = collection.folders[0].id.clone();
        assert_eq!(collection.folder_requests(Some(&folder_id)).count(), 1);
        assert_eq!(collection.child_folders(Some(&folder_id)).count(), 0);
    }

    #[test]
    fn test_find_folder() {
        let collection = sample();
        let id = collection.folders[0].id.clone();
        assert_eq!(collection.find_folder(&id).unwrap().name, "Users");
        assert!(collection.find_folder("folder_missing").is_none());
    }

    #[test]
    fn test_serde_uses_camel_case_timestamps() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(!json.contains("\"created_at\""));
    }
}
