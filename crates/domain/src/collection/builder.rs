//! Construction-time assembly of collections.

use std::collections::HashSet;

use crate::error::{DomainError, DomainResult};
use crate::request::Request;

use super::{Collection, Folder};

/// Assembles a [`Collection`] while keeping folder/request links valid.
///
/// Importers feed decoded folders and requests through this builder instead
/// of pushing into the collection arrays directly: a reference to a folder
/// that has not been added yet is rejected on the spot, so a finished
/// collection can never contain a dangling `parent_id`/`folder_id` or a
/// folder cycle. Key-value entries with empty keys are dropped on insertion.
#[derive(Debug)]
pub struct CollectionBuilder {
    collection: Collection,
    folder_ids: HashSet<String>,
}

impl CollectionBuilder {
    /// Starts a new collection with a fresh `col_` ID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            collection: Collection::new(name),
            folder_ids: HashSet::new(),
        }
    }

    /// Sets the collection description, builder style.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.collection.description = Some(description.into());
        self
    }

    /// Sets a collection-scoped template variable.
    ///
    /// Empty keys are ignored.
    pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !key.is_empty() {
            self.collection.variables.insert(key, value.into());
        }
    }

    /// Adds a folder under `parent_id` (`None` for root) and returns the
    /// folder's ID for linking children.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownFolder`] when `parent_id` does not
    /// name an already-added folder.
    pub fn add_folder(
        &mut self,
        mut folder: Folder,
        parent_id: Option<&str>,
    ) -> DomainResult<String> {
        if let Some(parent) = parent_id
            && !self.folder_ids.contains(parent)
        {
            return Err(DomainError::UnknownFolder(parent.to_string()));
        }
        folder.parent_id = parent_id.map(str::to_string);
        let id = folder.id.clone();
        self.folder_ids.insert(id.clone());
        self.collection.folders.push(folder);
        Ok(id)
    }

    /// Adds a request inside `folder_id` (`None` for root).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownFolder`] when `folder_id` does not
    /// name an already-added folder.
    pub fn add_request(&mut self, mut request: Request, folder_id: Option<&str>) -> DomainResult<()> {
        if let Some(folder) = folder_id
            && !self.folder_ids.contains(folder)
        {
            return Err(DomainError::UnknownFolder(folder.to_string()));
        }
        request.folder_id = folder_id.map(str::to_string);
        request.strip_empty_keys();
        self.collection.requests.push(request);
        Ok(())
    }

    /// Returns the number of requests added so far.
    #[must_use]
    pub const fn request_count(&self) -> usize {
        self.collection.request_count()
    }

    /// Returns the number of folders added so far.
    #[must_use]
    pub const fn folder_count(&self) -> usize {
        self.collection.folder_count()
    }

    /// Returns true when nothing has been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.collection.requests.is_empty() && self.collection.folders.is_empty()
    }

    /// Finishes assembly, stamping the modification time.
    #[must_use]
    pub fn build(mut self) -> Collection {
        self.collection.touch();
        self.collection
    }
}
