//! ID generation scoped by entity kind.

use uuid::Uuid;

/// The kinds of entity that receive allocated IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A request collection.
    Collection,
    /// A folder within a collection.
    Folder,
    /// A single request.
    Request,
    /// A history record.
    History,
}

impl EntityKind {
    /// Returns the ID prefix for this entity kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Collection => "col",
            Self::Folder => "folder",
            Self::Request => "req",
            Self::History => "hist",
        }
    }
}

/// Generates a fresh ID for the given entity kind.
///
/// IDs have the form `{prefix}_{uuid}`. The UUID v7 component embeds a
/// timestamp, so IDs of one kind sort by creation time.
#[must_use]
pub fn generate_id(kind: EntityKind) -> String {
    format!("{}_{}", kind.prefix(), Uuid::now_v7())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_per_kind() {
        assert!(generate_id(EntityKind::Collection).starts_with("col_"));
        assert!(generate_id(EntityKind::Folder).starts_with("folder_"));
        assert!(generate_id(EntityKind::Request).starts_with("req_"));
        assert!(generate_id(EntityKind::History).starts_with("hist_"));
    }

    #[test]
    fn test_uuid_component_is_valid() {
        let id = generate_id(EntityKind::Request);
        let uuid_part = id.strip_prefix("req_").unwrap();
        assert!(Uuid::parse_str(uuid_part).is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = generate_id(EntityKind::Collection);
        let b = generate_id(EntityKind::Collection);
        assert_ne!(a, b);
    }
}
