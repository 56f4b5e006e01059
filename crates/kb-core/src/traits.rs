//! Core traits shared by the domain records

/// Identifier type used by the remote store (opaque strings, usually UUIDs)
pub type Id = String;

/// Trait for records addressable by id
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Trait for records that belong to a team
pub trait TeamScoped {
    fn team_id(&self) -> &str;
}

/// Base trait for records persisted through the remote store
pub trait Entity: Identifiable + Send + Sync {
    /// The resource collection name on the remote store
    const RESOURCE_NAME: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}

/// Find a record by id in a slice
pub fn find_by_id<'a, T: Identifiable>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Find a record by id in a mutable slice
pub fn find_by_id_mut<'a, T: Identifiable>(items: &'a mut [T], id: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.id() == id)
}
