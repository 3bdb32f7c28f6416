//! Entity identifier.

use std::fmt;
use uuid::Uuid;

/// Unique identifier for an entity.
///
/// Entity IDs are:
/// - Globally unique within a process (random v4 UUIDs in string form)
/// - Immutable once assigned
/// - Never reused
///
/// Reconstructed entities keep whatever id string was persisted, so the
/// type stores the string form rather than raw UUID bytes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new random entity ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an entity ID from an existing string.
    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the id string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_unique() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn new_is_non_empty() {
        assert!(!EntityId::new().is_empty());
    }

    #[test]
    fn new_is_hyphenated_uuid() {
        let id = EntityId::new();
        assert_eq!(id.as_str().len(), 36);
        assert_eq!(id.as_str().matches('-').count(), 4);
    }

    #[test]
    fn from_string_round_trip() {
        let id = EntityId::from_string("123456");
        assert_eq!(id.as_str(), "123456");
        assert_eq!(id.to_string(), "123456");
    }

    #[test]
    fn conversions_from_strings() {
        assert_eq!(EntityId::from("abc"), EntityId::from_string("abc"));
        assert_eq!(EntityId::from("abc".to_owned()).as_str(), "abc");
    }

    #[test]
    fn debug_names_the_type() {
        let id = EntityId::from_string("abc");
        assert_eq!(format!("{id:?}"), "EntityId(abc)");
    }
}
