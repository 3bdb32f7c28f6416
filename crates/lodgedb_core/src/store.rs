//! The file-backed registry engine.

use crate::entity::{Entity, Representation};
use crate::error::{CoreError, CoreResult};
use crate::kind::EntityKind;
use lodgedb_storage::{FileBackend, InMemoryBackend, SnapshotBackend};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// The registry of live entities and their persistence cycle.
///
/// `FileStore` is the single source of truth for all entities known to the
/// process. It owns both the registry (composite key
/// `"<VariantName>.<id>"` to entity) and the backing snapshot; entities
/// never touch the snapshot themselves. There is no implicit global -
/// whatever owns the process lifecycle constructs one engine and holds it.
///
/// Persistence is whole-registry: [`save`](Self::save) serializes every
/// registered entity into one JSON object and atomically replaces the
/// backing file, and [`reload`](Self::reload) rebuilds the registry from
/// that object wholesale.
///
/// # Example
///
/// ```rust
/// use lodgedb_core::{EntityKind, FileStore};
/// use serde_json::json;
///
/// let mut store = FileStore::in_memory();
/// let key = store.create(EntityKind::User);
///
/// store.get_mut(&key).unwrap().set("email", json!("guest@example.com")).unwrap();
/// store.save_entity(&key).unwrap();
///
/// assert!(store.all().contains_key(&key));
/// ```
pub struct FileStore {
    /// Backing snapshot store.
    backend: Box<dyn SnapshotBackend>,
    /// Composite key to live entity. Insertion order irrelevant.
    objects: HashMap<String, Entity>,
}

impl FileStore {
    /// Opens a file-backed engine and performs the initial reload.
    ///
    /// A missing backing file is the first-run state: the registry starts
    /// empty and the file is only created by the first save.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file exists but cannot be read or
    /// interpreted.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::with_backend(Box::new(FileBackend::new(path)))
    }

    /// Creates an ephemeral engine with no persistence.
    ///
    /// Useful for tests and short-lived registries.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(InMemoryBackend::new()),
            objects: HashMap::new(),
        }
    }

    /// Opens an engine over an arbitrary snapshot backend and performs the
    /// initial reload.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend holds a snapshot that cannot be
    /// interpreted.
    pub fn with_backend(backend: Box<dyn SnapshotBackend>) -> CoreResult<Self> {
        let mut store = Self {
            backend,
            objects: HashMap::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Returns the full registry for read-only inspection.
    ///
    /// No filtering, no variant scoping.
    #[must_use]
    pub fn all(&self) -> &HashMap<String, Entity> {
        &self.objects
    }

    /// Looks up an entity by composite key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.objects.get(key)
    }

    /// Looks up an entity by composite key for mutation.
    ///
    /// All mutation of registered entities flows through here; the
    /// registry owns them.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.objects.get_mut(key)
    }

    /// Returns the number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if no entities are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates over the entities of one variant.
    pub fn entities_of(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.objects.values().filter(move |e| e.kind() == kind)
    }

    /// Registers an entity under its composite key, returning the key.
    ///
    /// Silently overwrites an existing entry under the same key;
    /// re-registration is idempotent.
    pub fn put(&mut self, entity: Entity) -> String {
        let key = entity.object_key();
        self.objects.insert(key.clone(), entity);
        key
    }

    /// Constructs a fresh entity and registers it in one step.
    ///
    /// Returns the composite key of the new entity.
    pub fn create(&mut self, kind: EntityKind) -> String {
        self.put(Entity::new(kind))
    }

    /// Persists the whole registry to the backing snapshot.
    ///
    /// Every registered entity is serialized through its representation
    /// mapping into one JSON object keyed by composite key, and the
    /// backing file is atomically replaced with it. This is a
    /// full-snapshot write, not an append or diff.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the snapshot write fails; the
    /// failure is surfaced immediately, never retried.
    pub fn save(&mut self) -> CoreResult<()> {
        let mut snapshot = Representation::new();
        for (key, entity) in &self.objects {
            snapshot.insert(key.clone(), Value::Object(entity.to_representation()));
        }

        let bytes = serde_json::to_vec(&snapshot).map_err(CoreError::Encode)?;
        self.backend.write(&bytes)?;

        debug!(
            objects = self.objects.len(),
            bytes = bytes.len(),
            "persisted registry snapshot"
        );
        Ok(())
    }

    /// Saves one entity: advances its `updated_at`, then persists the
    /// whole registry.
    ///
    /// Every other registered entity's persisted representation is
    /// rewritten too, since persistence is whole-registry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no entity is registered under
    /// `key`, or any error [`save`](Self::save) can return.
    pub fn save_entity(&mut self, key: &str) -> CoreResult<()> {
        let entity = self.objects.get_mut(key).ok_or_else(|| CoreError::NotFound {
            key: key.to_owned(),
        })?;
        entity.touch();
        self.save()
    }

    /// Rebuilds the registry from the backing snapshot.
    ///
    /// A missing snapshot is a no-op, not an error - the registry is left
    /// untouched. Otherwise every entry is reconstructed through its
    /// variant's representation path into a freshly built registry, which
    /// replaces the current one wholesale. On any failure the current
    /// registry is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CorruptStore`] if the snapshot is not a JSON
    /// object, an entry is malformed, or a discriminator names an unknown
    /// variant. Reload does not partially recover.
    pub fn reload(&mut self) -> CoreResult<()> {
        let Some(bytes) = self.backend.read()? else {
            debug!("no backing snapshot, registry unchanged");
            return Ok(());
        };

        let snapshot: Representation = serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::corrupt_store(format!("backing file is not valid JSON: {e}")))?;

        let mut objects = HashMap::with_capacity(snapshot.len());
        for (key, value) in &snapshot {
            let repr = value.as_object().ok_or_else(|| {
                CoreError::corrupt_store(format!("entry `{key}` is not a JSON object"))
            })?;
            let entity = Entity::from_representation(repr)?;
            objects.insert(key.clone(), entity);
        }

        debug!(objects = objects.len(), "reloaded registry snapshot");
        self.objects = objects;
        Ok(())
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("objects", &self.objects.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CLASS_KEY;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn in_memory_starts_empty() {
        let store = FileStore::in_memory();
        assert!(store.is_empty());
        assert!(store.all().is_empty());
    }

    #[test]
    fn put_registers_under_composite_key() {
        let mut store = FileStore::in_memory();
        let user = Entity::new(EntityKind::User);
        let id = user.id().clone();

        let key = store.put(user);
        assert_eq!(key, format!("User.{id}"));
        assert!(store.all().contains_key(&key));
    }

    #[test]
    fn create_constructs_and_registers() {
        let mut store = FileStore::in_memory();
        let key = store.create(EntityKind::Amenity);

        let amenity = store.get(&key).unwrap();
        assert_eq!(amenity.kind(), EntityKind::Amenity);
        assert_eq!(amenity.object_key(), key);
    }

    #[test]
    fn put_overwrites_silently() {
        let mut store = FileStore::in_memory();
        let mut user = Entity::new(EntityKind::User);
        user.set("email", json!("first@example.com")).unwrap();

        let mut again = user.clone();
        again.set("email", json!("second@example.com")).unwrap();

        let key = store.put(user);
        let key2 = store.put(again);

        assert_eq!(key, key2);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&key).unwrap().get_assigned("email"),
            Some(&json!("second@example.com"))
        );
    }

    #[test]
    fn entities_of_scopes_by_variant() {
        let mut store = FileStore::in_memory();
        store.create(EntityKind::User);
        store.create(EntityKind::User);
        store.create(EntityKind::City);

        assert_eq!(store.entities_of(EntityKind::User).count(), 2);
        assert_eq!(store.entities_of(EntityKind::City).count(), 1);
        assert_eq!(store.entities_of(EntityKind::Review).count(), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn save_writes_composite_keys_to_the_backing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let mut store = FileStore::open(&path).unwrap();
        let key = store.create(EntityKind::User);

        assert!(!path.exists());
        store.save().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains(&key));
        assert!(contents.contains("\"__class__\":\"User\""));
    }

    #[test]
    fn reload_with_absent_file_is_a_no_op() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let mut store = FileStore::open(&path).unwrap();
        assert!(store.is_empty());

        store.reload().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_reopen_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let key;
        {
            let mut store = FileStore::open(&path).unwrap();
            key = store.create(EntityKind::Place);
            store
                .get_mut(&key)
                .unwrap()
                .set("name", json!("Loft"))
                .unwrap();
            store.save().unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        let place = reopened.get(&key).unwrap();
        assert_eq!(place.kind(), EntityKind::Place);
        assert_eq!(place.get_assigned("name"), Some(&json!("Loft")));
    }

    #[test]
    fn reload_rebuilds_the_registry_wholesale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let mut store = FileStore::open(&path).unwrap();
        let saved = store.create(EntityKind::State);
        store.save().unwrap();

        let unsaved = store.create(EntityKind::State);
        assert_eq!(store.len(), 2);

        store.reload().unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get(&saved).is_some());
        assert!(store.get(&unsaved).is_none());
    }

    #[test]
    fn save_entity_touches_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let mut store = FileStore::open(&path).unwrap();
        let key = store.create(EntityKind::Review);
        let before = store.get(&key).unwrap().updated_at();

        sleep(Duration::from_millis(2));
        store.save_entity(&key).unwrap();

        let after = store.get(&key).unwrap().updated_at();
        assert!(after > before);
        assert!(path.exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(&key).unwrap().updated_at(), after);
    }

    #[test]
    fn save_entity_on_unknown_key_fails() {
        let mut store = FileStore::in_memory();
        let err = store.save_entity("User.missing").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn reload_from_preloaded_snapshot() {
        let snapshot = json!({
            "City.123456": {
                "id": "123456",
                "created_at": "2024-01-15T10:30:00.000000",
                "updated_at": "2024-01-15T10:30:00.000000",
                "name": "San Francisco",
                CLASS_KEY: "City",
            }
        });
        let backend = InMemoryBackend::with_data(snapshot.to_string().into_bytes());

        let store = FileStore::with_backend(Box::new(backend)).unwrap();
        assert_eq!(store.len(), 1);

        let city = store.get("City.123456").unwrap();
        assert_eq!(city.kind(), EntityKind::City);
        assert_eq!(city.id().as_str(), "123456");
        assert_eq!(city.get_assigned("name"), Some(&json!("San Francisco")));
    }

    #[test]
    fn corrupt_json_fails_reload_and_keeps_registry() {
        let mut store = FileStore::in_memory();
        let key = store.create(EntityKind::User);

        store.backend = Box::new(InMemoryBackend::with_data(b"not json".to_vec()));
        let err = store.reload().unwrap_err();

        assert!(matches!(err, CoreError::CorruptStore { .. }));
        assert!(store.get(&key).is_some());
    }

    #[test]
    fn unknown_discriminator_fails_reload() {
        let snapshot = json!({
            "Spaceship.s-1": {
                "id": "s-1",
                "created_at": "2024-01-15T10:30:00.000000",
                "updated_at": "2024-01-15T10:30:00.000000",
                CLASS_KEY: "Spaceship",
            }
        });
        let backend = InMemoryBackend::with_data(snapshot.to_string().into_bytes());

        let err = FileStore::with_backend(Box::new(backend)).unwrap_err();
        assert!(matches!(err, CoreError::CorruptStore { .. }));
    }

    #[test]
    fn non_object_entry_fails_reload() {
        let backend =
            InMemoryBackend::with_data(b"{\"User.u-1\": \"not an object\"}".to_vec());
        let err = FileStore::with_backend(Box::new(backend)).unwrap_err();
        assert!(matches!(err, CoreError::CorruptStore { .. }));
    }

    #[test]
    fn open_on_corrupt_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, b"{ truncated").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, CoreError::CorruptStore { .. }));
    }

    #[test]
    fn debug_reports_object_count() {
        let mut store = FileStore::in_memory();
        store.create(EntityKind::User);
        let rendered = format!("{store:?}");
        assert!(rendered.contains("FileStore"));
        assert!(rendered.contains('1'));
    }
}
