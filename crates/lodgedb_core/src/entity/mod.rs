//! The base entity abstraction.
//!
//! Every domain object shares the same lifecycle: a unique [`EntityId`],
//! `created_at`/`updated_at` [`Timestamp`]s, and conversion to and from a
//! flat representation mapping suitable for JSON persistence. The concrete
//! variants themselves carry no behavior - they are [`EntityKind`]s with
//! static field schemas.

mod id;
mod timestamp;

pub use id::EntityId;
pub use timestamp::Timestamp;

use crate::error::{CoreError, CoreResult};
use crate::kind::EntityKind;
use serde_json::Value;
use std::fmt;

/// The flat key/value form of an entity, suitable for JSON persistence.
///
/// Keeps insertion order (`serde_json` runs with `preserve_order`), which
/// the rendering contract depends on.
pub type Representation = serde_json::Map<String, Value>;

/// Reserved representation key naming the concrete variant.
///
/// Kept out of the per-field namespace so it can never collide with an
/// assigned attribute.
pub const CLASS_KEY: &str = "__class__";

/// Representation keys owned by the entity lifecycle itself.
const RESERVED: [&str; 3] = ["id", "created_at", "updated_at"];

/// A domain object with identity, timestamps, and a serializable
/// representation.
///
/// Entities are plain values. Constructing one does not register it
/// anywhere; registration is the storage engine's
/// [`put`](crate::FileStore::put) (or the
/// [`create`](crate::FileStore::create) convenience, which constructs and
/// registers in one step).
///
/// # Construction
///
/// - [`Entity::new`] generates a fresh id and sets both timestamps to now.
/// - [`Entity::from_representation`] rehydrates an entity from a mapping
///   previously produced by [`Entity::to_representation`], converting the
///   timestamp strings back into [`Timestamp`]s.
///
/// # Fields
///
/// Variant fields live in the variant's static schema until explicitly
/// assigned with [`Entity::set`]; reads through [`Entity::get`] fall back
/// to the schema default for unassigned fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    id: EntityId,
    created_at: Timestamp,
    updated_at: Timestamp,
    /// Explicitly assigned variant fields, in assignment order.
    attrs: Representation,
}

impl Entity {
    /// Creates a fresh entity of the given variant.
    ///
    /// Generates a random unique id and sets `created_at` and `updated_at`
    /// to the same current instant.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        let now = Timestamp::now();
        Self {
            kind,
            id: EntityId::new(),
            created_at: now,
            updated_at: now,
            attrs: Representation::new(),
        }
    }

    /// Rehydrates an entity from a representation mapping.
    ///
    /// The variant is selected through the [`CLASS_KEY`] discriminator.
    /// Every other key becomes an attribute of the new entity, with
    /// `created_at` and `updated_at` converted back from their ISO-8601
    /// string form. The result is not registered with any storage engine.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidArgument`] if `id`, `created_at`, or
    ///   `updated_at` is `null`, or `id` is empty
    /// - [`CoreError::CorruptStore`] if a required field is missing, the
    ///   discriminator names an unknown variant, or a timestamp string
    ///   does not parse
    pub fn from_representation(repr: &Representation) -> CoreResult<Self> {
        let class = required_string(repr, CLASS_KEY)?;
        let kind = EntityKind::from_name(class)
            .ok_or_else(|| CoreError::corrupt_store(format!("unknown entity variant `{class}`")))?;

        let id = required_string(repr, "id")?;
        if id.is_empty() {
            return Err(CoreError::invalid_argument("`id` must be a non-empty string"));
        }
        let id = EntityId::from_string(id);

        let created_at = required_timestamp(repr, "created_at")?;
        let updated_at = required_timestamp(repr, "updated_at")?;

        let mut attrs = Representation::new();
        for (key, value) in repr {
            if key == CLASS_KEY || RESERVED.contains(&key.as_str()) {
                continue;
            }
            attrs.insert(key.clone(), value.clone());
        }

        Ok(Self {
            kind,
            id,
            created_at,
            updated_at,
            attrs,
        })
    }

    /// Returns the concrete variant.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the entity's id.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the last-update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the registry key, `"<VariantName>.<id>"`.
    #[must_use]
    pub fn object_key(&self) -> String {
        format!("{}.{}", self.kind.name(), self.id)
    }

    /// Returns the explicitly assigned variant fields, in assignment order.
    #[must_use]
    pub fn attributes(&self) -> &Representation {
        &self.attrs
    }

    /// Reads a variant field.
    ///
    /// Returns the assigned value, or the schema default if the field is
    /// declared but unassigned, or `None` for names the variant knows
    /// nothing about.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<Value> {
        if let Some(value) = self.attrs.get(field) {
            return Some(value.clone());
        }
        self.kind
            .schema()
            .field(field)
            .map(|spec| spec.ty.default_value())
    }

    /// Reads a variant field without the schema-default fallback.
    ///
    /// Returns `None` until the field has been explicitly assigned.
    #[must_use]
    pub fn get_assigned(&self, field: &str) -> Option<&Value> {
        self.attrs.get(field)
    }

    /// Assigns a variant field, materializing it into the entity.
    ///
    /// Values for fields the variant schema declares are type-checked
    /// against the schema; names the schema does not know are accepted
    /// as-is. Lifecycle fields (`id`, the timestamps, the discriminator)
    /// cannot be assigned this way.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] for a reserved name or a
    /// schema type mismatch.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> CoreResult<()> {
        let field = field.into();
        if field == CLASS_KEY || RESERVED.contains(&field.as_str()) {
            return Err(CoreError::invalid_argument(format!(
                "`{field}` is reserved and cannot be assigned"
            )));
        }
        if let Some(spec) = self.kind.schema().field(&field) {
            if !spec.ty.matches(&value) {
                return Err(CoreError::invalid_argument(format!(
                    "field `{field}` expects {}",
                    spec.ty
                )));
            }
        }
        self.attrs.insert(field, value);
        Ok(())
    }

    /// Advances `updated_at` to the current instant.
    ///
    /// This is the entity half of a save; persisting the registry is the
    /// engine's [`save_entity`](crate::FileStore::save_entity).
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    /// Produces the representation mapping for persistence.
    ///
    /// The mapping is freshly built on every call - it never aliases the
    /// entity's own attribute container. Order: `id`, `created_at`,
    /// `updated_at`, the assigned fields in assignment order, then the
    /// [`CLASS_KEY`] discriminator.
    #[must_use]
    pub fn to_representation(&self) -> Representation {
        let mut repr = Representation::new();
        repr.insert("id".to_owned(), Value::String(self.id.to_string()));
        repr.insert(
            "created_at".to_owned(),
            Value::String(self.created_at.to_iso()),
        );
        repr.insert(
            "updated_at".to_owned(),
            Value::String(self.updated_at.to_iso()),
        );
        for (key, value) in &self.attrs {
            repr.insert(key.clone(), value.clone());
        }
        repr.insert(
            CLASS_KEY.to_owned(),
            Value::String(self.kind.name().to_owned()),
        );
        repr
    }
}

/// Renders `[VariantName] (id) {attributes}`.
///
/// The attribute mapping covers the instance attributes - `id`, the
/// timestamps in their ISO-8601 form, then assigned fields in assignment
/// order - without the discriminator. This form is a diagnostics contract
/// and is matched byte-for-byte in tests.
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {{", self.kind.name(), self.id)?;
        write!(f, "\"id\": \"{}\"", self.id)?;
        write!(f, ", \"created_at\": \"{}\"", self.created_at)?;
        write!(f, ", \"updated_at\": \"{}\"", self.updated_at)?;
        for (key, value) in &self.attrs {
            write!(f, ", \"{key}\": {value}")?;
        }
        write!(f, "}}")
    }
}

fn required_string<'a>(repr: &'a Representation, field: &str) -> CoreResult<&'a str> {
    match repr.get(field) {
        None => Err(CoreError::corrupt_store(format!(
            "missing required field `{field}`"
        ))),
        Some(Value::Null) => Err(CoreError::invalid_argument(format!(
            "`{field}` must not be null"
        ))),
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(other) => Err(CoreError::corrupt_store(format!(
            "`{field}` must be a string, got {other}"
        ))),
    }
}

fn required_timestamp(repr: &Representation, field: &str) -> CoreResult<Timestamp> {
    let raw = required_string(repr, field)?;
    Timestamp::parse_iso(raw).map_err(|e| {
        CoreError::corrupt_store(format!("`{field}` is not an ISO-8601 timestamp: {e}"))
    })
}
