//! # LodgeDB Core
//!
//! Entity model and file-backed registry engine for LodgeDB.
//!
//! This crate provides:
//! - The base entity abstraction: identity, timestamps, and the
//!   representation mapping every domain object serializes through
//! - The variant table and static field schemas for the six domain
//!   variants (User, Place, City, State, Amenity, Review)
//! - The [`FileStore`] engine: the process-wide registry of live entities
//!   and its whole-snapshot persistence cycle
//!
//! ## Example
//!
//! ```rust
//! use lodgedb_core::{EntityKind, FileStore};
//! use serde_json::json;
//!
//! let mut store = FileStore::in_memory();
//!
//! let key = store.create(EntityKind::City);
//! store.get_mut(&key).unwrap().set("name", json!("San Francisco")).unwrap();
//! store.save_entity(&key).unwrap();
//!
//! let city = store.get(&key).unwrap();
//! assert_eq!(city.kind(), EntityKind::City);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod error;
mod kind;
mod schema;
mod store;

pub use entity::{Entity, EntityId, Representation, Timestamp, CLASS_KEY};
pub use error::{CoreError, CoreResult};
pub use kind::EntityKind;
pub use schema::{FieldSpec, FieldType, VariantSchema};
pub use store::FileStore;
