//! The entity variant table.
//!
//! [`EntityKind`] is the finite set of concrete entity variants. Each kind
//! carries a static [`VariantSchema`]; the kind's name doubles as the
//! discriminator in persisted representations and as the composite-key
//! prefix in the registry. Reconstruction selects the variant through
//! [`EntityKind::from_name`] - an explicit table, not open-ended dispatch.

use crate::schema::{FieldSpec, FieldType, VariantSchema};
use std::fmt;

static USER: VariantSchema = VariantSchema {
    name: "User",
    fields: &[
        FieldSpec::new("email", FieldType::Text),
        FieldSpec::new("password", FieldType::Text),
        FieldSpec::new("first_name", FieldType::Text),
        FieldSpec::new("last_name", FieldType::Text),
    ],
};

static PLACE: VariantSchema = VariantSchema {
    name: "Place",
    fields: &[
        FieldSpec::new("city_id", FieldType::Text),
        FieldSpec::new("user_id", FieldType::Text),
        FieldSpec::new("name", FieldType::Text),
        FieldSpec::new("description", FieldType::Text),
        FieldSpec::new("number_rooms", FieldType::Integer),
        FieldSpec::new("number_bathrooms", FieldType::Integer),
        FieldSpec::new("max_guest", FieldType::Integer),
        FieldSpec::new("price_by_night", FieldType::Integer),
        FieldSpec::new("latitude", FieldType::Float),
        FieldSpec::new("longitude", FieldType::Float),
        FieldSpec::new("amenity_ids", FieldType::TextList),
    ],
};

static CITY: VariantSchema = VariantSchema {
    name: "City",
    fields: &[
        FieldSpec::new("state_id", FieldType::Text),
        FieldSpec::new("name", FieldType::Text),
    ],
};

static STATE: VariantSchema = VariantSchema {
    name: "State",
    fields: &[FieldSpec::new("name", FieldType::Text)],
};

static AMENITY: VariantSchema = VariantSchema {
    name: "Amenity",
    fields: &[FieldSpec::new("name", FieldType::Text)],
};

static REVIEW: VariantSchema = VariantSchema {
    name: "Review",
    fields: &[
        FieldSpec::new("place_id", FieldType::Text),
        FieldSpec::new("user_id", FieldType::Text),
        FieldSpec::new("text", FieldType::Text),
    ],
};

/// A concrete entity variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// An account holder.
    User,
    /// A rentable place.
    Place,
    /// A city within a state.
    City,
    /// A top-level state.
    State,
    /// An amenity a place can offer.
    Amenity,
    /// A user's review of a place.
    Review,
}

impl EntityKind {
    /// All variants, in declaration order.
    pub const ALL: [EntityKind; 6] = [
        Self::User,
        Self::Place,
        Self::City,
        Self::State,
        Self::Amenity,
        Self::Review,
    ];

    /// Returns the variant name used as discriminator and key prefix.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.schema().name
    }

    /// Selects a variant by its discriminator name.
    ///
    /// Returns `None` for names outside the table. Lookups are
    /// case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Returns the variant's field schema.
    #[must_use]
    pub fn schema(self) -> &'static VariantSchema {
        match self {
            Self::User => &USER,
            Self::Place => &PLACE,
            Self::City => &CITY,
            Self::State => &STATE,
            Self::Amenity => &AMENITY,
            Self::Review => &REVIEW,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
