//! Variant field schemas.
//!
//! Each entity variant declares its fields once, as a static table of
//! [`FieldSpec`] entries. Defaults live on the schema, not on instances:
//! an entity materializes a field into its own attribute map only when the
//! field is explicitly assigned, and reads of unassigned fields fall back
//! to the schema default for the field's type.

use serde_json::Value;
use std::fmt;

/// Semantic type of a variant field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// UTF-8 text. Defaults to the empty string.
    Text,
    /// Integer. Defaults to zero.
    Integer,
    /// Floating-point number. Defaults to zero.
    Float,
    /// Ordered sequence of text. Defaults to the empty sequence.
    TextList,
}

impl FieldType {
    /// Returns the schema default for this type.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Text => Value::String(String::new()),
            Self::Integer => Value::from(0),
            Self::Float => Value::from(0.0),
            Self::TextList => Value::Array(Vec::new()),
        }
    }

    /// Checks whether `value` is acceptable for this type.
    ///
    /// Integers are not acceptable where text is expected and vice versa;
    /// floats accept any number.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::TextList => "text list",
        };
        write!(f, "{name}")
    }
}

/// One named field in a variant schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Field name.
    pub name: &'static str,
    /// Semantic type, which also determines the default value.
    pub ty: FieldType,
}

impl FieldSpec {
    /// Creates a field spec.
    #[must_use]
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// The static field table for one entity variant.
///
/// Schemas are consulted only by name; the engine treats them as opaque
/// registries and never enumerates them during persistence.
#[derive(Debug)]
pub struct VariantSchema {
    /// Variant name, used as the discriminator and the composite-key prefix.
    pub name: &'static str,
    /// Declared fields.
    pub fields: &'static [FieldSpec],
}

impl VariantSchema {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_per_type() {
        assert_eq!(FieldType::Text.default_value(), json!(""));
        assert_eq!(FieldType::Integer.default_value(), json!(0));
        assert_eq!(FieldType::Float.default_value(), json!(0.0));
        assert_eq!(FieldType::TextList.default_value(), json!([]));
    }

    #[test]
    fn text_matches() {
        assert!(FieldType::Text.matches(&json!("hello")));
        assert!(!FieldType::Text.matches(&json!(3)));
        assert!(!FieldType::Text.matches(&json!(null)));
    }

    #[test]
    fn integer_rejects_float() {
        assert!(FieldType::Integer.matches(&json!(42)));
        assert!(!FieldType::Integer.matches(&json!(1.5)));
        assert!(!FieldType::Integer.matches(&json!("42")));
    }

    #[test]
    fn float_accepts_any_number() {
        assert!(FieldType::Float.matches(&json!(37.77)));
        assert!(FieldType::Float.matches(&json!(0)));
        assert!(!FieldType::Float.matches(&json!("37.77")));
    }

    #[test]
    fn text_list_is_homogeneous() {
        assert!(FieldType::TextList.matches(&json!([])));
        assert!(FieldType::TextList.matches(&json!(["a", "b"])));
        assert!(!FieldType::TextList.matches(&json!(["a", 1])));
        assert!(!FieldType::TextList.matches(&json!("a")));
    }

    #[test]
    fn schema_field_lookup() {
        static FIELDS: [FieldSpec; 2] = [
            FieldSpec::new("name", FieldType::Text),
            FieldSpec::new("size", FieldType::Integer),
        ];
        let schema = VariantSchema {
            name: "Test",
            fields: &FIELDS,
        };

        assert_eq!(schema.field("size").map(|s| s.ty), Some(FieldType::Integer));
        assert!(schema.field("missing").is_none());
    }
}
