//! Type names and declared field types.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a declared data shape.
///
/// Alias names share the same namespace (they become keys under
/// `components.schemas`), so they are represented by this type too.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Wrap a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Built-in scalar field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `type: string`
    String,
    /// `type: integer`
    Integer,
    /// `type: number`
    Number,
    /// `type: boolean`
    Boolean,
    /// `type: string, format: date-time`
    DateTime,
}

impl Primitive {
    /// Parse a declared type string; `None` means the string names a DTO.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "date-time" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Declared spelling, the inverse of [`Primitive::parse`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::DateTime => "date-time",
        }
    }

    /// JSON Schema `type` keyword value.
    #[must_use]
    pub fn json_type(self) -> &'static str {
        match self {
            Self::String | Self::DateTime => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// JSON Schema `format` keyword value, if any.
    #[must_use]
    pub fn json_format(self) -> Option<&'static str> {
        match self {
            Self::DateTime => Some("date-time"),
            _ => None,
        }
    }
}

/// The declared type of a DTO field: a scalar or another DTO.
///
/// Declared as a single string in YAML. Any name that is not a known
/// [`Primitive`] is treated as a DTO Type Name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Scalar field.
    Primitive(Primitive),
    /// Nested DTO, rendered as a schema reference.
    Dto(TypeName),
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match Primitive::parse(&s) {
            Some(p) => Self::Primitive(p),
            None => Self::Dto(TypeName(s)),
        }
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Primitive> for FieldType {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        match ty {
            FieldType::Primitive(p) => p.as_str().to_string(),
            FieldType::Dto(name) => name.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn primitive_names_parse() {
        assert_eq!(FieldType::from("integer"), FieldType::Primitive(Primitive::Integer));
        assert_eq!(
            FieldType::from("date-time"),
            FieldType::Primitive(Primitive::DateTime)
        );
    }

    #[test]
    fn unknown_names_are_dtos() {
        assert_eq!(
            FieldType::from("Address"),
            FieldType::Dto(TypeName::new("Address"))
        );
        // Case matters: `String` is a DTO name, not the primitive.
        assert_eq!(
            FieldType::from("String"),
            FieldType::Dto(TypeName::new("String"))
        );
    }

    #[test]
    fn date_time_maps_to_string_format() {
        assert_eq!(Primitive::DateTime.json_type(), "string");
        assert_eq!(Primitive::DateTime.json_format(), Some("date-time"));
        assert_eq!(Primitive::Boolean.json_format(), None);
    }

    #[test]
    fn type_name_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(TypeName::new("User"), 1);
        assert_eq!(map.get("User"), Some(&1));
    }

    #[test]
    fn field_type_yaml_round_trip_through_string() {
        let ty: FieldType = serde_yaml_ng::from_str("Address").unwrap();
        assert_eq!(ty, FieldType::Dto(TypeName::new("Address")));
        let out = serde_yaml_ng::to_string(&FieldType::Primitive(Primitive::Number)).unwrap();
        assert_eq!(out.trim(), "number");
    }
}
