//! Data-shape (DTO) declarations.

use serde::Deserialize;

use crate::name::{FieldType, TypeName};

/// One declared data shape.
///
/// ```yaml
/// name: User
/// description: A registered user.
/// fields:
///   - name: id
///     type: integer
///   - name: address
///     type: Address
///     optional: true
///   - name: roles
///     type: string
///     array: true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DtoDecl {
    /// Type Name (registry and reference key).
    pub name: TypeName,
    /// Human-readable description for the schema.
    #[serde(default)]
    pub description: Option<String>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl DtoDecl {
    /// Start a declaration with no fields.
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the schema description.
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// DTO Type Names referenced directly by this declaration's fields.
    pub fn dto_dependencies(&self) -> impl Iterator<Item = &TypeName> {
        self.fields.iter().filter_map(|f| match &f.ty {
            FieldType::Dto(name) => Some(name),
            FieldType::Primitive(_) => None,
        })
    }
}

/// One field of a [`DtoDecl`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDecl {
    /// Property name as it appears on the wire.
    pub name: String,
    /// Scalar type or nested DTO name.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// `true` for "array of `ty`".
    #[serde(default)]
    pub array: bool,
    /// Optional fields are left out of the schema's `required` list.
    #[serde(default)]
    pub optional: bool,
    /// Property description.
    #[serde(default)]
    pub description: Option<String>,
    /// Example value shown in generated docs.
    #[serde(default)]
    pub example: Option<serde_json::Value>,
}

impl FieldDecl {
    /// A required, non-array field.
    #[must_use]
    pub fn new(name: &str, ty: impl Into<FieldType>) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.into(),
            array: false,
            optional: false,
            description: None,
            example: None,
        }
    }

    /// Mark the field as an array of its declared type.
    #[must_use]
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Mark the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set the property description.
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the example value.
    #[must_use]
    pub fn example(mut self, example: serde_json::Value) -> Self {
        self.example = Some(example);
        self
    }
}
