//! Typed schema fragments.
//!
//! A fragment is one of five node kinds. References are leaves that name
//! another schema under `components.schemas` instead of inlining it, so the
//! whole reference graph can be walked with a plain recursive `match`.

use apimap_core::{Primitive, TypeName};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// `$ref` prefix for component schemas.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// A schema fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// `type: object` with ordered properties.
    Object(ObjectSchema),
    /// `type: array` with an item descriptor.
    Array(ArraySchema),
    /// `$ref: '#/components/schemas/<name>'`.
    Reference(TypeName),
    /// Scalar.
    Primitive(PrimitiveSchema),
    /// `allOf` composition; carries documentation next to a reference.
    AllOf(AllOfSchema),
}

/// Object fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Schema description.
    pub description: Option<String>,
    /// Properties in declaration order.
    pub properties: Vec<(String, Schema)>,
    /// Names of required properties.
    pub required: Vec<String>,
}

/// Array fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    /// Schema description.
    pub description: Option<String>,
    /// Item descriptor.
    pub items: Box<Schema>,
    /// Example value.
    pub example: Option<serde_json::Value>,
}

/// Scalar fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSchema {
    /// Scalar kind.
    pub ty: Primitive,
    /// Schema description.
    pub description: Option<String>,
    /// Example value.
    pub example: Option<serde_json::Value>,
}

/// `allOf` fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct AllOfSchema {
    /// Composed fragments.
    pub all_of: Vec<Schema>,
    /// Schema description.
    pub description: Option<String>,
    /// Example value.
    pub example: Option<serde_json::Value>,
}

impl Schema {
    /// Reference to a named component schema.
    #[must_use]
    pub fn reference(name: impl Into<TypeName>) -> Self {
        Self::Reference(name.into())
    }

    /// Undocumented array of `items`.
    #[must_use]
    pub fn array_of(items: Self) -> Self {
        Self::Array(ArraySchema {
            description: None,
            items: Box::new(items),
            example: None,
        })
    }

    /// Undocumented scalar.
    #[must_use]
    pub fn primitive(ty: Primitive) -> Self {
        Self::Primitive(PrimitiveSchema {
            ty,
            description: None,
            example: None,
        })
    }

    /// Scalar carrying an example value.
    #[must_use]
    pub fn primitive_with_example(ty: Primitive, example: serde_json::Value) -> Self {
        Self::Primitive(PrimitiveSchema {
            ty,
            description: None,
            example: Some(example),
        })
    }

    /// Call `f` for every reference in this fragment, at any depth.
    pub fn for_each_reference<'s, F: FnMut(&'s TypeName)>(&'s self, f: &mut F) {
        match self {
            Self::Reference(name) => f(name),
            Self::Array(array) => array.items.for_each_reference(f),
            Self::Object(object) => {
                for (_, prop) in &object.properties {
                    prop.for_each_reference(f);
                }
            }
            Self::AllOf(composed) => {
                for part in &composed.all_of {
                    part.for_each_reference(f);
                }
            }
            Self::Primitive(_) => {}
        }
    }

    /// Mutable counterpart of [`Schema::for_each_reference`].
    pub fn for_each_reference_mut<F: FnMut(&mut TypeName)>(&mut self, f: &mut F) {
        match self {
            Self::Reference(name) => f(name),
            Self::Array(array) => array.items.for_each_reference_mut(f),
            Self::Object(object) => {
                for (_, prop) in &mut object.properties {
                    prop.for_each_reference_mut(f);
                }
            }
            Self::AllOf(composed) => {
                for part in &mut composed.all_of {
                    part.for_each_reference_mut(f);
                }
            }
            Self::Primitive(_) => {}
        }
    }

    /// References in this fragment, in traversal order (duplicates kept).
    #[must_use]
    pub fn references(&self) -> Vec<&TypeName> {
        let mut refs = Vec::new();
        self.for_each_reference(&mut |name| refs.push(name));
        refs
    }

    /// Name of the referenced schema if this node is a reference.
    #[must_use]
    pub fn as_reference(&self) -> Option<&TypeName> {
        match self {
            Self::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Reference to `name`, wrapped in `allOf` when documentation is given.
    ///
    /// Siblings of `$ref` are ignored by `OpenAPI` 3.0 tooling, so the
    /// description and example go next to a single-element `allOf`.
    #[must_use]
    pub fn documented_reference(
        name: impl Into<TypeName>,
        description: Option<String>,
        example: Option<serde_json::Value>,
    ) -> Self {
        let reference = Self::Reference(name.into());
        if description.is_none() && example.is_none() {
            return reference;
        }
        Self::AllOf(AllOfSchema {
            all_of: vec![reference],
            description,
            example,
        })
    }

    /// Property by name if this node is an object.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Object(object) => object
                .properties
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, schema)| schema),
            _ => None,
        }
    }
}

impl ObjectSchema {
    /// Append a property, optionally marking it required.
    #[must_use]
    pub fn property(mut self, name: &str, schema: Schema, required: bool) -> Self {
        self.properties.push((name.to_string(), schema));
        if required {
            self.required.push(name.to_string());
        }
        self
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Self::Object(object)
    }
}

struct Properties<'a>(&'a [(String, Schema)]);

impl Serialize for Properties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::Reference(name) => {
                map.serialize_entry("$ref", &format!("{SCHEMA_REF_PREFIX}{name}"))?;
            }
            Self::Object(object) => {
                map.serialize_entry("type", "object")?;
                if let Some(description) = &object.description {
                    map.serialize_entry("description", description)?;
                }
                map.serialize_entry("properties", &Properties(&object.properties))?;
                if !object.required.is_empty() {
                    map.serialize_entry("required", &object.required)?;
                }
            }
            Self::Array(array) => {
                map.serialize_entry("type", "array")?;
                if let Some(description) = &array.description {
                    map.serialize_entry("description", description)?;
                }
                map.serialize_entry("items", &array.items)?;
                if let Some(example) = &array.example {
                    map.serialize_entry("example", example)?;
                }
            }
            Self::AllOf(composed) => {
                map.serialize_entry("allOf", &composed.all_of)?;
                if let Some(description) = &composed.description {
                    map.serialize_entry("description", description)?;
                }
                if let Some(example) = &composed.example {
                    map.serialize_entry("example", example)?;
                }
            }
            Self::Primitive(scalar) => {
                map.serialize_entry("type", scalar.ty.json_type())?;
                if let Some(format) = scalar.ty.json_format() {
                    map.serialize_entry("format", format)?;
                }
                if let Some(description) = &scalar.description {
                    map.serialize_entry("description", description)?;
                }
                if let Some(example) = &scalar.example {
                    map.serialize_entry("example", example)?;
                }
            }
        }
        map.end()
    }
}
