//! Raw schema registry: one schema fragment per declared data shape.

use std::collections::BTreeMap;

use apimap_core::{DeclarationStore, DtoDecl, FieldDecl, FieldType, TypeName};

use crate::schema::{ArraySchema, ObjectSchema, PrimitiveSchema, Schema};

/// Type Name → schema fragment, built from every declared DTO.
///
/// Nested DTOs appear as [`Schema::Reference`] nodes rather than inline
/// copies, so the registry is the single source for reference resolution.
/// Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    schemas: BTreeMap<TypeName, Schema>,
}

impl SchemaRegistry {
    /// Build fragments for the given declarations.
    #[must_use]
    pub fn build(dtos: &[DtoDecl]) -> Self {
        let schemas = dtos
            .iter()
            .map(|dto| (dto.name.clone(), dto_schema(dto)))
            .collect();
        Self { schemas }
    }

    /// Build fragments for every DTO in the store.
    #[must_use]
    pub fn from_store(store: &DeclarationStore) -> Self {
        Self::build(store.dtos())
    }

    /// Fragment by Type Name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Whether a fragment exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// All fragments, sorted by Type Name.
    #[must_use]
    pub fn schemas(&self) -> &BTreeMap<TypeName, Schema> {
        &self.schemas
    }

    /// Number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no DTOs were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn dto_schema(dto: &DtoDecl) -> Schema {
    let mut object = ObjectSchema {
        description: dto.description.clone(),
        ..ObjectSchema::default()
    };
    for field in &dto.fields {
        object
            .properties
            .push((field.name.clone(), field_schema(field)));
        if !field.optional {
            object.required.push(field.name.clone());
        }
    }
    Schema::Object(object)
}

fn field_schema(field: &FieldDecl) -> Schema {
    if field.array {
        return Schema::Array(ArraySchema {
            description: field.description.clone(),
            items: Box::new(base_schema(&field.ty)),
            example: field.example.clone(),
        });
    }
    match &field.ty {
        FieldType::Primitive(ty) => Schema::Primitive(PrimitiveSchema {
            ty: *ty,
            description: field.description.clone(),
            example: field.example.clone(),
        }),
        FieldType::Dto(name) => Schema::documented_reference(
            name.clone(),
            field.description.clone(),
            field.example.clone(),
        ),
    }
}

fn base_schema(ty: &FieldType) -> Schema {
    match ty {
        FieldType::Primitive(ty) => Schema::primitive(*ty),
        FieldType::Dto(name) => Schema::Reference(name.clone()),
    }
}
