//! Nested-type resolution: the transitive closure of references.

use std::collections::BTreeSet;

use apimap_core::TypeName;

use crate::registry::SchemaRegistry;
use crate::schema::Schema;

/// Every Type Name reachable from `schema` through references.
///
/// Direct references (fields and array items) are followed into their
/// registry fragments. Each name is expanded once, so cyclic declarations
/// terminate. Names missing from the registry are reported but not
/// expanded.
#[must_use]
pub fn nested_types(schema: &Schema, registry: &SchemaRegistry) -> BTreeSet<TypeName> {
    let mut found = BTreeSet::new();
    collect(schema, registry, &mut found);
    found
}

/// `name` plus everything reachable from its fragment.
///
/// Empty when `name` is not in the registry.
#[must_use]
pub fn closure_of(name: &TypeName, registry: &SchemaRegistry) -> BTreeSet<TypeName> {
    let Some(fragment) = registry.get(name.as_str()) else {
        return BTreeSet::new();
    };
    let mut found = BTreeSet::from([name.clone()]);
    collect(fragment, registry, &mut found);
    found
}

fn collect(schema: &Schema, registry: &SchemaRegistry, found: &mut BTreeSet<TypeName>) {
    schema.for_each_reference(&mut |name: &TypeName| {
        if found.insert(name.clone()) {
            if let Some(nested) = registry.get(name.as_str()) {
                collect(nested, registry, found);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use apimap_core::{DtoDecl, FieldDecl, Primitive};
    use pretty_assertions::assert_eq;

    use super::*;

    fn names(set: &BTreeSet<TypeName>) -> Vec<&str> {
        set.iter().map(TypeName::as_str).collect()
    }

    #[test]
    fn follows_fields_and_array_items() {
        let registry = SchemaRegistry::build(&[
            DtoDecl::new("Order")
                .field(FieldDecl::new("customer", "Customer"))
                .field(FieldDecl::new("lines", "OrderLine").array()),
            DtoDecl::new("Customer").field(FieldDecl::new("address", "Address")),
            DtoDecl::new("OrderLine").field(FieldDecl::new("qty", Primitive::Integer)),
            DtoDecl::new("Address").field(FieldDecl::new("street", Primitive::String)),
            DtoDecl::new("Unrelated"),
        ]);
        let order = registry.get("Order").unwrap();
        assert_eq!(
            names(&nested_types(order, &registry)),
            vec!["Address", "Customer", "OrderLine"]
        );
        assert_eq!(
            names(&closure_of(&TypeName::new("Customer"), &registry)),
            vec!["Address", "Customer"]
        );
    }

    #[test]
    fn cycles_terminate() {
        let registry = SchemaRegistry::build(&[
            DtoDecl::new("Node")
                .field(FieldDecl::new("parent", "Node").optional())
                .field(FieldDecl::new("children", "Node").array())
                .field(FieldDecl::new("meta", "Meta")),
            DtoDecl::new("Meta").field(FieldDecl::new("owner", "Node")),
        ]);
        let node = registry.get("Node").unwrap();
        assert_eq!(names(&nested_types(node, &registry)), vec!["Meta", "Node"]);
    }

    #[test]
    fn unknown_names_reported_not_expanded() {
        let registry = SchemaRegistry::build(&[
            DtoDecl::new("Order").field(FieldDecl::new("customer", "Customer")),
        ]);
        let order = registry.get("Order").unwrap();
        assert_eq!(names(&nested_types(order, &registry)), vec!["Customer"]);
        assert!(closure_of(&TypeName::new("Customer"), &registry).is_empty());
    }

    #[test]
    fn primitive_fragment_has_no_nested_types() {
        let registry = SchemaRegistry::default();
        assert!(nested_types(&Schema::primitive(Primitive::String), &registry).is_empty());
    }
}
