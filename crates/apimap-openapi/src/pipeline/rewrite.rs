//! Reference rewriting.
//!
//! Operations are rewritten with their own alias tables, retained clones
//! with the table of the declaration that produced them. A reference is
//! replaced only when its name is a key of the applicable table, so running
//! any of these twice changes nothing.

use std::collections::BTreeMap;

use apimap_core::TypeName;

use super::alias::{AliasMap, AliasTable, RetainedSet};
use super::helpers::for_each_operation;
use crate::document::PathItem;
use crate::schema::Schema;

/// Replace every reference in `schema` that `table` aliases.
pub fn rewrite_schema(schema: &mut Schema, table: &AliasTable) {
    if table.is_empty() {
        return;
    }
    schema.for_each_reference_mut(&mut |name: &mut TypeName| {
        if let Some(alias) = table.get(name.as_str()) {
            *name = alias.clone();
        }
    });
}

/// Rewrite request and response schemas of every aliased operation.
pub fn rewrite_operations(paths: &mut BTreeMap<String, PathItem>, aliases: &AliasMap) {
    for_each_operation(paths, |_, _, op| {
        let Some(tables) = aliases.operation(&op.operation_id) else {
            return;
        };
        for schema in op.request_schemas_mut() {
            rewrite_schema(schema, &tables.request);
        }
        for schema in op.response_schemas_mut() {
            rewrite_schema(schema, &tables.response);
        }
    });
}

/// Set `requestBody.description` to the body's public name where the body
/// type itself is aliased.
pub fn annotate_request_aliases(paths: &mut BTreeMap<String, PathItem>, aliases: &AliasMap) {
    for_each_operation(paths, |_, _, op| {
        let Some(alias) = aliases
            .operation(&op.operation_id)
            .and_then(|tables| tables.request_body_alias.as_ref())
        else {
            return;
        };
        if let Some(body) = op.request_body.as_mut() {
            body.description = Some(alias.to_string());
        }
    });
}

/// Final component schemas: each retained fragment rewritten with its own
/// table.
#[must_use]
pub fn rewrite_retained(retained: RetainedSet) -> BTreeMap<TypeName, Schema> {
    retained
        .into_entries()
        .map(|(name, mut entry)| {
            rewrite_schema(&mut entry.schema, &entry.aliases);
            (name, entry.schema)
        })
        .collect()
}
