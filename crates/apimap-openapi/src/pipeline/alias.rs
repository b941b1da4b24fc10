//! Alias resolution and schema retention.
//!
//! Every request/response declaration of an in-scope endpoint contributes
//! to two outputs:
//!
//! - an [`AliasMap`]: the alias table each operation side is rewritten
//!   with, so one endpoint's aliases never leak into another's operation;
//! - a [`RetainedSet`]: the component schemas the document keeps, each
//!   tagged with the alias table its own references are rewritten with.
//!
//! Plain (unaliased) schemas carry an empty table and are retained together
//! with their full plain closure. An aliased clone, and any type on the way
//! from a declaration's primary type to one of its aliased types, is
//! rewritten only with the table of the declaration that produced it.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use apimap_core::{Aliases, EndpointDecl, TypeName};

use super::resolve::closure_of;
use super::scope::Scope;
use crate::registry::SchemaRegistry;
use crate::schema::Schema;
use crate::skeleton::operation_id;

/// Type Name → Alias Name for one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable(BTreeMap<TypeName, TypeName>);

impl AliasTable {
    /// Alias of `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeName> {
        self.0.get(name)
    }

    /// Whether `name` is aliased.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Whether no alias is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(Type Name, Alias Name)` pairs, sorted by Type Name.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeName, &TypeName)> {
        self.0.iter()
    }
}

impl FromIterator<(TypeName, TypeName)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (TypeName, TypeName)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Alias tables of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationAliases {
    /// Applied to the request body.
    pub request: AliasTable,
    /// Applied to every response.
    pub response: AliasTable,
    /// Public name of the request body when the body type itself is aliased.
    pub request_body_alias: Option<TypeName>,
}

/// Per-operation alias tables, keyed by `operationId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    operations: BTreeMap<String, OperationAliases>,
}

impl AliasMap {
    /// Tables for one operation.
    #[must_use]
    pub fn operation(&self, operation_id: &str) -> Option<&OperationAliases> {
        self.operations.get(operation_id)
    }

    /// Every recorded `(Type Name, Alias Name)` pair across operations.
    pub fn pairs(&self) -> impl Iterator<Item = (&TypeName, &TypeName)> {
        self.operations
            .values()
            .flat_map(|op| op.request.iter().chain(op.response.iter()))
    }

    /// Whether no operation declares an alias.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// One retained component schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Retained {
    /// Fragment as found in the registry.
    pub schema: Schema,
    /// Table the fragment's own references are rewritten with.
    pub aliases: AliasTable,
    /// Registry name the fragment was cloned from.
    pub origin: TypeName,
}

/// Component schemas kept for the document, keyed by output name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetainedSet {
    entries: BTreeMap<TypeName, Retained>,
}

impl RetainedSet {
    /// Entry by output name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Retained> {
        self.entries.get(name)
    }

    /// Whether `name` is retained.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Output names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &TypeName> {
        self.entries.keys()
    }

    /// Number of retained schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, consuming the set.
    pub fn into_entries(self) -> impl Iterator<Item = (TypeName, Retained)> {
        self.entries.into_iter()
    }

    /// First writer wins; later writers for the same key are dropped.
    ///
    /// Returns whether the key now holds an entry equivalent to `retained`.
    fn insert(&mut self, key: TypeName, retained: Retained) -> bool {
        match self.entries.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(retained);
                true
            }
            Entry::Occupied(slot) => {
                let same =
                    slot.get().origin == retained.origin && slot.get().aliases == retained.aliases;
                if !same {
                    tracing::debug!(
                        key = %slot.key(),
                        kept = %slot.get().origin,
                        dropped = %retained.origin,
                        "schema name already retained; keeping the first"
                    );
                }
                same
            }
        }
    }

    /// Retain `name` and its full closure without aliases.
    fn insert_plain(&mut self, name: &TypeName, registry: &SchemaRegistry) {
        if !registry.contains(name.as_str()) {
            tracing::debug!(type_name = %name, "referenced type is not declared");
            return;
        }
        for member in closure_of(name, registry) {
            if self.contains(member.as_str()) {
                continue;
            }
            if let Some(schema) = registry.get(member.as_str()) {
                let retained = Retained {
                    schema: schema.clone(),
                    aliases: AliasTable::default(),
                    origin: member.clone(),
                };
                self.insert(member, retained);
            }
        }
    }

    /// Retain the plain closure of every declared name an entry references
    /// (after its own rewrite) that no entry provides yet.
    ///
    /// Needed when an entry written with one table loses its key to an entry
    /// written with another, whose references differ.
    fn close(&mut self, registry: &SchemaRegistry) {
        loop {
            let missing: BTreeSet<TypeName> = self
                .entries
                .values()
                .flat_map(|entry| {
                    entry.schema.references().into_iter().map(|name| {
                        entry.aliases.get(name.as_str()).unwrap_or(name).clone()
                    })
                })
                .filter(|name| !self.contains(name.as_str()) && registry.contains(name.as_str()))
                .collect();
            if missing.is_empty() {
                return;
            }
            for name in &missing {
                tracing::debug!(type_name = %name, "retaining type referenced by a kept schema");
                self.insert_plain(name, registry);
            }
        }
    }
}

/// Output of [`resolve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Per-operation alias tables.
    pub aliases: AliasMap,
    /// Component schemas to keep.
    pub retained: RetainedSet,
}

/// Compute alias tables and the retained schema set for a scope.
///
/// Endpoints are visited in scope order; within an endpoint the response is
/// processed before the request.
#[must_use]
pub fn resolve(scope: &Scope<'_>, registry: &SchemaRegistry) -> Resolution {
    let mut resolution = Resolution::default();

    for (ctrl, ep) in scope.endpoints() {
        let op = resolve_endpoint(ep, registry, &mut resolution.retained);
        let has_aliases =
            !op.request.is_empty() || !op.response.is_empty() || op.request_body_alias.is_some();
        if has_aliases {
            resolution
                .aliases
                .operations
                .insert(operation_id(&ctrl.name, &ep.name), op);
        }
    }
    resolution.retained.close(registry);

    tracing::debug!(
        retained = resolution.retained.len(),
        aliased_operations = resolution.aliases.operations.len(),
        "resolved aliases"
    );
    resolution
}

fn resolve_endpoint(
    ep: &EndpointDecl,
    registry: &SchemaRegistry,
    retained: &mut RetainedSet,
) -> OperationAliases {
    let mut op = OperationAliases::default();

    if let Some(response) = &ep.response {
        op.response = retain_declaration(&response.type_name, &response.aliases, registry, retained);
    }
    if let Some(request) = &ep.request {
        op.request = retain_declaration(&request.type_name, &request.aliases, registry, retained);
        op.request_body_alias = op.request.get(request.type_name.as_str()).cloned();
    }
    op
}

/// Effective alias table of one declaration.
///
/// Drops entries naming undeclared types and entries for types the primary
/// type never reaches, since neither can appear in the document.
fn effective_table(primary: &TypeName, declared: &Aliases, registry: &SchemaRegistry) -> AliasTable {
    let reachable = closure_of(primary, registry);
    declared
        .iter()
        .filter(|(type_name, alias)| {
            if !registry.contains(type_name.as_str()) {
                tracing::debug!(
                    type_name = %type_name,
                    alias = %alias,
                    "alias names an undeclared type; skipping"
                );
                return false;
            }
            if !reachable.contains(*type_name) {
                tracing::debug!(
                    type_name = %type_name,
                    alias = %alias,
                    primary = %primary,
                    "aliased type is not reachable from the declared type; skipping"
                );
                return false;
            }
            true
        })
        .map(|(type_name, alias)| (type_name.clone(), alias.clone()))
        .collect()
}

/// Retain everything one declaration needs and return its effective table.
///
/// Walking from the primary type, an aliased type is cloned under its alias.
/// A type that is not aliased but reaches an aliased one keeps its own name
/// and is rewritten with this table. Everything else is retained plain
/// together with its full closure.
fn retain_declaration(
    primary: &TypeName,
    declared: &Aliases,
    registry: &SchemaRegistry,
    retained: &mut RetainedSet,
) -> AliasTable {
    let table = effective_table(primary, declared, registry);
    if table.is_empty() {
        retained.insert_plain(primary, registry);
        return table;
    }

    let mut visited = BTreeSet::new();
    let mut pending = vec![primary.clone()];
    while let Some(name) = pending.pop() {
        if !visited.insert(name.clone()) {
            continue;
        }
        let Some(fragment) = registry.get(name.as_str()) else {
            continue;
        };

        let key = match table.get(name.as_str()) {
            Some(alias) => alias.clone(),
            None if reaches_aliased(&name, &table, registry) => name.clone(),
            None => {
                retained.insert_plain(&name, registry);
                continue;
            }
        };
        let entry = Retained {
            schema: fragment.clone(),
            aliases: table.clone(),
            origin: name.clone(),
        };
        if retained.insert(key, entry) {
            pending.extend(fragment.references().into_iter().cloned());
        }
    }
    table
}

/// Whether `name` references, at any depth, a type aliased in `table`.
fn reaches_aliased(name: &TypeName, table: &AliasTable, registry: &SchemaRegistry) -> bool {
    closure_of(name, registry)
        .iter()
        .any(|member| table.contains(member.as_str()))
}
