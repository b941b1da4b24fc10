//! Document assembly: skeleton paths, map info, controller tags,
//! endpoint overrides, and the retained component schemas.

use std::collections::BTreeMap;

use apimap_core::TypeName;

use super::helpers::{endpoints_by_operation, for_each_operation};
use super::scope::Scope;
use super::{responses, security, GenerateConfig};
use crate::document::{Components, Document, DocumentInfo, Tag};
use crate::schema::Schema;
use crate::skeleton::{default_tag, operation_id, Skeleton};

/// Build the final document.
///
/// `schemas` replaces the skeleton's schema table wholesale, so only
/// retained (and rewritten) schemas reach `components.schemas`.
#[must_use]
pub fn assemble(
    skeleton: Skeleton,
    scope: &Scope<'_>,
    info: &DocumentInfo,
    schemas: BTreeMap<TypeName, Schema>,
    config: &GenerateConfig<'_>,
) -> Document {
    let mut doc = Document {
        openapi: config.openapi_version.clone(),
        info: info.clone(),
        tags: Vec::new(),
        paths: skeleton.paths,
        components: Components {
            schemas,
            security_schemes: BTreeMap::new(),
        },
    };

    apply_controller_tags(&mut doc, scope);
    apply_endpoint_docs(&mut doc, scope);
    responses::apply_default_statuses(&mut doc, scope);
    if config.standard_responses {
        responses::add_standard_responses(&mut doc, scope);
    }
    if config.add_security {
        security::apply_security(&mut doc, scope, config.bearer_description.as_deref());
    }
    doc
}

/// Add tag descriptions and retag operations for controllers that declare
/// tag metadata.
///
/// Tag names are the declared tags, else the name derived from the
/// controller identity. A later controller describing the same tag
/// overwrites its description.
pub fn apply_controller_tags(doc: &mut Document, scope: &Scope<'_>) {
    for ctrl in scope.controllers() {
        if !ctrl.has_tag_metadata() {
            continue;
        }
        let names = if ctrl.tags.is_empty() {
            vec![default_tag(&ctrl.name)]
        } else {
            ctrl.tags.clone()
        };

        for name in &names {
            match doc.tags.iter_mut().find(|tag| tag.name == *name) {
                Some(tag) => {
                    if ctrl.description.is_some() {
                        tag.description.clone_from(&ctrl.description);
                    }
                }
                None => doc.tags.push(Tag {
                    name: name.clone(),
                    description: ctrl.description.clone(),
                }),
            }
        }

        let prefix = operation_id(&ctrl.name, "");
        for_each_operation(&mut doc.paths, |_path, _method, op| {
            if op.operation_id.starts_with(&prefix) {
                op.tags.clone_from(&names);
            }
        });
    }
}

/// Endpoint summary/description overrides.
pub fn apply_endpoint_docs(doc: &mut Document, scope: &Scope<'_>) {
    let endpoints = endpoints_by_operation(scope);

    for_each_operation(&mut doc.paths, |_path, _method, op| {
        let Some((_, ep)) = endpoints.get(&op.operation_id) else {
            return;
        };
        if ep.summary.is_some() {
            op.summary.clone_from(&ep.summary);
        }
        if ep.description.is_some() {
            op.description.clone_from(&ep.description);
        }
    });
}
