//! Shared helpers used across pipeline stages.

use std::collections::{BTreeMap, HashMap};

use apimap_core::{ControllerDecl, EndpointDecl, HttpMethod};

use super::scope::Scope;
use crate::document::{Operation, PathItem};
use crate::skeleton::operation_id;

/// Iterate over all operations, calling `f(path, method, operation)`.
pub fn for_each_operation(
    paths: &mut BTreeMap<String, PathItem>,
    mut f: impl FnMut(&str, HttpMethod, &mut Operation),
) {
    for (path, item) in paths.iter_mut() {
        for (method, op) in item.iter_mut() {
            f(path, *method, op);
        }
    }
}

/// In-scope endpoints keyed by `operationId`.
pub fn endpoints_by_operation<'a>(
    scope: &Scope<'a>,
) -> HashMap<String, (&'a ControllerDecl, &'a EndpointDecl)> {
    scope
        .endpoints()
        .map(|(ctrl, ep)| (operation_id(&ctrl.name, &ep.name), (ctrl, ep)))
        .collect()
}
