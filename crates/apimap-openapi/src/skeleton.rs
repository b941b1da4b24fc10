//! Route-derived document skeleton.
//!
//! The skeleton holds every in-scope operation with its path, parameters,
//! and body/response references, plus a schema table. It knows nothing
//! about aliases; the pipeline rewrites its references and discards its
//! schema table.

use std::collections::BTreeMap;

use apimap_core::{ControllerDecl, EndpointDecl, Primitive, TypeName};

use crate::document::{
    json_content, DocumentInfo, Operation, Parameter, ParameterLocation, PathItem, RequestBody,
    Response,
};
use crate::pipeline::Scope;
use crate::registry::SchemaRegistry;
use crate::schema::Schema;

/// Description of the success response before any status override.
pub const SUCCESS_DESCRIPTION: &str = "Successful response";

/// Paths plus schemas produced for a scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    /// Operations by path.
    pub paths: BTreeMap<String, PathItem>,
    /// Schema table of the generator. Never used for the final document.
    pub schemas: BTreeMap<TypeName, Schema>,
}

/// Produces paths, operations, and a schema table for in-scope controllers.
pub trait SkeletonGenerator: std::fmt::Debug + Send + Sync {
    /// Build the skeleton for `scope`.
    fn generate(
        &self,
        scope: &Scope<'_>,
        info: &DocumentInfo,
        registry: &SchemaRegistry,
    ) -> Skeleton;
}

/// Default generator: one operation per declared endpoint, routed at
/// controller prefix + endpoint path.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSkeleton;

impl SkeletonGenerator for RouteSkeleton {
    fn generate(
        &self,
        scope: &Scope<'_>,
        _info: &DocumentInfo,
        registry: &SchemaRegistry,
    ) -> Skeleton {
        let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();

        for (ctrl, ep) in scope.endpoints() {
            let path = openapi_path(&ctrl.route, &ep.path);
            let op = skeleton_operation(ctrl, ep, &path);
            if let Some(previous) = paths.entry(path.clone()).or_default().insert(ep.method, op) {
                tracing::warn!(
                    path = %path,
                    method = %ep.method,
                    replaced = %previous.operation_id,
                    "two endpoints share a route; keeping the later one"
                );
            }
        }

        Skeleton {
            paths,
            schemas: registry.schemas().clone(),
        }
    }
}

fn skeleton_operation(ctrl: &ControllerDecl, ep: &EndpointDecl, path: &str) -> Operation {
    let mut op = Operation::new(operation_id(&ctrl.name, &ep.name));
    op.summary = Some(default_summary(&ep.name));
    op.tags = vec![default_tag(&ctrl.name)];
    op.parameters = path_params(path)
        .into_iter()
        .map(|name| Parameter {
            name,
            location: ParameterLocation::Path,
            required: true,
            schema: Schema::primitive(Primitive::String),
        })
        .collect();

    op.request_body = ep.request.as_ref().map(|body| RequestBody {
        description: Some(body.type_name.to_string()),
        required: true,
        content: json_content(Schema::Reference(body.type_name.clone())),
    });

    let success = match &ep.response {
        Some(response) => {
            let reference = Schema::Reference(response.type_name.clone());
            let schema = if response.array {
                Schema::array_of(reference)
            } else {
                reference
            };
            Response::json(SUCCESS_DESCRIPTION, schema)
        }
        None => Response::empty(SUCCESS_DESCRIPTION),
    };
    op.responses.insert("200".to_string(), success);
    op
}

/// `<Controller>.<method>`.
#[must_use]
pub fn operation_id(controller: &str, method: &str) -> String {
    format!("{controller}.{method}")
}

/// Join a controller prefix and endpoint route into an `OpenAPI` path.
///
/// `:id` segments become `{id}`, repeated slashes collapse, and a trailing
/// slash is dropped except for the root path.
#[must_use]
pub fn openapi_path(prefix: &str, route: &str) -> String {
    let segments: Vec<String> = prefix
        .split('/')
        .chain(route.split('/'))
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix(':') {
            Some(param) => format!("{{{param}}}"),
            None => s.to_string(),
        })
        .collect();
    format!("/{}", segments.join("/"))
}

/// Names of `{templated}` segments, in order.
#[must_use]
pub fn path_params(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|s| s.strip_prefix('{')?.strip_suffix('}'))
        .map(ToString::to_string)
        .collect()
}

/// Tag derived from a controller identity:
/// `ThingTypesController` → `Thing Types`.
#[must_use]
pub fn default_tag(controller: &str) -> String {
    let base = controller.strip_suffix("Controller").unwrap_or(controller);
    let base = if base.is_empty() { controller } else { base };
    split_camel(base).join(" ")
}

/// Summary derived from a method name: `getAllUsers` → `Get all users`.
#[must_use]
pub fn default_summary(method: &str) -> String {
    let words = split_camel(method);
    let mut summary = String::with_capacity(method.len() + words.len());
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                summary.extend(first.to_uppercase());
                summary.push_str(chars.as_str());
            }
        } else {
            summary.push(' ');
            summary.push_str(&word.to_lowercase());
        }
    }
    summary
}

/// Split on lower→upper boundaries: `getHTTPStatus` → `get`, `HTTPStatus`.
fn split_camel(s: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut prev_lower = false;
    for (i, c) in s.char_indices() {
        if c.is_uppercase() && prev_lower {
            words.push(&s[start..i]);
            start = i;
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    if start < s.len() {
        words.push(&s[start..]);
    }
    words
}
