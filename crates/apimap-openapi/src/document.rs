//! Typed `OpenAPI` 3.0 document model.
//!
//! Only the subset the generator emits is modelled. Maps are `BTreeMap`s so
//! serialization is deterministic for identical inputs.

use std::collections::{BTreeMap, BTreeSet};

use apimap_core::{HttpMethod, TypeName};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::Schema;

/// `OpenAPI` version written when nothing else is configured.
pub const DEFAULT_OPENAPI_VERSION: &str = "3.0.3";

/// Media type used for every JSON body.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Operations of one path, keyed by HTTP method.
pub type PathItem = BTreeMap<HttpMethod, Operation>;

/// Security requirement object: scheme name → scopes.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// A complete, self-contained document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// `OpenAPI` version string.
    pub openapi: String,
    /// Title, version, description.
    pub info: DocumentInfo,
    /// Tag descriptions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Operations by path.
    pub paths: BTreeMap<String, PathItem>,
    /// Component schemas and security schemes.
    pub components: Components,
}

/// `info` object. Also the `info` section of a map configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document title.
    pub title: String,
    /// API version.
    #[serde(default)]
    pub version: String,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tag with optional description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Tag description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `components` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Named schemas. Keys are Type Names or Alias Names.
    pub schemas: BTreeMap<TypeName, Schema>,
    /// Security schemes by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
}

/// One operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// `<Controller>.<method>`.
    pub operation_id: String,
    /// Short summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Long description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tag names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Path and query parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses by status code.
    pub responses: BTreeMap<String, Response>,
    /// `None` inherits the global requirement; `Some(vec![])` marks the
    /// operation public.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

/// Where a parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Templated path segment.
    Path,
    /// Query string.
    Query,
}

/// Operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Path parameters are always required.
    pub required: bool,
    /// Value schema.
    pub schema: Schema,
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    /// Body description. Holds the public type name of the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether a body must be sent.
    pub required: bool,
    /// Body by media type.
    pub content: BTreeMap<String, MediaType>,
}

/// Response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Response description.
    pub description: String,
    /// Body by media type; empty for bodiless responses.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,
}

/// Media type object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaType {
    /// Body schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Security scheme object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    /// Scheme kind (`http`).
    #[serde(rename = "type")]
    pub kind: String,
    /// HTTP auth scheme (`bearer`).
    pub scheme: String,
    /// Token format hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    /// Description shown next to the authorize button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `content` map holding a single JSON body.
#[must_use]
pub fn json_content(schema: Schema) -> BTreeMap<String, MediaType> {
    BTreeMap::from([(
        JSON_MEDIA_TYPE.to_string(),
        MediaType {
            schema: Some(schema),
        },
    )])
}

impl Response {
    /// Bodiless response.
    #[must_use]
    pub fn empty(description: &str) -> Self {
        Self {
            description: description.to_string(),
            content: BTreeMap::new(),
        }
    }

    /// Response with a JSON body.
    #[must_use]
    pub fn json(description: &str, schema: Schema) -> Self {
        Self {
            description: description.to_string(),
            content: json_content(schema),
        }
    }
}

impl Operation {
    /// An operation with only an id and no responses yet.
    #[must_use]
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            summary: None,
            description: None,
            tags: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: BTreeMap::new(),
            security: None,
        }
    }

    /// Every schema inside the operation.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        let params = self.parameters.iter().map(|p| &p.schema);
        let request = self
            .request_body
            .iter()
            .flat_map(|body| body.content.values())
            .filter_map(|media| media.schema.as_ref());
        let responses = self
            .responses
            .values()
            .flat_map(|r| r.content.values())
            .filter_map(|media| media.schema.as_ref());
        params.chain(request).chain(responses)
    }

    /// Schemas of the request body.
    pub fn request_schemas_mut(&mut self) -> impl Iterator<Item = &mut Schema> {
        self.request_body
            .iter_mut()
            .flat_map(|body| body.content.values_mut())
            .filter_map(|media| media.schema.as_mut())
    }

    /// Schemas of every response.
    pub fn response_schemas_mut(&mut self) -> impl Iterator<Item = &mut Schema> {
        self.responses
            .values_mut()
            .flat_map(|r| r.content.values_mut())
            .filter_map(|media| media.schema.as_mut())
    }
}

impl Document {
    /// Operation by path and method.
    #[must_use]
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(path)?.get(&method)
    }

    /// Operation by `operationId`.
    #[must_use]
    pub fn operation_by_id(&self, operation_id: &str) -> Option<&Operation> {
        self.operations().find(|op| op.operation_id == operation_id)
    }

    /// All operations in path, then method order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.paths.values().flat_map(BTreeMap::values)
    }

    /// Every Type Name referenced anywhere in the document.
    #[must_use]
    pub fn references(&self) -> BTreeSet<TypeName> {
        let mut refs = BTreeSet::new();
        let mut add = |name: &TypeName| {
            refs.insert(name.clone());
        };
        for op in self.operations() {
            for schema in op.schemas() {
                schema.for_each_reference(&mut add);
            }
        }
        for schema in self.components.schemas.values() {
            schema.for_each_reference(&mut add);
        }
        refs
    }

    /// References with no matching entry in `components.schemas`.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<TypeName> {
        self.references()
            .into_iter()
            .filter(|name| !self.components.schemas.contains_key(name))
            .collect()
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
