//! Controller and endpoint metadata.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::TypeName;

/// Alias declaration: Type Name → public Alias Name.
pub type Aliases = BTreeMap<TypeName, TypeName>;

/// HTTP methods an endpoint can be routed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
}

impl HttpMethod {
    /// Lowercase name, as used for `OpenAPI` path-item keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared request body type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodyDecl {
    /// DTO Type Name of the body.
    #[serde(rename = "type")]
    pub type_name: TypeName,
    /// Types to expose under different public names for this endpoint.
    #[serde(default)]
    pub aliases: Aliases,
}

impl BodyDecl {
    /// A body of the given type with no aliases.
    #[must_use]
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            aliases: Aliases::new(),
        }
    }

    /// Add an alias pair.
    #[must_use]
    pub fn alias(mut self, type_name: impl Into<TypeName>, alias: impl Into<TypeName>) -> Self {
        self.aliases.insert(type_name.into(), alias.into());
        self
    }
}

/// Declared response type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseDecl {
    /// DTO Type Name of the response.
    #[serde(rename = "type")]
    pub type_name: TypeName,
    /// `true` when the endpoint returns an array of `type_name`.
    #[serde(default)]
    pub array: bool,
    /// Types to expose under different public names for this endpoint.
    #[serde(default)]
    pub aliases: Aliases,
}

impl ResponseDecl {
    /// A single-object response with no aliases.
    #[must_use]
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            array: false,
            aliases: Aliases::new(),
        }
    }

    /// Mark the response as an array of the declared type.
    #[must_use]
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Add an alias pair.
    #[must_use]
    pub fn alias(mut self, type_name: impl Into<TypeName>, alias: impl Into<TypeName>) -> Self {
        self.aliases.insert(type_name.into(), alias.into());
        self
    }
}

/// Authentication requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityDecl {
    /// Bearer (JWT) token required.
    Bearer,
    /// No authentication, even inside an authenticated controller.
    Public,
}

/// Success status override for an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultStatus {
    /// HTTP status code (e.g. `201`).
    pub code: u16,
    /// Response description.
    pub description: String,
}

impl DefaultStatus {
    /// Build a status override.
    #[must_use]
    pub fn new(code: u16, description: &str) -> Self {
        Self {
            code,
            description: description.to_string(),
        }
    }
}

/// Reusable error/empty responses that endpoints can attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum StandardResponse {
    /// `500` with an `InternalServerError` body.
    #[serde(rename = "internal_server_error_500")]
    InternalServerError500,
    /// `204` without a body.
    #[serde(rename = "no_content_204")]
    NoContent204,
    /// `404` with a `NotFound` body.
    #[serde(rename = "not_found_404")]
    NotFound404,
    /// `401` with a `NotAuthorised` body.
    #[serde(rename = "not_authorised_401")]
    NotAuthorised401,
    /// `422` with a `NotProcessable` body.
    #[serde(rename = "not_processable_422")]
    NotProcessable422,
    /// `422` listing the offending ids.
    #[serde(rename = "not_processable_422_invalid_ids")]
    NotProcessable422InvalidIds,
    /// `422` for a facility mismatch.
    #[serde(rename = "not_processable_422_incorrect_facility")]
    NotProcessable422IncorrectFacility,
}

impl StandardResponse {
    /// HTTP status code.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            Self::InternalServerError500 => 500,
            Self::NoContent204 => 204,
            Self::NotFound404 => 404,
            Self::NotAuthorised401 => 401,
            Self::NotProcessable422
            | Self::NotProcessable422InvalidIds
            | Self::NotProcessable422IncorrectFacility => 422,
        }
    }

    /// Response description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::InternalServerError500 => "Internal server error",
            Self::NoContent204 => "No content",
            Self::NotFound404 => "Resource not found",
            Self::NotAuthorised401 => "Not authorised",
            Self::NotProcessable422
            | Self::NotProcessable422InvalidIds
            | Self::NotProcessable422IncorrectFacility => "Not processable",
        }
    }

    /// Media type of the body.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        "application/json"
    }

    /// Name of the built-in body shape, `None` for bodiless responses.
    #[must_use]
    pub fn schema_name(self) -> Option<&'static str> {
        match self {
            Self::InternalServerError500 => Some("InternalServerError"),
            Self::NoContent204 => None,
            Self::NotFound404 => Some("NotFound"),
            Self::NotAuthorised401 => Some("NotAuthorised"),
            Self::NotProcessable422 => Some("NotProcessable"),
            Self::NotProcessable422InvalidIds => Some("NotProcessableIds"),
            Self::NotProcessable422IncorrectFacility => Some("NotProcessableFacility"),
        }
    }
}

/// Documentation metadata for one controller method.
///
/// ```yaml
/// name: getAllUsers
/// method: get
/// path: /
/// summary: List users
/// response:
///   type: GetUsersDtoRes
///   array: true
///   aliases:
///     GetUsersDtoRes: UsersListItem
/// responses: [not_authorised_401]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EndpointDecl {
    /// Method name on the controller; combined into `<Controller>.<name>`.
    pub name: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Route relative to the controller prefix (`/:id` or `/{id}`).
    #[serde(default)]
    pub path: String,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Request body type.
    #[serde(default)]
    pub request: Option<BodyDecl>,
    /// Response type.
    #[serde(default)]
    pub response: Option<ResponseDecl>,
    /// Per-endpoint security override.
    #[serde(default)]
    pub security: Option<SecurityDecl>,
    /// Success status override.
    #[serde(default)]
    pub default_status: Option<DefaultStatus>,
    /// Additional standard responses.
    #[serde(default)]
    pub responses: Vec<StandardResponse>,
}

impl EndpointDecl {
    /// An endpoint with no documentation metadata beyond its route.
    #[must_use]
    pub fn new(name: &str, method: HttpMethod, path: &str) -> Self {
        Self {
            name: name.to_string(),
            method,
            path: path.to_string(),
            summary: None,
            description: None,
            request: None,
            response: None,
            security: None,
            default_status: None,
            responses: Vec::new(),
        }
    }

    /// Set the summary.
    #[must_use]
    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn request(mut self, body: BodyDecl) -> Self {
        self.request = Some(body);
        self
    }

    /// Set the response.
    #[must_use]
    pub fn response(mut self, response: ResponseDecl) -> Self {
        self.response = Some(response);
        self
    }

    /// Override security for this endpoint.
    #[must_use]
    pub fn security(mut self, security: SecurityDecl) -> Self {
        self.security = Some(security);
        self
    }

    /// Override the success status.
    #[must_use]
    pub fn default_status(mut self, status: DefaultStatus) -> Self {
        self.default_status = Some(status);
        self
    }

    /// Attach a standard response.
    #[must_use]
    pub fn with_response(mut self, response: StandardResponse) -> Self {
        self.responses.push(response);
        self
    }
}

/// Documentation metadata for one controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControllerDecl {
    /// Controller identity (e.g. `UsersController`).
    pub name: String,
    /// Route prefix shared by all endpoints (e.g. `/users`).
    #[serde(default)]
    pub route: String,
    /// Tag description.
    #[serde(default)]
    pub description: Option<String>,
    /// Tag names; empty means "derive from the controller name".
    #[serde(default)]
    pub tags: Vec<String>,
    /// Security applied to every endpoint unless overridden.
    #[serde(default)]
    pub security: Option<SecurityDecl>,
    /// Endpoints in declaration order.
    #[serde(default)]
    pub endpoints: Vec<EndpointDecl>,
}

impl ControllerDecl {
    /// A controller with no endpoints.
    #[must_use]
    pub fn new(name: &str, route: &str) -> Self {
        Self {
            name: name.to_string(),
            route: route.to_string(),
            description: None,
            tags: Vec::new(),
            security: None,
            endpoints: Vec::new(),
        }
    }

    /// Set the tag description.
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Add a tag name.
    #[must_use]
    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Set controller-wide security.
    #[must_use]
    pub fn security(mut self, security: SecurityDecl) -> Self {
        self.security = Some(security);
        self
    }

    /// Append an endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointDecl) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Whether tag metadata was declared (description or explicit tags).
    #[must_use]
    pub fn has_tag_metadata(&self) -> bool {
        self.description.is_some() || !self.tags.is_empty()
    }

    /// Endpoint lookup by method name.
    #[must_use]
    pub fn endpoint_named(&self, name: &str) -> Option<&EndpointDecl> {
        self.endpoints.iter().find(|e| e.name == name)
    }
}
