#![allow(clippy::doc_markdown)] // README uses "OpenAPI" proper noun throughout
#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod document;
mod error;
mod pipeline;
mod registry;
mod schema;
mod skeleton;

pub use config::{GeneratorSettings, MapConfig, MapRegistry, DEFAULT_MAP_NAME};
pub use document::{
    Components, Document, DocumentInfo, MediaType, Operation, Parameter, ParameterLocation,
    PathItem, RequestBody, Response, SecurityRequirement, SecurityScheme, Tag,
    DEFAULT_OPENAPI_VERSION, JSON_MEDIA_TYPE,
};
pub use error::{Error, Result};
pub use pipeline::{
    generate, generate_all, generate_map, GenerateConfig, Scope, BEARER_SCHEME,
    DEFAULT_BEARER_DESCRIPTION,
};
pub use registry::SchemaRegistry;
pub use schema::{AllOfSchema, ArraySchema, ObjectSchema, PrimitiveSchema, Schema, SCHEMA_REF_PREFIX};
pub use skeleton::{RouteSkeleton, Skeleton, SkeletonGenerator};

/// Internal types for advanced use and testing.
///
/// **Not covered by semver guarantees.** These re-exports are `#[doc(hidden)]`
/// and may change in any release, including patch versions. They exist for
/// integration testing and advanced use cases only.
#[doc(hidden)]
pub mod internal {
    pub use crate::pipeline::{
        annotate_request_aliases, closure_of, nested_types, rewrite_operations, rewrite_retained,
        rewrite_schema, AliasMap, AliasTable, OperationAliases, Resolution, Retained, RetainedSet,
    };
    pub use crate::skeleton::{
        default_summary, default_tag, openapi_path, operation_id, path_params, SUCCESS_DESCRIPTION,
    };

    use apimap_core::DeclarationStore;

    use crate::config::MapConfig;
    use crate::error::Result;
    use crate::pipeline::Scope;
    use crate::registry::SchemaRegistry;

    /// Run scope selection and alias resolution only (test helper).
    ///
    /// # Errors
    ///
    /// Returns an error if the map names an undeclared controller.
    pub fn resolve(store: &DeclarationStore, map_name: &str, map: &MapConfig) -> Result<Resolution> {
        let scope = Scope::select(store, map_name, map)?;
        let registry = SchemaRegistry::from_store(store);
        Ok(crate::pipeline::resolve_aliases(&scope, &registry))
    }
}
