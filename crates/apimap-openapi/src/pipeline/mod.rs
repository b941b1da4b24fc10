//! Map document generation pipeline.
//!
//! Turns the declaration store plus one map configuration into a
//! self-contained `OpenAPI` document.
//!
//! Stages are grouped into logical modules:
//! - [`scope`]: restrict controllers to the map
//! - [`resolve`]: transitive closure of schema references
//! - [`alias`]: per-operation alias tables and the retained schema set
//! - [`rewrite`]: apply alias tables to operations and retained schemas
//! - [`assemble`]: merge skeleton, info, tags, overrides, and schemas
//! - [`responses`]: success status overrides and standard responses
//! - [`security`]: bearer scheme and per-operation requirements

mod alias;
mod assemble;
mod helpers;
mod resolve;
mod responses;
mod rewrite;
mod scope;
mod security;

pub use alias::{
    resolve as resolve_aliases, AliasMap, AliasTable, OperationAliases, Resolution, Retained,
    RetainedSet,
};
pub use resolve::{closure_of, nested_types};
pub use rewrite::{annotate_request_aliases, rewrite_operations, rewrite_retained, rewrite_schema};
pub use scope::Scope;
pub use security::{BEARER_SCHEME, DEFAULT_BEARER_DESCRIPTION};

use apimap_core::DeclarationStore;

use crate::config::{GeneratorSettings, MapConfig, MapRegistry};
use crate::document::{Document, DEFAULT_OPENAPI_VERSION};
use crate::error;
use crate::registry::SchemaRegistry;
use crate::skeleton::{RouteSkeleton, SkeletonGenerator};

static ROUTE_SKELETON: RouteSkeleton = RouteSkeleton;

/// Configuration for the generation pipeline.
///
/// Controls which optional stages run and the skeleton generator used.
/// Construct with [`GenerateConfig::new`] and configure via
/// [`with_settings`](Self::with_settings) (file-based) or individual builder
/// methods (programmatic).
///
/// # Example
///
/// ```ignore
/// let config = GenerateConfig::new()
///     .openapi_version("3.0.3")
///     .bearer_description("Paste an access token")
///     .skip_standard_responses();
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateConfig<'a> {
    /// Produces paths and operations for the in-scope controllers.
    skeleton: &'a dyn SkeletonGenerator,

    /// `openapi` version string.
    openapi_version: String,

    /// Custom description for the bearer scheme.
    bearer_description: Option<String>,

    /// Write aliased request body names into `requestBody.description`.
    annotate_request_aliases: bool,

    /// Attach security requirements and schemes.
    add_security: bool,

    /// Attach declared standard responses.
    standard_responses: bool,
}

impl Default for GenerateConfig<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> GenerateConfig<'a> {
    /// Create a config with every stage enabled and the route skeleton.
    #[must_use]
    pub fn new() -> Self {
        Self {
            skeleton: &ROUTE_SKELETON,
            openapi_version: DEFAULT_OPENAPI_VERSION.to_string(),
            bearer_description: None,
            annotate_request_aliases: true,
            add_security: true,
            standard_responses: true,
        }
    }

    /// Apply settings from the `generator` section of a map file.
    ///
    /// Builder methods called after this override file values.
    #[must_use]
    pub fn with_settings(mut self, settings: &GeneratorSettings) -> Self {
        self.openapi_version.clone_from(&settings.openapi_version);
        if settings.bearer_description.is_some() {
            self.bearer_description
                .clone_from(&settings.bearer_description);
        }
        self.annotate_request_aliases = settings.annotate_request_aliases;
        self.add_security = settings.add_security;
        self.standard_responses = settings.standard_responses;
        self
    }

    /// Use a different skeleton generator.
    #[must_use]
    pub fn skeleton(mut self, skeleton: &'a dyn SkeletonGenerator) -> Self {
        self.skeleton = skeleton;
        self
    }

    /// Set the `openapi` version string.
    #[must_use]
    pub fn openapi_version(mut self, version: &str) -> Self {
        self.openapi_version = version.to_string();
        self
    }

    /// Set a custom description for the bearer scheme.
    #[must_use]
    pub fn bearer_description(mut self, description: &str) -> Self {
        self.bearer_description = Some(description.to_string());
        self
    }

    /// Enable or disable request alias annotation.
    #[must_use]
    pub fn annotate_request_aliases(mut self, enabled: bool) -> Self {
        self.annotate_request_aliases = enabled;
        self
    }

    /// Enable or disable security requirements.
    #[must_use]
    pub fn add_security(mut self, enabled: bool) -> Self {
        self.add_security = enabled;
        self
    }

    /// Enable or disable standard responses.
    #[must_use]
    pub fn standard_responses(mut self, enabled: bool) -> Self {
        self.standard_responses = enabled;
        self
    }

    /// Skip security requirements.
    #[must_use]
    pub fn skip_security(self) -> Self {
        self.add_security(false)
    }

    /// Skip standard responses.
    #[must_use]
    pub fn skip_standard_responses(self) -> Self {
        self.standard_responses(false)
    }
}

/// Generate the document for a named map.
///
/// # Errors
///
/// Returns [`Error::UnknownMap`](crate::Error::UnknownMap) listing the
/// configured names if `map_name` is not configured, or
/// [`Error::UnknownController`](crate::Error::UnknownController) if the map
/// names an undeclared controller.
pub fn generate(
    store: &DeclarationStore,
    maps: &MapRegistry,
    map_name: &str,
    config: &GenerateConfig<'_>,
) -> error::Result<Document> {
    let map = maps.get(map_name)?;
    generate_map(store, map_name, map, config)
}

/// Generate the document for every configured map, in name order.
///
/// # Errors
///
/// Returns the first error any map produces.
pub fn generate_all(
    store: &DeclarationStore,
    maps: &MapRegistry,
    config: &GenerateConfig<'_>,
) -> error::Result<Vec<(String, Document)>> {
    maps.maps
        .iter()
        .map(|(name, map)| generate_map(store, name, map, config).map(|doc| (name.clone(), doc)))
        .collect()
}

/// Generate the document for one map configuration.
///
/// # Phase Ordering
///
/// - **Phase 1** (registry): one fragment per declared DTO, independent of
///   the map.
/// - **Phase 2** (scope): fails before any work if the map names an
///   undeclared controller.
/// - **Phase 3** (skeleton): paths and operations referencing raw Type
///   Names.
/// - **Phase 4** (alias resolution): per-operation tables and the retained
///   set; must see the scope, not the skeleton, so it never depends on the
///   skeleton's schema table.
/// - **Phase 5** (rewrite): operations with their own tables, retained
///   clones with theirs. Runs before assembly so status moves and standard
///   responses never see unrewritten references.
/// - **Phase 6** (assembly): replaces the skeleton schema table with the
///   retained set and applies controller/endpoint metadata.
///
/// Inputs are only read, so concurrent calls for different maps are safe.
///
/// # Errors
///
/// Returns [`Error::UnknownController`](crate::Error::UnknownController) if
/// the map names an undeclared controller.
#[tracing::instrument(skip_all, fields(map = %map_name))]
pub fn generate_map(
    store: &DeclarationStore,
    map_name: &str,
    map: &MapConfig,
    config: &GenerateConfig<'_>,
) -> error::Result<Document> {
    // Phase 1: Raw schema registry
    let registry = SchemaRegistry::from_store(store);

    // Phase 2: Scope filter
    let scope = Scope::select(store, map_name, map)?;
    tracing::debug!(
        controllers = scope.controllers().len(),
        schemas = registry.len(),
        "selected scope"
    );

    // Phase 3: Skeleton
    let mut skeleton = config.skeleton.generate(&scope, &map.info, &registry);

    // Phase 4: Alias resolution and retention
    let resolution = alias::resolve(&scope, &registry);

    // Phase 5: Reference rewriting
    rewrite::rewrite_operations(&mut skeleton.paths, &resolution.aliases);
    if config.annotate_request_aliases {
        rewrite::annotate_request_aliases(&mut skeleton.paths, &resolution.aliases);
    }
    let schemas = rewrite::rewrite_retained(resolution.retained);

    // Phase 6: Assembly
    let doc = assemble::assemble(skeleton, &scope, &map.info, schemas, config);

    let dangling = doc.dangling_references();
    if !dangling.is_empty() {
        tracing::warn!(
            count = dangling.len(),
            names = ?dangling,
            "document references schemas that are not declared"
        );
    }
    tracing::info!(
        paths = doc.paths.len(),
        schemas = doc.components.schemas.len(),
        "generated document"
    );
    Ok(doc)
}
