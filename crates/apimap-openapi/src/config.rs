//! Map configurations loaded from YAML.
//!
//! A map names the controllers that make up one public document, plus that
//! document's `info` block and output location. Generator-wide toggles live
//! in the same file so they sit next to the maps they affect.
//!
//! # File format
//!
//! ```yaml
//! # api/openapi/maps.yaml
//! default_map: all
//!
//! maps:
//!   all:
//!     controllers: [UsersController, ThingsController, CustomersController]
//!     info:
//!       title: Full API
//!       version: 1.0.0
//!     output: openapi/all.json
//!
//!   users-and-things:
//!     controllers: [UsersController, ThingsController]
//!     info:
//!       title: Users and Things API
//!       version: 1.0.0
//!       description: Partner-facing subset.
//!
//! # Generator toggles (all default to true).
//! generator:
//!   openapi_version: 3.0.3
//!   bearer_description: "Enter your JWT token in the format: Bearer <token>"
//!   standard_responses: true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::document::{DocumentInfo, DEFAULT_OPENAPI_VERSION};
use crate::error::{Error, Result};

/// Map name used when none is requested.
pub const DEFAULT_MAP_NAME: &str = "all";

/// Every configured map, keyed by name.
///
/// Loaded from a YAML file via [`MapRegistry::load`] or built with
/// [`MapRegistry::insert`]; read-only during generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapRegistry {
    /// Map generated when no name is given.
    pub default_map: String,

    /// Maps by name.
    pub maps: BTreeMap<String, MapConfig>,

    /// Generator toggles shared by every map.
    pub generator: GeneratorSettings,
}

/// One public document's composition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapConfig {
    /// Controller identities included in the document.
    pub controllers: Vec<String>,

    /// Document `info` block.
    pub info: DocumentInfo,

    /// Where the document is written; defaults to `openapi/<name>.json`.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Generator on/off switches and wording.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GeneratorSettings {
    /// `openapi` version string written to every document.
    pub openapi_version: String,

    /// Description of the `bearerAuth` scheme.
    pub bearer_description: Option<String>,

    /// Write the public body name into `requestBody.description`.
    pub annotate_request_aliases: bool,

    /// Attach security requirements and the bearer scheme.
    pub add_security: bool,

    /// Attach declared standard error/empty responses.
    pub standard_responses: bool,
}

impl Default for MapRegistry {
    fn default() -> Self {
        Self {
            default_map: DEFAULT_MAP_NAME.to_string(),
            maps: BTreeMap::new(),
            generator: GeneratorSettings::default(),
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            openapi_version: DEFAULT_OPENAPI_VERSION.to_string(),
            bearer_description: None,
            annotate_request_aliases: true,
            add_security: true,
            standard_responses: true,
        }
    }
}

impl MapConfig {
    /// A map over the given controllers.
    #[must_use]
    pub fn new(controllers: &[&str], info: DocumentInfo) -> Self {
        Self {
            controllers: controllers.iter().map(ToString::to_string).collect(),
            info,
            output: None,
        }
    }
}

impl MapRegistry {
    /// Load maps from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse maps from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Add or replace a map.
    #[must_use]
    pub fn insert(mut self, name: &str, map: MapConfig) -> Self {
        self.maps.insert(name.to_string(), map);
        self
    }

    /// Map by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMap`] listing every configured name when
    /// `name` is not configured.
    pub fn get(&self, name: &str) -> Result<&MapConfig> {
        self.maps.get(name).ok_or_else(|| Error::UnknownMap {
            name: name.to_string(),
            available: self.names().map(ToString::to_string).collect(),
        })
    }

    /// Configured map names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// Output path for a map: its `output`, else `openapi/<name>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMap`] when `name` is not configured.
    pub fn output_path(&self, name: &str) -> Result<PathBuf> {
        let map = self.get(name)?;
        Ok(map
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("openapi").join(format!("{name}.json"))))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> MapRegistry {
        MapRegistry::from_yaml(indoc! {"
            maps:
              all:
                controllers: [UsersController, ThingsController, CustomersController]
                info:
                  title: Full API
                  version: 1.0.0
                output: out/all.json
              users-and-things:
                controllers: [UsersController, ThingsController]
                info:
                  title: Users and Things API
                  version: 1.0.0
                  description: Partner subset.
            generator:
              standard_responses: false
        "})
        .unwrap()
    }

    #[test]
    fn deserialize_defaults() {
        let registry = MapRegistry::from_yaml("{}").unwrap();
        assert_eq!(registry.default_map, "all");
        assert!(registry.maps.is_empty());
        assert_eq!(registry.generator.openapi_version, "3.0.3");
        assert!(registry.generator.add_security);
        assert!(registry.generator.standard_responses);
        assert!(registry.generator.annotate_request_aliases);
    }

    #[test]
    fn deserialize_full() {
        let registry = sample();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["all", "users-and-things"]
        );
        let subset = registry.get("users-and-things").unwrap();
        assert_eq!(subset.controllers, vec!["UsersController", "ThingsController"]);
        assert_eq!(subset.info.description.as_deref(), Some("Partner subset."));
        assert!(!registry.generator.standard_responses);
        // Other toggles keep defaults
        assert!(registry.generator.add_security);
    }

    #[test]
    fn unknown_map_lists_names() {
        let err = sample().get("everything").unwrap_err();
        match err {
            Error::UnknownMap { name, available } => {
                assert_eq!(name, "everything");
                assert_eq!(available, vec!["all", "users-and-things"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn output_path_defaults_to_map_name() {
        let registry = sample();
        assert_eq!(registry.output_path("all").unwrap(), PathBuf::from("out/all.json"));
        assert_eq!(
            registry.output_path("users-and-things").unwrap(),
            PathBuf::from("openapi/users-and-things.json")
        );
    }

    #[test]
    fn insert_builds_programmatically() {
        let registry = MapRegistry::default().insert(
            "users",
            MapConfig::new(
                &["UsersController"],
                DocumentInfo {
                    title: "Users".to_string(),
                    ..DocumentInfo::default()
                },
            ),
        );
        assert_eq!(registry.get("users").unwrap().controllers, vec!["UsersController"]);
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join("apimap-openapi-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("maps.yaml");
        std::fs::write(
            &path,
            "maps:\n  all:\n    controllers: [UsersController]\n    info:\n      title: All\n",
        )
        .unwrap();

        let registry = MapRegistry::load(&path).unwrap();
        assert_eq!(registry.get("all").unwrap().info.title, "All");
        assert_eq!(registry.get("all").unwrap().info.version, "");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let result = MapRegistry::load(Path::new("/nonexistent/maps.yaml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn load_invalid_yaml_returns_error() {
        let result = MapRegistry::from_yaml("maps: [[[invalid");
        assert!(matches!(result, Err(Error::Yaml(_))));
    }
}
