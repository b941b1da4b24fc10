//! Typed error enum for the `apimap-openapi` library API.
//!
//! Library consumers can match on specific variants. The CLI (`main.rs`)
//! converts these to `anyhow::Error` at the binary boundary for richer
//! context messages.

/// Errors produced by `apimap-openapi` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading map configuration or writing documents).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Declarations could not be loaded.
    #[error(transparent)]
    Declarations(#[from] apimap_core::Error),

    /// The requested map configuration does not exist.
    #[error("unknown map configuration '{name}'; available maps: {}", available.join(", "))]
    UnknownMap {
        /// The requested map name.
        name: String,
        /// Every configured map name, sorted.
        available: Vec<String>,
    },

    /// A map configuration lists a controller that was never declared.
    #[error("map '{map}' lists controller '{controller}', which is not declared")]
    UnknownController {
        /// The map being generated.
        map: String,
        /// The undeclared controller identity.
        controller: String,
    },
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;
