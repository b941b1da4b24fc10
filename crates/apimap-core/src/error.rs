//! Errors raised while loading or building a [`DeclarationStore`](crate::DeclarationStore).

/// Declaration loading/validation failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Reading a declaration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Declaration YAML could not be parsed.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Two DTOs share a Type Name.
    #[error("data shape '{name}' is declared more than once")]
    DuplicateDto {
        /// The repeated Type Name.
        name: String,
    },

    /// Two controllers share an identity.
    #[error("controller '{name}' is declared more than once")]
    DuplicateController {
        /// The repeated controller name.
        name: String,
    },

    /// A controller declares the same method name twice.
    #[error("controller '{controller}' declares method '{method}' more than once")]
    DuplicateEndpoint {
        /// Owning controller.
        controller: String,
        /// The repeated method name.
        method: String,
    },

    /// A field, request body, or response names a type that is not declared.
    #[error("{referrer} references type '{type_name}', which is not declared")]
    UndeclaredType {
        /// Where the reference appears (`Dto.field` or `Controller.method request`).
        referrer: String,
        /// The missing Type Name.
        type_name: String,
    },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
