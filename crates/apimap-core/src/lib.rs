//! Declaration model for the apimap `OpenAPI` generator.
//!
//! This crate holds the plain, queryable metadata that endpoint and data-shape
//! authors attach to their code: DTO declarations (fields, nested types,
//! documentation), controller descriptions, and per-endpoint request/response
//! types with optional alias declarations.
//!
//! Everything is collected into an immutable [`DeclarationStore`], indexed by
//! Type Name, by controller, and by `(controller, method)`. The store is built
//! programmatically via [`DeclarationStore::builder`] or loaded from YAML via
//! [`DeclarationStore::load`]. The `apimap-openapi` crate consumes it to
//! assemble documents; you should rarely need to depend on this crate alone.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dto;
mod endpoint;
mod error;
mod name;
mod store;

pub use dto::{DtoDecl, FieldDecl};
pub use endpoint::{
    Aliases, BodyDecl, ControllerDecl, DefaultStatus, EndpointDecl, HttpMethod, ResponseDecl,
    SecurityDecl, StandardResponse,
};
pub use error::{Error, Result};
pub use name::{FieldType, Primitive, TypeName};
pub use store::{DeclarationStore, DeclarationStoreBuilder};
