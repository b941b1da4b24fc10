//! The queryable declaration store.
//!
//! # File format
//!
//! ```yaml
//! dtos:
//!   - name: User
//!     fields:
//!       - name: id
//!         type: integer
//!       - name: address
//!         type: Address
//!   - name: Address
//!     fields:
//!       - name: street
//!         type: string
//!
//! controllers:
//!   - name: UsersController
//!     route: /users
//!     description: Manage user accounts.
//!     tags: [Users]
//!     security: bearer
//!     endpoints:
//!       - name: getAllUsers
//!         method: get
//!         path: /
//!         response:
//!           type: User
//!           array: true
//!           aliases:
//!             User: UsersListItem
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::dto::DtoDecl;
use crate::endpoint::{ControllerDecl, EndpointDecl};
use crate::error::{Error, Result};
use crate::name::{FieldType, TypeName};

/// Immutable snapshot of every declaration known to the process.
///
/// Lookups are indexed by Type Name, by controller identity, and by
/// `(controller, method)`. Iteration preserves declaration order.
#[derive(Debug, Clone, Default)]
pub struct DeclarationStore {
    dtos: Vec<DtoDecl>,
    dto_index: HashMap<TypeName, usize>,
    controllers: Vec<ControllerDecl>,
    controller_index: HashMap<String, usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeclarationFile {
    dtos: Vec<DtoDecl>,
    controllers: Vec<ControllerDecl>,
}

impl DeclarationStore {
    /// Start building a store programmatically.
    #[must_use]
    pub fn builder() -> DeclarationStoreBuilder {
        DeclarationStoreBuilder::default()
    }

    /// Parse declarations from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a name is declared twice.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: DeclarationFile = serde_yaml_ng::from_str(yaml)?;
        DeclarationStoreBuilder {
            dtos: file.dtos,
            controllers: file.controllers,
        }
        .build()
    }

    /// Load declarations from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a name is
    /// declared twice.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// All data-shape declarations, in declaration order.
    #[must_use]
    pub fn dtos(&self) -> &[DtoDecl] {
        &self.dtos
    }

    /// Data-shape declaration by Type Name.
    #[must_use]
    pub fn dto(&self, name: &str) -> Option<&DtoDecl> {
        self.dto_index.get(name).map(|&i| &self.dtos[i])
    }

    /// All controllers, in declaration order.
    #[must_use]
    pub fn controllers(&self) -> &[ControllerDecl] {
        &self.controllers
    }

    /// Controller metadata by identity.
    #[must_use]
    pub fn controller(&self, name: &str) -> Option<&ControllerDecl> {
        self.controller_index.get(name).map(|&i| &self.controllers[i])
    }

    /// Endpoint metadata by `(controller, method)`.
    #[must_use]
    pub fn endpoint(&self, controller: &str, method: &str) -> Option<&EndpointDecl> {
        self.controller(controller)?.endpoint_named(method)
    }
}

/// Programmatic builder for [`DeclarationStore`].
///
/// ```ignore
/// let store = DeclarationStore::builder()
///     .dto(DtoDecl::new("User").field(FieldDecl::new("id", Primitive::Integer)))
///     .controller(ControllerDecl::new("UsersController", "/users"))
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct DeclarationStoreBuilder {
    dtos: Vec<DtoDecl>,
    controllers: Vec<ControllerDecl>,
}

impl DeclarationStoreBuilder {
    /// Declare a data shape.
    #[must_use]
    pub fn dto(mut self, dto: DtoDecl) -> Self {
        self.dtos.push(dto);
        self
    }

    /// Declare a controller and its endpoints.
    #[must_use]
    pub fn controller(mut self, controller: ControllerDecl) -> Self {
        self.controllers.push(controller);
        self
    }

    /// Validate uniqueness and references, and index the declarations.
    ///
    /// Alias entries are not checked; an alias naming an undeclared type is
    /// ignored at generation time.
    ///
    /// # Errors
    ///
    /// Returns an error if a DTO, controller, or `(controller, method)` pair is
    /// declared more than once, or if a field, request body, or response
    /// names an undeclared type.
    pub fn build(self) -> Result<DeclarationStore> {
        let mut dto_index = HashMap::with_capacity(self.dtos.len());
        for (i, dto) in self.dtos.iter().enumerate() {
            if dto_index.insert(dto.name.clone(), i).is_some() {
                return Err(Error::DuplicateDto {
                    name: dto.name.to_string(),
                });
            }
        }

        let mut controller_index = HashMap::with_capacity(self.controllers.len());
        for (i, ctrl) in self.controllers.iter().enumerate() {
            if controller_index.insert(ctrl.name.clone(), i).is_some() {
                return Err(Error::DuplicateController {
                    name: ctrl.name.clone(),
                });
            }

            let mut methods = HashSet::new();
            for ep in &ctrl.endpoints {
                if !methods.insert(ep.name.as_str()) {
                    return Err(Error::DuplicateEndpoint {
                        controller: ctrl.name.clone(),
                        method: ep.name.clone(),
                    });
                }
            }
        }

        self.check_references(&dto_index)?;

        Ok(DeclarationStore {
            dtos: self.dtos,
            dto_index,
            controllers: self.controllers,
            controller_index,
        })
    }
}

impl DeclarationStoreBuilder {
    fn check_references(&self, dto_index: &HashMap<TypeName, usize>) -> Result<()> {
        let require_declared = |referrer: String, type_name: &TypeName| {
            if dto_index.contains_key(type_name) {
                Ok(())
            } else {
                Err(Error::UndeclaredType {
                    referrer,
                    type_name: type_name.to_string(),
                })
            }
        };

        for dto in &self.dtos {
            for field in &dto.fields {
                if let FieldType::Dto(name) = &field.ty {
                    require_declared(format!("{}.{}", dto.name, field.name), name)?;
                }
            }
        }

        for ctrl in &self.controllers {
            for ep in &ctrl.endpoints {
                if let Some(request) = &ep.request {
                    require_declared(
                        format!("{}.{} request", ctrl.name, ep.name),
                        &request.type_name,
                    )?;
                }
                if let Some(response) = &ep.response {
                    require_declared(
                        format!("{}.{} response", ctrl.name, ep.name),
                        &response.type_name,
                    )?;
                }
            }
        }
        Ok(())
    }
}
