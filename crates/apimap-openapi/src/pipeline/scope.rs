//! Scope filter: restrict a store to the controllers a map names.

use apimap_core::{ControllerDecl, DeclarationStore, EndpointDecl};

use crate::config::MapConfig;
use crate::error::{Error, Result};

/// In-scope controllers, in store declaration order.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    controllers: Vec<&'a ControllerDecl>,
}

impl<'a> Scope<'a> {
    /// Select the controllers `map` names.
    ///
    /// Order follows the store, not the map, so output does not depend on
    /// how the map lists its controllers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownController`] if the map names a controller the
    /// store does not declare.
    pub fn select(store: &'a DeclarationStore, map_name: &str, map: &MapConfig) -> Result<Self> {
        if let Some(missing) = map
            .controllers
            .iter()
            .find(|name| store.controller(name).is_none())
        {
            return Err(Error::UnknownController {
                map: map_name.to_string(),
                controller: missing.clone(),
            });
        }

        let controllers = store
            .controllers()
            .iter()
            .filter(|ctrl| map.controllers.iter().any(|name| *name == ctrl.name))
            .collect();
        Ok(Self { controllers })
    }

    /// In-scope controllers.
    #[must_use]
    pub fn controllers(&self) -> &[&'a ControllerDecl] {
        &self.controllers
    }

    /// Every in-scope endpoint with its controller.
    pub fn endpoints(&self) -> impl Iterator<Item = (&'a ControllerDecl, &'a EndpointDecl)> + '_ {
        self.controllers
            .iter()
            .flat_map(|&ctrl| ctrl.endpoints.iter().map(move |ep| (ctrl, ep)))
    }

    /// Whether a controller is in scope.
    #[must_use]
    pub fn contains(&self, controller: &str) -> bool {
        self.controllers.iter().any(|ctrl| ctrl.name == controller)
    }
}
