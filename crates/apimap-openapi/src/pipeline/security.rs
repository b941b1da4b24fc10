//! Security transforms.
//!
//! Adds the Bearer JWT security scheme when any in-scope controller or
//! endpoint opts into authentication, and sets per-operation requirements:
//! `[{bearerAuth: []}]` for bearer, `[]` for public overrides.

use apimap_core::SecurityDecl;

use super::helpers::{endpoints_by_operation, for_each_operation};
use super::scope::Scope;
use crate::document::{Document, SecurityRequirement, SecurityScheme};

/// Name of the bearer scheme under `components.securitySchemes`.
pub const BEARER_SCHEME: &str = "bearerAuth";

/// Scheme description used when none is configured.
pub const DEFAULT_BEARER_DESCRIPTION: &str = "Enter your JWT token in the format: Bearer <token>";

/// Apply controller/endpoint security declarations.
///
/// An endpoint's own declaration wins over its controller's. Operations
/// with neither are left without a `security` entry.
pub fn apply_security(doc: &mut Document, scope: &Scope<'_>, bearer_description: Option<&str>) {
    let endpoints = endpoints_by_operation(scope);

    for_each_operation(&mut doc.paths, |_path, _method, op| {
        let Some((ctrl, ep)) = endpoints.get(&op.operation_id) else {
            return;
        };
        op.security = match ep.security.or(ctrl.security) {
            Some(SecurityDecl::Bearer) => Some(vec![bearer_requirement()]),
            Some(SecurityDecl::Public) => Some(Vec::new()),
            None => None,
        };
    });

    let opted_in = scope.controllers().iter().any(|ctrl| {
        ctrl.security == Some(SecurityDecl::Bearer)
            || ctrl
                .endpoints
                .iter()
                .any(|ep| ep.security == Some(SecurityDecl::Bearer))
    });
    if opted_in {
        doc.components
            .security_schemes
            .insert(BEARER_SCHEME.to_string(), bearer_scheme(bearer_description));
    }
}

fn bearer_requirement() -> SecurityRequirement {
    SecurityRequirement::from([(BEARER_SCHEME.to_string(), Vec::new())])
}

fn bearer_scheme(description: Option<&str>) -> SecurityScheme {
    SecurityScheme {
        kind: "http".to_string(),
        scheme: "bearer".to_string(),
        bearer_format: Some("JWT".to_string()),
        description: Some(description.unwrap_or(DEFAULT_BEARER_DESCRIPTION).to_string()),
    }
}
