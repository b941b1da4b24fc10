//! Response transforms: success status overrides and standard
//! error/empty responses.

use apimap_core::{Primitive, StandardResponse};
use serde_json::json;

use super::helpers::{endpoints_by_operation, for_each_operation};
use super::scope::Scope;
use crate::document::{Document, Response};
use crate::schema::{ArraySchema, ObjectSchema, Schema};
use crate::skeleton::SUCCESS_DESCRIPTION;

/// Status key of the skeleton's success response.
const SUCCESS_STATUS: &str = "200";

/// Move the success response to the endpoint's declared status.
///
/// A `204` override drops the body.
pub fn apply_default_statuses(doc: &mut Document, scope: &Scope<'_>) {
    let endpoints = endpoints_by_operation(scope);

    for_each_operation(&mut doc.paths, |_path, _method, op| {
        let Some(status) = endpoints
            .get(&op.operation_id)
            .and_then(|(_, ep)| ep.default_status.as_ref())
        else {
            return;
        };
        let mut response = op
            .responses
            .remove(SUCCESS_STATUS)
            .unwrap_or_else(|| Response::empty(SUCCESS_DESCRIPTION));
        response.description.clone_from(&status.description);
        if status.code == 204 {
            response.content.clear();
        }
        op.responses.insert(status.code.to_string(), response);
    });
}

/// Attach each endpoint's declared standard responses.
///
/// Existing entries for the same status are kept.
pub fn add_standard_responses(doc: &mut Document, scope: &Scope<'_>) {
    let endpoints = endpoints_by_operation(scope);

    for_each_operation(&mut doc.paths, |_path, _method, op| {
        let Some((_, ep)) = endpoints.get(&op.operation_id) else {
            return;
        };
        for &standard in &ep.responses {
            op.responses
                .entry(standard.status().to_string())
                .or_insert_with(|| standard_response(standard));
        }
    });
}

/// Response object for a standard response, body schema inlined.
#[must_use]
pub fn standard_response(standard: StandardResponse) -> Response {
    match standard_schema(standard) {
        Some(schema) => Response::json(standard.description(), schema),
        None => Response::empty(standard.description()),
    }
}

/// Inline body schema of a standard response.
#[must_use]
pub fn standard_schema(standard: StandardResponse) -> Option<Schema> {
    let message = |example: &str| {
        Schema::primitive_with_example(Primitive::String, json!(example))
    };
    let not_processable = || {
        ObjectSchema::default()
            .property("message", message("Not processable"), false)
            .property(
                "success",
                Schema::primitive_with_example(Primitive::Boolean, json!(false)),
                false,
            )
    };
    let invalid_ids = || {
        Schema::Array(ArraySchema {
            description: None,
            items: Box::new(Schema::primitive(Primitive::String)),
            example: Some(json!([
                "aee349fd-28e4-450d-9e20-af64d9c0d813",
                "bdd8f526-4c6a-4ea5-b740-4762aac04697"
            ])),
        })
    };

    let object = match standard {
        StandardResponse::NoContent204 => return None,
        StandardResponse::InternalServerError500 => {
            ObjectSchema::default().property("message", message("Something went wrong"), false)
        }
        StandardResponse::NotFound404 => {
            ObjectSchema::default().property("message", message("Resource not found"), false)
        }
        StandardResponse::NotAuthorised401 => {
            ObjectSchema::default().property("message", message("Not authorized"), false)
        }
        StandardResponse::NotProcessable422 => not_processable(),
        StandardResponse::NotProcessable422InvalidIds
        | StandardResponse::NotProcessable422IncorrectFacility => {
            not_processable().property("invalidIds", invalid_ids(), false)
        }
    };
    Some(object.into())
}

#[cfg(test)]
mod tests {
    use apimap_core::{
        ControllerDecl, DeclarationStore, DefaultStatus, DtoDecl, EndpointDecl, HttpMethod,
        ResponseDecl,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::MapConfig;
    use crate::document::{Components, DocumentInfo};
    use crate::registry::SchemaRegistry;
    use crate::skeleton::{RouteSkeleton, SkeletonGenerator};

    fn document_for(store: &DeclarationStore) -> Document {
        let names: Vec<&str> = store.controllers().iter().map(|c| c.name.as_str()).collect();
        let map = MapConfig::new(&names, DocumentInfo::default());
        let scope = Scope::select(store, "test", &map).unwrap();
        let skeleton = RouteSkeleton.generate(&scope, &map.info, &SchemaRegistry::from_store(store));
        let mut doc = Document {
            openapi: "3.0.3".to_string(),
            info: DocumentInfo::default(),
            tags: Vec::new(),
            paths: skeleton.paths,
            components: Components::default(),
        };
        apply_default_statuses(&mut doc, &scope);
        add_standard_responses(&mut doc, &scope);
        doc
    }

    fn store() -> DeclarationStore {
        DeclarationStore::builder()
            .dto(DtoDecl::new("Thing"))
            .controller(
                ControllerDecl::new("ThingsController", "/things")
                    .endpoint(
                        EndpointDecl::new("createThing", HttpMethod::Post, "/")
                            .response(ResponseDecl::new("Thing"))
                            .default_status(DefaultStatus::new(201, "Thing created"))
                            .with_response(StandardResponse::NotProcessable422InvalidIds)
                            .with_response(StandardResponse::InternalServerError500),
                    )
                    .endpoint(
                        EndpointDecl::new("deleteThing", HttpMethod::Delete, "/:id")
                            .response(ResponseDecl::new("Thing"))
                            .default_status(DefaultStatus::new(204, "Deleted"))
                            .with_response(StandardResponse::NoContent204)
                            .with_response(StandardResponse::NotFound404),
                    ),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn default_status_moves_success_response() {
        let doc = document_for(&store());
        let create = doc.operation_by_id("ThingsController.createThing").unwrap();
        assert!(!create.responses.contains_key("200"));
        let created = &create.responses["201"];
        assert_eq!(created.description, "Thing created");
        assert_eq!(
            created.content["application/json"].schema,
            Some(Schema::reference("Thing"))
        );
    }

    #[test]
    fn no_content_status_drops_body_and_is_not_overwritten() {
        let doc = document_for(&store());
        let delete = doc.operation_by_id("ThingsController.deleteThing").unwrap();
        let keys: Vec<&str> = delete.responses.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["204", "404"]);
        assert_eq!(delete.responses["204"].description, "Deleted");
        assert!(delete.responses["204"].content.is_empty());
    }

    #[test]
    fn standard_responses_inline_their_bodies() {
        let doc = document_for(&store());
        let create = doc.operation_by_id("ThingsController.createThing").unwrap();
        let value = serde_json::to_value(&create.responses["422"]).unwrap();
        assert_eq!(
            value["content"]["application/json"]["schema"]["properties"]["invalidIds"]["type"],
            "array"
        );
        assert_eq!(create.responses["500"].description, "Internal server error");
        assert!(doc.components.schemas.is_empty());
    }

    #[test]
    fn every_bodied_standard_response_has_a_message() {
        for standard in [
            StandardResponse::InternalServerError500,
            StandardResponse::NotFound404,
            StandardResponse::NotAuthorised401,
            StandardResponse::NotProcessable422,
            StandardResponse::NotProcessable422InvalidIds,
            StandardResponse::NotProcessable422IncorrectFacility,
        ] {
            let schema = standard_schema(standard).unwrap();
            assert!(schema.property("message").is_some(), "{standard:?}");
        }
        assert!(standard_schema(StandardResponse::NoContent204).is_none());
    }
}
