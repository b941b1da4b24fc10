//! End-to-end tests for map document generation.
//!
//! Every test loads the same declaration and map fixtures and checks the
//! generated document through its JSON form, the way consumers see it.

use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::Value;

use apimap_core::DeclarationStore;
use apimap_openapi::internal::{resolve, rewrite_operations};
use apimap_openapi::{generate, Document, Error, GenerateConfig, MapConfig, MapRegistry};

const DECLARATIONS: &str = indoc! {"
    dtos:
      - name: User
        fields:
          - { name: id, type: integer }
          - { name: name, type: string }
          - { name: address, type: Address }
          - { name: tags, type: Tag, array: true, optional: true }
      - name: Address
        fields:
          - { name: street, type: string }
          - { name: city, type: string }
      - name: Tag
        fields:
          - { name: label, type: string }
      - name: CreateUserReq
        fields:
          - { name: name, type: string }
          - { name: address, type: Address }
      - name: Thing
        fields:
          - { name: id, type: integer }
          - { name: kind, type: ThingKind }
      - name: ThingKind
        fields:
          - { name: label, type: string }
      - name: Node
        fields:
          - { name: value, type: string }
          - { name: children, type: Node, array: true }
      - name: Customer
        fields:
          - { name: id, type: integer }
          - { name: address, type: Address }
      - name: Unused
        fields:
          - { name: id, type: integer }

    controllers:
      - name: UsersController
        route: /users
        description: Manage users.
        security: bearer
        endpoints:
          - name: getAllUsers
            method: get
            path: /
            response:
              type: User
              array: true
              aliases: { User: UsersListItem }
            responses: [not_authorised_401]
          - name: getUser
            method: get
            path: /:id
            response:
              type: User
              aliases: { User: UserDetail }
            responses: [not_found_404]
          - name: getUserRaw
            method: get
            path: /:id/raw
            response: { type: User }
          - name: createUser
            method: post
            path: /
            summary: Create a user
            request:
              type: CreateUserReq
              aliases: { CreateUserReq: NewUser }
            response: { type: User }
            default_status: { code: 201, description: Created }
            responses: [not_processable_422]
      - name: ThingsController
        route: /things
        endpoints:
          - name: getThings
            method: get
            path: /
            response: { type: Thing, array: true }
          - name: getTree
            method: get
            path: /tree
            security: public
            response:
              type: Node
              aliases: { Node: TreeNode }
      - name: CustomersController
        route: /customers
        tags: [Customers]
        security: bearer
        endpoints:
          - name: getCustomer
            method: get
            path: /:id
            response: { type: Customer }
"};

const MAPS: &str = indoc! {"
    default_map: all
    maps:
      all:
        controllers: [UsersController, ThingsController, CustomersController]
        info: { title: Full API, version: 1.0.0 }
      users-and-things:
        controllers: [UsersController, ThingsController]
        info: { title: Users and Things API, version: 1.0.0 }
      customers-and-things:
        controllers: [CustomersController, ThingsController]
        info: { title: Customers and Things API, version: 1.0.0 }
"};

fn store() -> DeclarationStore {
    DeclarationStore::from_yaml(DECLARATIONS).expect("declarations should parse")
}

fn maps() -> MapRegistry {
    MapRegistry::from_yaml(MAPS).expect("maps should parse")
}

fn generate_doc(map: &str) -> Document {
    generate(&store(), &maps(), map, &GenerateConfig::new()).expect("generation should succeed")
}

fn generate_json(map: &str) -> Value {
    serde_json::to_value(generate_doc(map)).expect("document should serialize")
}

fn schema_names(doc: &Value) -> Vec<String> {
    doc["components"]["schemas"]
        .as_object()
        .expect("components.schemas should be an object")
        .keys()
        .cloned()
        .collect()
}

fn json_schema<'a>(doc: &'a Value, path: &str, method: &str, status: &str) -> &'a Value {
    &doc["paths"][path][method]["responses"][status]["content"]["application/json"]["schema"]
}

fn schema_ref(name: &str) -> Value {
    Value::String(format!("#/components/schemas/{name}"))
}

#[test]
fn aliased_list_response_references_alias_and_keeps_nested_types() {
    let doc = generate_json("users-and-things");

    let list = json_schema(&doc, "/users", "get", "200");
    assert_eq!(list["type"], "array");
    assert_eq!(list["items"]["$ref"], schema_ref("UsersListItem"));

    let item = &doc["components"]["schemas"]["UsersListItem"];
    assert_eq!(item["properties"]["address"]["$ref"], schema_ref("Address"));
    assert_eq!(item["properties"]["tags"]["items"]["$ref"], schema_ref("Tag"));
    assert_eq!(item["required"], serde_json::json!(["id", "name", "address"]));
    assert!(doc["components"]["schemas"]["Address"].is_object());
}

#[test]
fn aliases_do_not_leak_between_endpoints() {
    let doc = generate_json("users-and-things");

    assert_eq!(
        json_schema(&doc, "/users", "get", "200")["items"]["$ref"],
        schema_ref("UsersListItem")
    );
    assert_eq!(
        json_schema(&doc, "/users/{id}", "get", "200")["$ref"],
        schema_ref("UserDetail")
    );
    // Plain consumers and the created-user response keep the real name.
    assert_eq!(
        json_schema(&doc, "/users/{id}/raw", "get", "200")["$ref"],
        schema_ref("User")
    );
    assert_eq!(json_schema(&doc, "/users", "post", "201")["$ref"], schema_ref("User"));

    let names = schema_names(&doc);
    for name in ["User", "UserDetail", "UsersListItem"] {
        assert!(names.iter().any(|n| n == name), "missing {name} in {names:?}");
    }
}

#[test]
fn request_alias_rewrites_body_and_description() {
    let doc = generate_json("all");
    let body = &doc["paths"]["/users"]["post"]["requestBody"];

    assert_eq!(body["description"], "NewUser");
    assert_eq!(body["required"], true);
    assert_eq!(
        body["content"]["application/json"]["schema"]["$ref"],
        schema_ref("NewUser")
    );
    assert_eq!(
        doc["components"]["schemas"]["NewUser"]["properties"]["address"]["$ref"],
        schema_ref("Address")
    );
    assert!(doc["components"]["schemas"].get("CreateUserReq").is_none());
}

#[test]
fn components_hold_exactly_the_retained_set() {
    assert_eq!(
        schema_names(&generate_json("all")),
        vec![
            "Address",
            "Customer",
            "NewUser",
            "Tag",
            "Thing",
            "ThingKind",
            "TreeNode",
            "User",
            "UserDetail",
            "UsersListItem",
        ]
    );
    assert_eq!(
        schema_names(&generate_json("customers-and-things")),
        vec!["Address", "Customer", "Thing", "ThingKind", "TreeNode"]
    );
}

#[test]
fn scope_isolation() {
    let doc = generate_json("customers-and-things");
    let paths: Vec<&String> = doc["paths"].as_object().unwrap().keys().collect();
    assert_eq!(paths, vec!["/customers/{id}", "/things", "/things/tree"]);

    let names = schema_names(&doc);
    assert!(!names.iter().any(|n| n.starts_with("User")), "{names:?}");
    assert!(!names.iter().any(|n| n == "NewUser"));
}

#[test]
fn no_dangling_references_in_any_map() {
    let store = store();
    let maps = maps();
    let config = GenerateConfig::new();
    for name in maps.names() {
        let doc = generate(&store, &maps, name, &config).unwrap();
        let dangling = doc.dangling_references();
        assert!(dangling.is_empty(), "map {name}: {dangling:?}");
    }
}

#[test]
fn cyclic_alias_rewrites_self_reference() {
    let doc = generate_json("all");
    assert_eq!(json_schema(&doc, "/things/tree", "get", "200")["$ref"], schema_ref("TreeNode"));
    assert_eq!(
        doc["components"]["schemas"]["TreeNode"]["properties"]["children"]["items"]["$ref"],
        schema_ref("TreeNode")
    );
    assert!(doc["components"]["schemas"].get("Node").is_none());
}

#[test]
fn rewriting_a_generated_document_again_changes_nothing() {
    let store = store();
    let maps = maps();
    let map = maps.get("all").unwrap();
    let doc = generate(&store, &maps, "all", &GenerateConfig::new()).unwrap();

    let resolution = resolve(&store, "all", map).unwrap();
    let mut again = doc.clone();
    rewrite_operations(&mut again.paths, &resolution.aliases);
    assert_eq!(again, doc);
}

#[test]
fn unknown_map_lists_available_names() {
    let err = generate(&store(), &maps(), "everything", &GenerateConfig::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown map configuration 'everything'; \
         available maps: all, customers-and-things, users-and-things"
    );
}

#[test]
fn undeclared_controller_is_an_error() {
    let maps = maps().insert(
        "broken",
        MapConfig::new(&["OrdersController"], apimap_openapi::DocumentInfo::default()),
    );
    let err = generate(&store(), &maps, "broken", &GenerateConfig::new()).unwrap_err();
    assert!(matches!(err, Error::UnknownController { controller, .. } if controller == "OrdersController"));
}

#[test]
fn security_tags_and_standard_responses() {
    let doc = generate_json("all");

    assert_eq!(
        doc["paths"]["/users"]["get"]["security"],
        serde_json::json!([{ "bearerAuth": [] }])
    );
    assert_eq!(doc["paths"]["/things/tree"]["get"]["security"], serde_json::json!([]));
    assert!(doc["paths"]["/things"]["get"].get("security").is_none());
    assert_eq!(
        doc["components"]["securitySchemes"]["bearerAuth"]["bearerFormat"],
        "JWT"
    );

    assert_eq!(
        doc["tags"],
        serde_json::json!([
            { "name": "Users", "description": "Manage users." },
            { "name": "Customers" }
        ])
    );
    assert_eq!(doc["paths"]["/things"]["get"]["tags"], serde_json::json!(["Things"]));

    let create = &doc["paths"]["/users"]["post"];
    assert_eq!(create["summary"], "Create a user");
    assert_eq!(create["responses"]["201"]["description"], "Created");
    assert!(create["responses"].get("200").is_none());
    assert_eq!(
        create["responses"]["422"]["content"]["application/json"]["schema"]["properties"]["success"]["example"],
        false
    );
    assert_eq!(
        doc["paths"]["/users/{id}"]["get"]["responses"]["404"]["description"],
        "Resource not found"
    );
}

#[test]
fn toggles_disable_optional_stages() {
    let config = GenerateConfig::new()
        .skip_security()
        .skip_standard_responses()
        .annotate_request_aliases(false)
        .openapi_version("3.0.0");
    let doc = generate(&store(), &maps(), "all", &config).unwrap();

    assert_eq!(doc.openapi, "3.0.0");
    assert!(doc.components.security_schemes.is_empty());
    assert!(doc.operations().all(|op| op.security.is_none()));
    let create = doc.operation_by_id("UsersController.createUser").unwrap();
    assert!(!create.responses.contains_key("422"));
    // Body reference is still rewritten; only the description is untouched.
    let body = create.request_body.as_ref().unwrap();
    assert_eq!(body.description.as_deref(), Some("CreateUserReq"));
}

#[test]
fn output_is_deterministic() {
    let first = generate_doc("all").to_json().unwrap();
    let second = generate_doc("all").to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn concurrent_generation_matches_sequential() {
    let store = store();
    let maps = maps();
    let config = GenerateConfig::new();
    let names: Vec<&str> = maps.names().collect();

    let sequential: Vec<String> = names
        .iter()
        .map(|name| generate(&store, &maps, name, &config).unwrap().to_json().unwrap())
        .collect();

    let (store, maps, config) = (&store, &maps, &config);
    let concurrent: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = names
            .iter()
            .map(|&name| {
                s.spawn(move || generate(store, maps, name, config).unwrap().to_json().unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}

#[test]
fn yaml_output_matches_json_content() {
    let doc = generate_doc("customers-and-things");
    let from_yaml: Value = serde_yaml_ng::from_str(&doc.to_yaml().unwrap()).unwrap();
    let from_json: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    assert_eq!(from_yaml, from_json);
}

const NESTED_ALIAS_DECLARATIONS: &str = indoc! {"
    dtos:
      - name: User
        fields:
          - { name: address, type: Address }
      - name: Address
        fields:
          - { name: country, type: Country }
      - name: Country
        fields:
          - { name: code, type: string }
    controllers:
      - name: UsersController
        route: /users
        endpoints:
          - name: getUser
            method: get
            path: /:id
            response:
              type: User
              aliases: { User: Foo, Country: Ctry }
          - name: getUserAddress
            method: get
            path: /:id/address
            response:
              type: User
              aliases: { Address: HomeAddress }
"};

#[test]
fn nested_alias_takes_effect_at_any_depth() {
    let store = DeclarationStore::from_yaml(NESTED_ALIAS_DECLARATIONS).unwrap();
    let maps = MapRegistry::default().insert(
        "users",
        MapConfig::new(&["UsersController"], apimap_openapi::DocumentInfo::default()),
    );
    let doc = generate(&store, &maps, "users", &GenerateConfig::new()).unwrap();
    assert!(doc.dangling_references().is_empty(), "{:?}", doc.dangling_references());

    let doc = serde_json::to_value(doc).unwrap();
    assert_eq!(json_schema(&doc, "/users/{id}", "get", "200")["$ref"], schema_ref("Foo"));
    assert_eq!(
        doc["components"]["schemas"]["Address"]["properties"]["country"]["$ref"],
        schema_ref("Ctry")
    );
    assert_eq!(
        doc["components"]["schemas"]["User"]["properties"]["address"]["$ref"],
        schema_ref("HomeAddress")
    );
    assert_eq!(
        schema_names(&doc),
        vec!["Address", "Country", "Ctry", "Foo", "HomeAddress", "User"]
    );
}

#[test]
fn undeclared_types_rejected_before_generation() {
    let field = DeclarationStore::from_yaml(indoc! {"
        dtos:
          - name: Order
            fields:
              - { name: customer, type: Customer }
    "});
    assert!(matches!(
        field,
        Err(apimap_core::Error::UndeclaredType { type_name, .. }) if type_name == "Customer"
    ));

    let response = DeclarationStore::from_yaml(indoc! {"
        controllers:
          - name: GhostsController
            route: /ghosts
            endpoints:
              - name: getGhost
                method: get
                path: /:id
                response: { type: Ghost }
    "});
    let err = response.unwrap_err();
    assert_eq!(
        err.to_string(),
        "GhostsController.getGhost response references type 'Ghost', which is not declared"
    );
}
