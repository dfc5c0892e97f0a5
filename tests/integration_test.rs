//! Integration tests for descriptor extraction, resolution and tag formatting

use protobind::binding::{Extractor, RepeatedOptionPolicy, SchemaBindings};
use protobind::{BindingConfig, BindingManifest, FileDescriptorSet, Location, LocationSource};
use serde_json::json;

fn descriptor_set() -> FileDescriptorSet {
    serde_json::from_value(json!({
        "file": [{
            "name": "api/v1/users.proto",
            "package": "api.v1",
            "messageType": [
                {
                    "name": "GetUserRequest",
                    "field": [
                        { "name": "user_id", "number": 1, "jsonName": "userId",
                          "options": { "[protobind.location]": "URI" } },
                        { "name": "fields", "number": 2,
                          "options": { "[protobind.location]": "QUERY" } }
                    ]
                },
                {
                    "name": "SearchRequest",
                    "options": { "[protobind.default_location]": "URI" },
                    "oneofDecl": [
                        { "name": "criteria",
                          "options": { "[protobind.default_oneof_location]": "QUERY",
                                       "[protobind.default_oneof_auto_tags]": ["json"] } }
                    ],
                    "field": [
                        { "name": "query", "number": 1, "oneofIndex": 0,
                          "options": { "[protobind.tags]": "validate:\"required\"" } },
                        { "name": "tenant", "number": 2 },
                        { "name": "page_token", "number": 3,
                          "options": { "[protobind.location]": "QUERY" } }
                    ]
                },
                {
                    "name": "User",
                    "options": { "[protobind.default_auto_tags]": ["db", "json"] },
                    "field": [
                        { "name": "name", "number": 1 },
                        { "name": "email", "number": 2,
                          "options": { "[protobind.auto_tags]": "audit" } }
                    ],
                    "nestedType": [
                        { "name": "Address", "field": [{ "name": "city", "number": 1 }] }
                    ]
                }
            ]
        }]
    }))
    .unwrap()
}

fn bind(config: &BindingConfig) -> SchemaBindings {
    config.binder().bind_descriptor_set(&descriptor_set())
}

fn tag<'a>(bindings: &'a SchemaBindings, message: &str, field: &str) -> &'a str {
    bindings
        .message(message)
        .and_then(|m| m.field(field))
        .and_then(|f| f.tag_string())
        .unwrap()
}

#[test]
fn test_uri_and_query_scenarios() {
    let bindings = bind(&BindingConfig::default());

    assert_eq!(tag(&bindings, "api.v1.GetUserRequest", "user_id"), r#"uri:"user_id""#);
    assert_eq!(tag(&bindings, "api.v1.GetUserRequest", "fields"), r#"form:"fields""#);
    assert!(bindings.failures.is_empty());
}

#[test]
fn test_message_default_auto_tags_scenario() {
    let bindings = bind(&BindingConfig::default());

    assert_eq!(tag(&bindings, "api.v1.User", "name"), r#"db:"name" json:"name""#);
    assert_eq!(
        tag(&bindings, "api.v1.User", "email"),
        r#"db:"email" json:"email" audit:"email""#
    );
}

#[test]
fn test_precedence_across_scopes() {
    let bindings = bind(&BindingConfig::default());
    let search = bindings.message("api.v1.SearchRequest").unwrap();

    let query = search.field("query").unwrap();
    assert_eq!(query.resolved.location, Location::Query);
    assert_eq!(query.resolved.location_source, LocationSource::Oneof);
    assert_eq!(
        query.tag_string(),
        Some(r#"form:"query" json:"query" validate:"required""#)
    );

    let tenant = search.field("tenant").unwrap();
    assert_eq!(tenant.resolved.location, Location::Uri);
    assert_eq!(tenant.resolved.location_source, LocationSource::Message);
    assert_eq!(tenant.tag_string(), Some(r#"uri:"tenant""#));

    let page_token = search.field("page_token").unwrap();
    assert_eq!(page_token.resolved.location_source, LocationSource::Field);
    assert_eq!(page_token.tag_string(), Some(r#"form:"page_token""#));
}

#[test]
fn test_unannotated_nested_message_defaults_to_body() {
    let bindings = bind(&BindingConfig::default());
    let city = bindings
        .message("api.v1.User.Address")
        .and_then(|m| m.field("city"))
        .unwrap();

    assert_eq!(city.resolved.location, Location::Body);
    assert_eq!(city.resolved.location_source, LocationSource::Fallback);
    assert_eq!(city.tag_string(), Some(r#"json:"-""#));
}

#[test]
fn test_fields_keep_declaration_order() {
    let bindings = bind(&BindingConfig::default());
    let names: Vec<&str> = bindings
        .message("api.v1.SearchRequest")
        .unwrap()
        .fields
        .iter()
        .map(|f| f.field.as_str())
        .collect();
    assert_eq!(names, vec!["query", "tenant", "page_token"]);
}

#[test]
fn test_rebinding_is_byte_identical() {
    let config = BindingConfig::default();
    let first = BindingManifest::from_bindings(&bind(&config))
        .render(config.output.format)
        .unwrap();
    let second = BindingManifest::from_bindings(&bind(&config))
        .render(config.output.format)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_json_wire_names_from_config() {
    let config = BindingConfig::from_yaml("tags:\n  wire_name: json\n").unwrap();
    let bindings = bind(&config);
    assert_eq!(tag(&bindings, "api.v1.GetUserRequest", "user_id"), r#"uri:"userId""#);
}

#[test]
fn test_numeric_extension_keys_and_last_wins() {
    let set: FileDescriptorSet = serde_json::from_value(json!({
        "file": [{
            "package": "legacy",
            "messageType": [{
                "name": "Row",
                "options": { "18534240": ["db", "json"] },
                "field": [{ "name": "id", "number": 1, "options": { "18534200": 1 } }]
            }]
        }]
    }))
    .unwrap();

    let accumulate = BindingConfig::default().binder().bind_descriptor_set(&set);
    assert_eq!(tag(&accumulate, "legacy.Row", "id"), r#"form:"id" db:"id" json:"id""#);

    let config = BindingConfig::from_yaml("extensions:\n  repeated: last_wins\n").unwrap();
    let last_wins = config.binder().bind_descriptor_set(&set);
    assert_eq!(tag(&last_wins, "legacy.Row", "id"), r#"form:"id" json:"id""#);
}

#[test]
fn test_extractor_output_is_standalone() {
    let set = descriptor_set();
    let extractor = Extractor::new(Default::default(), RepeatedOptionPolicy::Accumulate);
    let message = extractor
        .extract_message("api.v1", &set.file[0].message_type[1])
        .unwrap();
    drop(set);

    let resolved = protobind::binding::resolve_message(&message);
    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].auto_tags, vec!["json"]);
}

#[test]
fn test_bind_path_reads_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("users.json");
    std::fs::write(&path, serde_json::to_string(&descriptor_set()).unwrap()).unwrap();

    let bindings = protobind::bind_path(&path, &BindingConfig::default()).unwrap();
    assert_eq!(bindings.messages.len(), 4);
    assert!(!bindings.has_errors());
}
