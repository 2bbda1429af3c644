//! Definition Loading Tests
//!
//! Declarative definitions on disk:
//! - Every *.json file in the schema directory is one schema
//! - Names resolve against an explicit registry
//! - Any malformed or invalid file fails the load
//! - Schema names are unique

use std::fs;
use std::path::Path;

use aeromodel::validators::Validation;
use aeromodel::{Registry, SchemaErrorCode, SchemaLoader};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_definition(dir: &Path, file: &str, definition: Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(&definition).unwrap()).unwrap();
}

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn user_definition() -> Value {
    json!({
        "name": "user",
        "description": "A registered account",
        "properties": {
            "id": {"defaultProducer": "uuid"},
            "email": {"required": true, "validator": "email", "validatorOptions": {"lowercase": true}},
            "first": {"required": true, "validator": "non_empty_string", "validatorOptions": {"trim": true}},
            "last": {"required": true, "validator": "non_empty_string"},
            "password": {"virtual": true, "validator": "string", "validatorOptions": {"minLength": 8}},
            "role": {"constant": true, "value": "member"},
            "display": {"dependent": true, "dependsOn": ["first", "last"], "resolver": "concat", "resolverOptions": {"separator": " "}},
            "password_length": {"dependent": true, "dependsOn": "password", "resolver": "length"}
        }
    })
}

fn loaded_with(definitions: &[(&str, Value)], registry: Registry) -> (TempDir, SchemaLoader) {
    let tmp = TempDir::new().unwrap();
    for (file, definition) in definitions {
        write_definition(tmp.path(), file, definition.clone());
    }
    let mut loader = SchemaLoader::new(tmp.path(), registry);
    loader.load_all().unwrap();
    (tmp, loader)
}

// =============================================================================
// End to End
// =============================================================================

/// A loaded definition builds instances through the built-in registry.
#[test]
fn test_loaded_schema_builds_instances() {
    let (_tmp, loader) = loaded_with(&[("user.json", user_definition())], Registry::with_builtins());
    let model = loader.model("user").unwrap();

    let result = model.create(&obj(json!({
        "email": "Ada@Example.COM",
        "first": "  Ada ",
        "last": "Lovelace",
        "password": "analytical",
        "role": "admin"
    })));
    assert!(result.errors.is_empty(), "{:?}", result.errors);

    let data = result.data.unwrap();
    assert!(uuid::Uuid::parse_str(data["id"].as_str().unwrap()).is_ok());
    assert_eq!(data["email"], "ada@example.com");
    assert_eq!(data["role"], "member");
    assert_eq!(data["display"], "Ada Lovelace");
    assert_eq!(data["password_length"], json!(10));
    assert!(!data.contains_key("password"));

    let keys: Vec<&str> = data.keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "email", "first", "last", "role", "display", "password_length"]);
}

/// Every field failure comes back in one report.
#[test]
fn test_loaded_schema_reports_all_failures() {
    let (_tmp, loader) = loaded_with(&[("user.json", user_definition())], Registry::with_builtins());
    let model = loader.model("user").unwrap();

    let result = model.create(&obj(json!({"email": "nope", "first": "   ", "password": "short"})));
    assert!(result.data.is_none());
    assert_eq!(
        result.errors.fields().collect::<Vec<_>>(),
        ["email", "first", "last", "password"]
    );
    assert_eq!(result.errors.get("last").unwrap(), ["last is required"]);
}

/// Update keeps the generated id and recomputes dependents.
#[test]
fn test_loaded_schema_update() {
    let (_tmp, loader) = loaded_with(&[("user.json", user_definition())], Registry::with_builtins());
    let model = loader.model("user").unwrap();

    let existing = model
        .create(&obj(json!({
            "email": "ada@example.com",
            "first": "Ada",
            "last": "Byron",
            "password": "analytical"
        })))
        .data
        .unwrap();

    let updated = model
        .update(&existing, &obj(json!({"last": "Lovelace"})))
        .data
        .unwrap();
    assert_eq!(updated["id"], existing["id"]);
    assert_eq!(updated["display"], "Ada Lovelace");
    assert_eq!(updated["password_length"], existing["password_length"]);
}

// =============================================================================
// Registry
// =============================================================================

/// Custom entries are registered explicitly and referenced by name.
#[test]
fn test_custom_registry_entries() {
    let mut registry = Registry::with_builtins();
    registry
        .register_validator("even", |v| match v.as_i64() {
            Some(n) if n % 2 == 0 => Validation::valid(v.clone()),
            _ => Validation::reject("must be even"),
        })
        .register_resolver("half", |ctx| {
            ctx.dependency()
                .and_then(Value::as_i64)
                .map(|n| json!(n / 2))
                .ok_or_else(|| "not an integer".to_string())
        });

    let (_tmp, loader) = loaded_with(
        &[(
            "pair.json",
            json!({
                "name": "pair",
                "properties": {
                    "total": {"required": true, "validator": "even"},
                    "each": {"dependent": true, "dependsOn": "total", "resolver": "half"}
                }
            }),
        )],
        registry,
    );
    let model = loader.model("pair").unwrap();

    assert_eq!(model.create(&obj(json!({"total": 8}))).data.unwrap()["each"], json!(4));
    assert_eq!(
        model.create(&obj(json!({"total": 3}))).errors.get("total").unwrap(),
        ["must be even"]
    );
}

/// A definition naming an unregistered validator is rejected.
#[test]
fn test_unknown_reference_fails_load() {
    let tmp = TempDir::new().unwrap();
    write_definition(tmp.path(), "user.json", user_definition());

    let mut loader = SchemaLoader::new(tmp.path(), Registry::new());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::UnknownReference);
}

// =============================================================================
// Load Failures
// =============================================================================

#[test]
fn test_malformed_file_fails_load() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();

    let mut loader = SchemaLoader::new(tmp.path(), Registry::with_builtins());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::MalformedDefinition);
    assert!(err.is_fatal());
    assert!(err.message().contains("broken.json"));
}

#[test]
fn test_cyclic_definition_fails_load() {
    let tmp = TempDir::new().unwrap();
    write_definition(
        tmp.path(),
        "loop.json",
        json!({
            "name": "loop",
            "properties": {
                "a": {"dependent": true, "dependsOn": "b", "resolver": "copy"},
                "b": {"dependent": true, "dependsOn": "a", "resolver": "copy"}
            }
        }),
    );

    let mut loader = SchemaLoader::new(tmp.path(), Registry::with_builtins());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::CyclicDependency);
}

/// Two files declaring the same schema name.
#[test]
fn test_duplicate_schema_name_rejected() {
    let tmp = TempDir::new().unwrap();
    write_definition(tmp.path(), "a.json", json!({"name": "same", "properties": {"x": {}}}));
    write_definition(tmp.path(), "b.json", json!({"name": "same", "properties": {"y": {}}}));

    let mut loader = SchemaLoader::new(tmp.path(), Registry::with_builtins());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);
}

/// Files load in path order and all names are kept.
#[test]
fn test_multiple_schemas_loaded() {
    let (_tmp, loader) = loaded_with(
        &[
            ("b.json", json!({"name": "beta", "properties": {}})),
            ("a.json", json!({"name": "alpha", "properties": {"x": {"default": 1}}})),
            ("c.json", user_definition()),
        ],
        Registry::with_builtins(),
    );

    assert_eq!(loader.schema_count(), 3);
    assert_eq!(loader.names().collect::<Vec<_>>(), ["alpha", "beta", "user"]);
    assert_eq!(
        loader.model("alpha").unwrap().create(&Map::new()).data.unwrap(),
        obj(json!({"x": 1}))
    );
}
