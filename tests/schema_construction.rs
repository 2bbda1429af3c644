//! Schema Construction Tests
//!
//! Construction-time guarantees:
//! - Every dependsOn target exists
//! - The dependency relation is acyclic
//! - Flag conflicts are rejected
//! - Virtual properties never enter the output projection
//! - Resolution order is deterministic

use aeromodel::{CompiledSchema, Model, PropertyDescriptor, SchemaErrorCode};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn derived(name: &str, deps: &[&str]) -> PropertyDescriptor {
    PropertyDescriptor::dependent(name, deps.iter().copied(), |_| Ok(Value::Null))
}

fn compile(descriptors: Vec<PropertyDescriptor>) -> Result<CompiledSchema, aeromodel::SchemaError> {
    CompiledSchema::compile("test", descriptors)
}

// =============================================================================
// Referential Integrity
// =============================================================================

#[test]
fn test_unknown_dependency_rejected() {
    let err = compile(vec![PropertyDescriptor::plain("a"), derived("b", &["a", "ghost"])]).unwrap_err();

    assert_eq!(err.code(), SchemaErrorCode::UnknownDependency);
    assert_eq!(err.property(), Some("b"));
    assert!(err.message().contains("ghost"));
}

// =============================================================================
// Cycles
// =============================================================================

/// Two dependents pointing at each other.
#[test]
fn test_two_node_cycle_rejected() {
    let err = Model::define("cyclic", vec![derived("a", &["b"]), derived("b", &["a"])]).unwrap_err();

    assert_eq!(err.code(), SchemaErrorCode::CyclicDependency);
    assert_eq!(err.cycle().unwrap(), ["a", "b", "a"]);
}

#[test]
fn test_self_dependency_rejected() {
    let err = compile(vec![derived("a", &["a"])]).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::CyclicDependency);
}

#[test]
fn test_long_cycle_named() {
    let err = compile(vec![
        PropertyDescriptor::plain("root"),
        derived("p", &["root"]),
        derived("q", &["p", "s"]),
        derived("r", &["q"]),
        derived("s", &["r"]),
    ])
    .unwrap_err();

    let cycle = err.cycle().unwrap();
    assert_eq!(cycle.first(), cycle.last());
    for name in ["q", "r", "s"] {
        assert!(cycle.iter().any(|n| n == name));
    }
    assert!(!cycle.iter().any(|n| n == "p"));
}

/// Construction errors are reported before any model exists.
#[test]
fn test_construction_errors_are_reject_severity() {
    let err = compile(vec![derived("a", &["a"])]).unwrap_err();
    assert!(!err.is_fatal());
    assert!(err.to_string().starts_with("[REJECT] MODEL_CYCLIC_DEPENDENCY"));
}

// =============================================================================
// Flag Conflicts
// =============================================================================

#[test]
fn test_constant_cannot_be_required() {
    let err = compile(vec![PropertyDescriptor::constant("c", json!(1)).required()]).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::InvalidDescriptor);
}

#[test]
fn test_constant_cannot_have_default() {
    let err = compile(vec![PropertyDescriptor::constant("c", json!(1)).with_default(json!(2))]).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::InvalidDescriptor);
}

#[test]
fn test_duplicate_names_rejected() {
    let err = compile(vec![PropertyDescriptor::plain("a"), PropertyDescriptor::plain("a")]).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::InvalidDescriptor);
}

#[test]
fn test_dependent_needs_dependencies() {
    let err = compile(vec![derived("a", &[])]).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::InvalidDescriptor);
}

// =============================================================================
// Classification and Order
// =============================================================================

#[test]
fn test_projection_excludes_virtual() {
    let schema = compile(vec![
        PropertyDescriptor::plain("a"),
        PropertyDescriptor::virtual_property("secret"),
        PropertyDescriptor::constant("k", json!(0)),
        derived("d", &["secret"]),
    ])
    .unwrap();

    assert_eq!(schema.projection().collect::<Vec<_>>(), ["a", "k", "d"]);

    let classes = schema.classification();
    assert_eq!(classes.plain.len(), 1);
    assert_eq!(classes.virtual_.len(), 1);
    assert_eq!(classes.constant.len(), 1);
    assert_eq!(classes.dependent.len(), 1);
}

/// Independent branches resolve in declaration order.
#[test]
fn test_ties_broken_by_declaration_order() {
    let schema = compile(vec![
        PropertyDescriptor::plain("x"),
        derived("z2", &["x"]),
        derived("a1", &["x"]),
        derived("m", &["a1"]),
    ])
    .unwrap();
    assert_eq!(schema.resolution_order(), ["z2", "a1", "m"]);
}

/// Dependencies always precede dependents, whatever the declaration order.
#[test]
fn test_dependencies_precede_dependents() {
    let schema = compile(vec![
        derived("top", &["left", "right"]),
        derived("left", &["base"]),
        derived("right", &["base"]),
        PropertyDescriptor::plain("seed"),
        derived("base", &["seed"]),
    ])
    .unwrap();

    let order = schema.resolution_order();
    let pos = |name: &str| order.iter().position(|n| *n == name).unwrap();
    assert!(pos("base") < pos("left"));
    assert!(pos("base") < pos("right"));
    assert!(pos("left") < pos("top"));
    assert!(pos("right") < pos("top"));
    assert_eq!(order.len(), 4);
}
