//! Schema subsystem for aeromodel
//!
//! A schema is declared once, checked once, and then shared read-only by
//! every instance build.
//!
//! # Design Principles
//!
//! - Closed set of property kinds (plain, constant, dependent, virtual)
//! - Every dependsOn target exists; no cycles
//! - Flag conflicts rejected at construction, never probed per call
//! - Deterministic resolution order (declaration order breaks ties)
//! - No partially built schema is ever returned

mod classify;
mod compiled;
mod definition;
mod errors;
mod graph;
mod loader;
mod types;

pub use classify::Classification;
pub use compiled::CompiledSchema;
pub use definition::{DependsOn, PropertyConfig, SchemaDefinition};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use graph::DependencyGraph;
pub use loader::SchemaLoader;
pub use types::{
    DefaultValue, ProducerFn, PropertyDescriptor, PropertyKind, ResolverFn, ValidatorFn,
};
