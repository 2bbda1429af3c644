//! aeromodel - A strict, deterministic schema definition and instantiation engine
//!
//! A schema is a list of property descriptors. Each property is exactly
//! one of plain, constant, dependent or virtual. Construction checks the
//! schema once; every later build reads it without locking.
//!
//! ```
//! use aeromodel::{Model, PropertyDescriptor};
//! use serde_json::json;
//!
//! let model = Model::define(
//!     "greeting",
//!     vec![
//!         PropertyDescriptor::plain("name").required(),
//!         PropertyDescriptor::dependent("text", ["name"], |ctx| {
//!             let name = ctx.dependency().and_then(|v| v.as_str()).unwrap_or_default();
//!             Ok(json!(format!("hello {}", name)))
//!         }),
//!     ],
//! )
//! .unwrap();
//!
//! let built = model.create(json!({"name": "ada"}).as_object().unwrap());
//! assert_eq!(built.data.unwrap()["text"], "hello ada");
//! ```

pub mod cli;
pub mod engine;
pub mod model;
pub mod observability;
pub mod registry;
pub mod schema;
pub mod validators;

pub use engine::{BuildResult, ErrorReport, ResolveContext};
pub use model::Model;
pub use registry::{Registry, RegistryError};
pub use schema::{
    CompiledSchema, PropertyDescriptor, PropertyKind, SchemaDefinition, SchemaError,
    SchemaErrorCode, SchemaLoader, SchemaResult,
};
pub use validators::Validation;
