//! Model facade
//!
//! A `Model` pairs one compiled schema with the two build entry points.
//! It is cheap to clone and safe to share between threads: the schema
//! behind it is never mutated after construction, and every build keeps
//! its state on its own stack.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::engine::{self, BuildResult, Mode};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{CompiledSchema, PropertyDescriptor, SchemaResult};

/// Builds instances of one schema.
#[derive(Debug, Clone)]
pub struct Model {
    schema: Arc<CompiledSchema>,
}

impl Model {
    /// Wraps a compiled schema
    pub fn new(schema: CompiledSchema) -> Self {
        Self::from_shared(Arc::new(schema))
    }

    /// Wraps an already shared compiled schema
    pub fn from_shared(schema: Arc<CompiledSchema>) -> Self {
        Self { schema }
    }

    /// Compiles `descriptors` into a schema named `name`.
    ///
    /// Fails with the first construction error; no model exists for a
    /// schema that did not pass every check.
    pub fn define(name: impl Into<String>, descriptors: Vec<PropertyDescriptor>) -> SchemaResult<Self> {
        CompiledSchema::compile(name, descriptors).map(Self::new)
    }

    /// The compiled schema
    pub fn schema(&self) -> &CompiledSchema {
        &self.schema
    }

    /// Schema name
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Builds a fresh instance from `input`.
    pub fn create(&self, input: &Map<String, Value>) -> BuildResult {
        self.build(input, Mode::Create)
    }

    /// Builds a new instance from `existing` with `changes` applied.
    ///
    /// Properties absent from `changes` keep their `existing` value
    /// instead of failing a required check or taking their default.
    /// Constants are re-asserted and dependents recomputed. `existing` is
    /// not modified.
    pub fn update(&self, existing: &Map<String, Value>, changes: &Map<String, Value>) -> BuildResult {
        self.build(changes, Mode::Update { existing })
    }

    fn build(&self, input: &Map<String, Value>, mode: Mode<'_>) -> BuildResult {
        let result = engine::resolve(&self.schema, input, mode);

        if Logger::enabled(Event::InstanceCreated.severity()) {
            let event = match (result.is_ok(), mode) {
                (false, _) => Event::InstanceRejected,
                (true, Mode::Create) => Event::InstanceCreated,
                (true, Mode::Update { .. }) => Event::InstanceUpdated,
            };
            log_event_with_fields(
                event,
                &[
                    ("schema", self.name()),
                    ("mode", mode.as_str()),
                    ("failed_fields", result.errors.len().to_string().as_str()),
                ],
            );
        }

        result
    }
}

impl From<CompiledSchema> for Model {
    fn from(schema: CompiledSchema) -> Self {
        Self::new(schema)
    }
}
