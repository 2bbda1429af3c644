//! Instance build pipeline
//!
//! One call of [`resolve`]:
//! 1. constants are written unconditionally (input for them is discarded)
//! 2. plain and virtual properties are read, defaulted or validated, in
//!    declaration order
//! 3. dependent properties are resolved in dependency order; a dependent
//!    whose dependency failed or is missing is skipped, and only reported
//!    if it is itself required
//!
//!    An update keeps a skipped dependent's previous value only if none of
//!    its dependencies changed in this call.
//! 4. the store is projected onto the output properties
//!
//! Every property is evaluated even after an earlier one failed. If any
//! field failed no instance is returned.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::schema::{CompiledSchema, PropertyDescriptor, PropertyKind};
use crate::validators::Validation;

use super::context::ResolveContext;
use super::report::{BuildResult, ErrorReport};

/// Build mode
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    /// Build a new instance from input alone
    Create,
    /// Apply changes on top of a previously built instance
    Update {
        /// The previously built instance
        existing: &'a Map<String, Value>,
    },
}

impl<'a> Mode<'a> {
    /// Mode name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Create => "create",
            Mode::Update { .. } => "update",
        }
    }

    fn carried_over(&self, name: &str) -> Option<&'a Value> {
        match *self {
            Mode::Create => None,
            Mode::Update { existing } => existing.get(name),
        }
    }
}

/// Per-call mutable state; never outlives the call.
struct Build<'a> {
    schema: &'a CompiledSchema,
    input: &'a Map<String, Value>,
    mode: Mode<'a>,
    store: Map<String, Value>,
    errors: ErrorReport,
    /// Properties whose value differs from what `existing` was built from
    changed: BTreeSet<String>,
}

/// Builds one instance.
pub fn resolve(schema: &CompiledSchema, input: &Map<String, Value>, mode: Mode<'_>) -> BuildResult {
    let mut build = Build {
        schema,
        input,
        mode,
        store: Map::new(),
        errors: ErrorReport::new(),
        changed: BTreeSet::new(),
    };

    build.assign_constants();
    build.read_inputs();
    build.resolve_dependents();
    build.finish()
}

impl Build<'_> {
    fn assign_constants(&mut self) {
        for descriptor in self.schema.constants() {
            if let PropertyKind::Constant(value) = &descriptor.kind {
                self.store.insert(descriptor.name.clone(), value.clone());
            }
        }
    }

    fn read_inputs(&mut self) {
        let (schema, input) = (self.schema, self.input);
        for descriptor in schema.inputs() {
            match input.get(&descriptor.name) {
                Some(raw) => self.accept(descriptor, raw),
                None => self.fill_missing(descriptor),
            }
        }
    }

    fn accept(&mut self, descriptor: &PropertyDescriptor, raw: &Value) {
        self.changed.insert(descriptor.name.clone());
        let Some(validator) = &descriptor.validator else {
            self.store.insert(descriptor.name.clone(), raw.clone());
            return;
        };

        match validator(raw) {
            Validation::Valid(value) => {
                self.store.insert(descriptor.name.clone(), value);
            }
            Validation::Invalid(reasons) => self.errors.record(&descriptor.name, reasons),
        }
    }

    fn fill_missing(&mut self, descriptor: &PropertyDescriptor) {
        if let Some(previous) = self.mode.carried_over(&descriptor.name) {
            self.store.insert(descriptor.name.clone(), previous.clone());
        } else if descriptor.required {
            self.errors.record(
                &descriptor.name,
                vec![format!("{} is required", descriptor.name)],
            );
        } else if let Some(default) = &descriptor.default {
            self.store.insert(descriptor.name.clone(), default.produce());
            self.changed.insert(descriptor.name.clone());
        }
    }

    fn resolve_dependents(&mut self) {
        let schema = self.schema;
        for descriptor in schema.dependents() {
            let PropertyKind::Dependent {
                depends_on,
                resolver,
            } = &descriptor.kind
            else {
                continue;
            };

            // Resolver errors are recorded like validation failures, so a
            // dependent of a failed dependent cascades as failed too.
            let failed = depends_on.iter().any(|name| self.errors.contains(name));
            let stale = depends_on.iter().any(|name| self.changed.contains(name));
            let ready = !failed && depends_on.iter().all(|name| self.store.contains_key(name));

            if stale {
                self.changed.insert(descriptor.name.clone());
            }
            if !ready {
                self.skip(descriptor, failed || stale);
                continue;
            }

            let outcome = {
                let ctx = ResolveContext::new(&descriptor.name, depends_on, &self.store, self.input);
                resolver(&ctx)
            };

            match outcome {
                Ok(value) => {
                    self.store.insert(descriptor.name.clone(), value);
                }
                Err(reason) => self.errors.record(&descriptor.name, vec![reason]),
            }
        }
    }

    /// A dependent that cannot be resolved. An update keeps the previous
    /// value when the dependencies are merely absent, not failed or changed.
    fn skip(&mut self, descriptor: &PropertyDescriptor, invalidated: bool) {
        if !invalidated {
            if let Some(previous) = self.mode.carried_over(&descriptor.name) {
                self.store.insert(descriptor.name.clone(), previous.clone());
                return;
            }
        }

        if descriptor.required {
            self.errors.record(
                &descriptor.name,
                vec![format!("{} could not be resolved", descriptor.name)],
            );
        }
    }

    fn finish(self) -> BuildResult {
        if !self.errors.is_empty() {
            return BuildResult::failure(self.errors);
        }

        let mut data = Map::new();
        for name in self.schema.projection() {
            if let Some(value) = self.store.get(name) {
                data.insert(name.to_string(), value.clone());
            }
        }
        BuildResult::success(data)
    }
}
