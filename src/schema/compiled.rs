//! Compiled schema
//!
//! The immutable result of classifying a descriptor set and checking its
//! dependency graph. Built once, then shared read-only by every instance
//! build.

use crate::observability::{log_event_with_fields, Event};

use super::classify::Classification;
use super::errors::SchemaResult;
use super::graph::DependencyGraph;
use super::types::PropertyDescriptor;

/// A checked, immutable schema.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    name: String,
    descriptors: Vec<PropertyDescriptor>,
    classification: Classification,
    graph: DependencyGraph,
}

impl CompiledSchema {
    /// Compiles a descriptor list, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first `SchemaError` found; no partially built schema is
    /// ever returned.
    pub fn compile(
        name: impl Into<String>,
        descriptors: Vec<PropertyDescriptor>,
    ) -> SchemaResult<Self> {
        let name = name.into();
        match Self::check(&descriptors) {
            Ok((classification, graph)) => {
                let schema = Self {
                    name,
                    descriptors,
                    classification,
                    graph,
                };
                log_event_with_fields(
                    Event::SchemaCompiled,
                    &[
                        ("schema", schema.name.as_str()),
                        ("properties", schema.descriptors.len().to_string().as_str()),
                        ("dependents", schema.graph.order().len().to_string().as_str()),
                    ],
                );
                Ok(schema)
            }
            Err(err) => {
                log_event_with_fields(
                    Event::SchemaRejected,
                    &[
                        ("schema", name.as_str()),
                        ("code", err.code().code()),
                        ("message", err.message()),
                    ],
                );
                Err(err)
            }
        }
    }

    fn check(descriptors: &[PropertyDescriptor]) -> SchemaResult<(Classification, DependencyGraph)> {
        let classification = Classification::classify(descriptors)?;
        let graph = DependencyGraph::build(descriptors)?;
        Ok((classification, graph))
    }

    /// Schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All descriptors, declaration order
    pub fn descriptors(&self) -> &[PropertyDescriptor] {
        &self.descriptors
    }

    /// Looks up a descriptor by property name
    pub fn descriptor(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Kind partition and projection indices
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Checked dependency graph
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Constant descriptors, declaration order
    pub fn constants(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.pick(&self.classification.constant)
    }

    /// Plain and virtual descriptors, declaration order
    pub fn inputs(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.pick(&self.classification.inputs)
    }

    /// Dependent descriptors, resolution order
    pub fn dependents(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.pick(self.graph.order())
    }

    /// Names that appear in a built instance, declaration order
    pub fn projection(&self) -> impl Iterator<Item = &str> {
        self.pick(&self.classification.projection)
            .map(|d| d.name.as_str())
    }

    /// Dependent property names in resolution order
    pub fn resolution_order(&self) -> Vec<&str> {
        self.dependents().map(|d| d.name.as_str()).collect()
    }

    fn pick<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a PropertyDescriptor> {
        indices.iter().map(move |&i| &self.descriptors[i])
    }
}
