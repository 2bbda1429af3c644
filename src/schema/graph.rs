//! Dependency graph builder
//!
//! Dependent properties point at the properties they depend on. The graph
//! is checked once, when a schema is compiled:
//! - every dependsOn target exists
//! - the relation is acyclic (three-colour depth-first traversal)
//!
//! The resulting order lists dependent properties so that every dependency
//! precedes its dependents. Independent branches keep declaration order.

use std::collections::HashMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{PropertyDescriptor, PropertyKind};

/// Traversal state of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Checked dependency graph over a descriptor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    /// Dependency indices per property, in declared order
    edges: Vec<Vec<usize>>,
    /// Dependent property indices in resolution order
    order: Vec<usize>,
}

impl DependencyGraph {
    /// Builds and checks the graph.
    ///
    /// # Errors
    ///
    /// - `MODEL_UNKNOWN_DEPENDENCY` if a dependsOn name is not declared
    /// - `MODEL_CYCLIC_DEPENDENCY` naming the first cycle found
    pub fn build(descriptors: &[PropertyDescriptor]) -> SchemaResult<Self> {
        let index: HashMap<&str, usize> = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.as_str(), i))
            .collect();

        let mut edges = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let mut targets = Vec::with_capacity(descriptor.depends_on().len());
            for target in descriptor.depends_on() {
                let idx = index
                    .get(target.as_str())
                    .copied()
                    .ok_or_else(|| SchemaError::unknown_dependency(&descriptor.name, target))?;
                targets.push(idx);
            }
            edges.push(targets);
        }

        let mut walk = Walk {
            descriptors,
            edges: &edges,
            marks: vec![Mark::Unvisited; descriptors.len()],
            path: Vec::new(),
            order: Vec::new(),
        };

        for (i, descriptor) in descriptors.iter().enumerate() {
            if matches!(descriptor.kind, PropertyKind::Dependent { .. }) {
                walk.visit(i)?;
            }
        }

        let order = walk.order;
        Ok(Self { edges, order })
    }

    /// Dependent property indices in resolution order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Indices of the properties `index` depends on.
    pub fn dependencies_of(&self, index: usize) -> &[usize] {
        self.edges.get(index).map_or(&[], Vec::as_slice)
    }
}

/// Per-build traversal state
struct Walk<'a> {
    descriptors: &'a [PropertyDescriptor],
    edges: &'a [Vec<usize>],
    marks: Vec<Mark>,
    path: Vec<usize>,
    order: Vec<usize>,
}

impl Walk<'_> {
    fn visit(&mut self, node: usize) -> SchemaResult<()> {
        match self.marks[node] {
            Mark::Done => return Ok(()),
            Mark::InProgress => return Err(self.cycle_error(node)),
            Mark::Unvisited => {}
        }

        self.marks[node] = Mark::InProgress;
        self.path.push(node);

        let (edges, descriptors) = (self.edges, self.descriptors);
        for &dep in &edges[node] {
            // Only dependent properties have outgoing edges
            if matches!(descriptors[dep].kind, PropertyKind::Dependent { .. }) {
                self.visit(dep)?;
            }
        }

        self.path.pop();
        self.marks[node] = Mark::Done;
        self.order.push(node);
        Ok(())
    }

    fn cycle_error(&self, node: usize) -> SchemaError {
        let start = self.path.iter().position(|&n| n == node).unwrap_or(0);
        let mut cycle: Vec<String> = self.path[start..]
            .iter()
            .map(|&n| self.descriptors[n].name.clone())
            .collect();
        cycle.push(self.descriptors[node].name.clone());
        SchemaError::cyclic_dependency(cycle)
    }
}
