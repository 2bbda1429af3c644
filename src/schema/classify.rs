//! Property classifier
//!
//! Partitions descriptors into plain, constant, dependent and virtual
//! buckets (each property lands in exactly one) and computes the output
//! projection. Descriptor-level flag conflicts are rejected here, before
//! the dependency graph is built.

use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::types::{PropertyDescriptor, PropertyKind};

/// Partition of descriptor indices by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Plain properties, declaration order
    pub plain: Vec<usize>,
    /// Constant properties, declaration order
    pub constant: Vec<usize>,
    /// Dependent properties, declaration order
    pub dependent: Vec<usize>,
    /// Virtual properties, declaration order
    pub virtual_: Vec<usize>,
    /// Every non-virtual property, declaration order
    pub projection: Vec<usize>,
    /// Plain and virtual properties interleaved in declaration order
    pub inputs: Vec<usize>,
}

impl Classification {
    /// Checks each descriptor and partitions the set.
    ///
    /// # Errors
    ///
    /// `MODEL_INVALID_DESCRIPTOR` for empty or duplicate names and for
    /// flags that contradict the property kind.
    pub fn classify(descriptors: &[PropertyDescriptor]) -> SchemaResult<Self> {
        let mut seen = HashSet::with_capacity(descriptors.len());
        let mut out = Self::default();

        for (i, descriptor) in descriptors.iter().enumerate() {
            check_descriptor(descriptor)?;

            if !seen.insert(descriptor.name.as_str()) {
                return Err(SchemaError::invalid_descriptor(
                    &descriptor.name,
                    "declared more than once",
                ));
            }

            match descriptor.kind {
                PropertyKind::Plain => {
                    out.plain.push(i);
                    out.inputs.push(i);
                }
                PropertyKind::Virtual => {
                    out.virtual_.push(i);
                    out.inputs.push(i);
                }
                PropertyKind::Constant(_) => out.constant.push(i),
                PropertyKind::Dependent { .. } => out.dependent.push(i),
            }

            if descriptor.kind.is_output() {
                out.projection.push(i);
            }
        }

        Ok(out)
    }
}

fn check_descriptor(descriptor: &PropertyDescriptor) -> SchemaResult<()> {
    let name = &descriptor.name;
    if name.is_empty() {
        return Err(SchemaError::invalid_descriptor(name, "name must not be empty"));
    }

    match &descriptor.kind {
        PropertyKind::Plain | PropertyKind::Virtual => Ok(()),
        PropertyKind::Constant(_) => {
            if descriptor.required {
                return Err(SchemaError::invalid_descriptor(
                    name,
                    "a constant cannot be required",
                ));
            }
            if descriptor.default.is_some() {
                return Err(SchemaError::invalid_descriptor(
                    name,
                    "a constant cannot declare a default",
                ));
            }
            if descriptor.validator.is_some() {
                return Err(SchemaError::invalid_descriptor(
                    name,
                    "a constant cannot declare a validator",
                ));
            }
            Ok(())
        }
        PropertyKind::Dependent { depends_on, .. } => {
            if depends_on.is_empty() {
                return Err(SchemaError::invalid_descriptor(
                    name,
                    "a dependent property must depend on at least one property",
                ));
            }
            if descriptor.default.is_some() {
                return Err(SchemaError::invalid_descriptor(
                    name,
                    "a dependent property cannot declare a default",
                ));
            }
            if descriptor.validator.is_some() {
                return Err(SchemaError::invalid_descriptor(
                    name,
                    "a dependent property cannot declare a validator",
                ));
            }
            Ok(())
        }
    }
}
