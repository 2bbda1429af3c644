//! Property descriptor types
//!
//! A schema is an ordered list of property descriptors. Each descriptor has
//! exactly one kind:
//! - plain: accepted from input, optionally defaulted/validated, in output
//! - constant: fixed value, output only, input discarded
//! - dependent: computed by a resolver from other properties, output only
//! - virtual: accepted from input and validated, never in output

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::engine::ResolveContext;
use crate::validators::Validation;

/// Validator applied to a plain or virtual input value.
pub type ValidatorFn = Arc<dyn Fn(&Value) -> Validation + Send + Sync>;

/// Resolver computing a dependent property once its dependencies resolve.
///
/// An `Err` carries the reason recorded against the dependent property.
pub type ResolverFn = Arc<dyn Fn(&ResolveContext<'_>) -> Result<Value, String> + Send + Sync>;

/// Zero-argument producer for default values.
pub type ProducerFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Default for a property omitted from input.
#[derive(Clone)]
pub enum DefaultValue {
    /// Fixed value, cloned on every use
    Literal(Value),
    /// Invoked on every use
    Producer(ProducerFn),
}

impl DefaultValue {
    /// Returns the default value, invoking the producer if there is one.
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Producer(producer) => producer(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// The four disjoint property kinds.
#[derive(Clone)]
pub enum PropertyKind {
    /// Input and output
    Plain,
    /// Input only; feeds resolvers
    Virtual,
    /// Output only; fixed value
    Constant(Value),
    /// Output only; computed from other properties
    Dependent {
        /// Prerequisite property names, in declared order
        depends_on: Vec<String>,
        /// Computes the value from the resolved dependencies
        resolver: ResolverFn,
    },
}

impl PropertyKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyKind::Plain => "plain",
            PropertyKind::Virtual => "virtual",
            PropertyKind::Constant(_) => "constant",
            PropertyKind::Dependent { .. } => "dependent",
        }
    }

    /// Whether this kind appears in a built instance.
    pub fn is_output(&self) -> bool {
        !matches!(self, PropertyKind::Virtual)
    }

    /// Dependency names; empty for anything but dependent properties.
    pub fn depends_on(&self) -> &[String] {
        match self {
            PropertyKind::Dependent { depends_on, .. } => depends_on,
            _ => &[],
        }
    }
}

impl fmt::Debug for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Plain => f.write_str("Plain"),
            PropertyKind::Virtual => f.write_str("Virtual"),
            PropertyKind::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            PropertyKind::Dependent { depends_on, .. } => f
                .debug_struct("Dependent")
                .field("depends_on", depends_on)
                .finish_non_exhaustive(),
        }
    }
}

/// One declared property.
#[derive(Clone)]
pub struct PropertyDescriptor {
    /// Unique property name
    pub name: String,
    /// Property kind
    pub kind: PropertyKind,
    /// Used when input omits the property
    pub default: Option<DefaultValue>,
    /// Whether the property must be present
    pub required: bool,
    /// Applied to plain and virtual values
    pub validator: Option<ValidatorFn>,
}

impl PropertyDescriptor {
    fn with_kind(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: false,
            validator: None,
        }
    }

    /// Create a plain property
    pub fn plain(name: impl Into<String>) -> Self {
        Self::with_kind(name, PropertyKind::Plain)
    }

    /// Create a virtual property
    pub fn virtual_property(name: impl Into<String>) -> Self {
        Self::with_kind(name, PropertyKind::Virtual)
    }

    /// Create a constant property
    pub fn constant(name: impl Into<String>, value: Value) -> Self {
        Self::with_kind(name, PropertyKind::Constant(value))
    }

    /// Create a dependent property
    pub fn dependent<I, S, F>(name: impl Into<String>, depends_on: I, resolver: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&ResolveContext<'_>) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::dependent_shared(name, depends_on, Arc::new(resolver))
    }

    /// Create a dependent property from an already shared resolver
    pub fn dependent_shared<I, S>(name: impl Into<String>, depends_on: I, resolver: ResolverFn) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(
            name,
            PropertyKind::Dependent {
                depends_on: depends_on.into_iter().map(Into::into).collect(),
                resolver,
            },
        )
    }

    /// Mark the property as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set a literal default
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Literal(value));
        self
    }

    /// Set a producer invoked whenever the default is needed
    pub fn with_default_producer<F>(self, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.with_shared_default_producer(Arc::new(producer))
    }

    /// Set an already shared default producer
    pub fn with_shared_default_producer(mut self, producer: ProducerFn) -> Self {
        self.default = Some(DefaultValue::Producer(producer));
        self
    }

    /// Set the validator
    pub fn with_validator<F>(self, validator: F) -> Self
    where
        F: Fn(&Value) -> Validation + Send + Sync + 'static,
    {
        self.with_shared_validator(Arc::new(validator))
    }

    /// Set an already shared validator
    pub fn with_shared_validator(mut self, validator: ValidatorFn) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Dependency names; empty unless dependent
    pub fn depends_on(&self) -> &[String] {
        self.kind.depends_on()
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}
