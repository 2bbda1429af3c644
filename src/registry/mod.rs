//! Named validators, resolvers and default producers
//!
//! Declarative definitions cannot carry functions, so they name them. The
//! names are looked up in a `Registry` passed explicitly to
//! [`crate::schema::SchemaDefinition::compile`]; there is no process-wide
//! table.

mod builtins;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::engine::ResolveContext;
use crate::schema::{ProducerFn, ResolverFn, ValidatorFn};
use crate::validators::Validation;

/// Builds a validator from its JSON options
pub type ValidatorFactory = Arc<dyn Fn(&Value) -> Result<ValidatorFn, String> + Send + Sync>;

/// Builds a resolver from its JSON options
pub type ResolverFactory = Arc<dyn Fn(&Value) -> Result<ResolverFn, String> + Send + Sync>;

/// Result type for registry lookups
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown validator '{0}'")]
    UnknownValidator(String),

    #[error("unknown resolver '{0}'")]
    UnknownResolver(String),

    #[error("unknown producer '{0}'")]
    UnknownProducer(String),

    #[error("invalid options for '{name}': {reason}")]
    InvalidOptions { name: String, reason: String },
}

impl RegistryError {
    /// Kind of the missing entry and its name, for unknown-name errors
    pub fn unknown_entry(&self) -> Option<(&'static str, &str)> {
        match self {
            RegistryError::UnknownValidator(name) => Some(("validator", name)),
            RegistryError::UnknownResolver(name) => Some(("resolver", name)),
            RegistryError::UnknownProducer(name) => Some(("producer", name)),
            RegistryError::InvalidOptions { .. } => None,
        }
    }
}

/// Explicit lookup table for declarative definitions.
#[derive(Clone, Default)]
pub struct Registry {
    validators: HashMap<String, ValidatorFactory>,
    resolvers: HashMap<String, ResolverFactory>,
    producers: HashMap<String, ProducerFn>,
}

impl Registry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in primitives.
    ///
    /// Validators: `boolean`, `email`, `string`, `non_empty_string`,
    /// `credit_card`, `number`, `array`. Resolvers: `copy`, `concat`,
    /// `length`. Producers: `uuid`, `now`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register(&mut registry);
        registry
    }

    /// Registers a validator that takes no options
    pub fn register_validator<F>(&mut self, name: impl Into<String>, validator: F) -> &mut Self
    where
        F: Fn(&Value) -> Validation + Send + Sync + 'static,
    {
        let shared: ValidatorFn = Arc::new(validator);
        self.register_validator_factory(name, move |_| Ok(Arc::clone(&shared)))
    }

    /// Registers a validator built from JSON options
    pub fn register_validator_factory<F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        F: Fn(&Value) -> Result<ValidatorFn, String> + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(factory));
        self
    }

    /// Registers a resolver that takes no options
    pub fn register_resolver<F>(&mut self, name: impl Into<String>, resolver: F) -> &mut Self
    where
        F: Fn(&ResolveContext<'_>) -> Result<Value, String> + Send + Sync + 'static,
    {
        let shared: ResolverFn = Arc::new(resolver);
        self.register_resolver_factory(name, move |_| Ok(Arc::clone(&shared)))
    }

    /// Registers a resolver built from JSON options
    pub fn register_resolver_factory<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<ResolverFn, String> + Send + Sync + 'static,
    {
        self.resolvers.insert(name.into(), Arc::new(factory));
        self
    }

    /// Registers a default producer
    pub fn register_producer<F>(&mut self, name: impl Into<String>, producer: F) -> &mut Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.producers.insert(name.into(), Arc::new(producer));
        self
    }

    /// Builds the named validator with the given options (`null` for none)
    pub fn validator(&self, name: &str, options: &Value) -> RegistryResult<ValidatorFn> {
        let factory = self
            .validators
            .get(name)
            .ok_or_else(|| RegistryError::UnknownValidator(name.to_string()))?;
        factory(options).map_err(|reason| invalid_options(name, reason))
    }

    /// Builds the named resolver with the given options (`null` for none)
    pub fn resolver(&self, name: &str, options: &Value) -> RegistryResult<ResolverFn> {
        let factory = self
            .resolvers
            .get(name)
            .ok_or_else(|| RegistryError::UnknownResolver(name.to_string()))?;
        factory(options).map_err(|reason| invalid_options(name, reason))
    }

    /// Looks up the named producer
    pub fn producer(&self, name: &str) -> RegistryResult<ProducerFn> {
        self.producers
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownProducer(name.to_string()))
    }

    /// Registered validator names, sorted
    pub fn validator_names(&self) -> Vec<&str> {
        sorted_keys(self.validators.keys())
    }

    /// Registered resolver names, sorted
    pub fn resolver_names(&self) -> Vec<&str> {
        sorted_keys(self.resolvers.keys())
    }

    /// Registered producer names, sorted
    pub fn producer_names(&self) -> Vec<&str> {
        sorted_keys(self.producers.keys())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("validators", &self.validator_names())
            .field("resolvers", &self.resolver_names())
            .field("producers", &self.producer_names())
            .finish()
    }
}

fn invalid_options(name: &str, reason: String) -> RegistryError {
    RegistryError::InvalidOptions {
        name: name.to_string(),
        reason,
    }
}

fn sorted_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut names: Vec<&str> = keys.map(String::as_str).collect();
    names.sort_unstable();
    names
}

/// Parses factory options; `null` means defaults.
pub fn parse_options<T>(options: &Value) -> Result<T, String>
where
    T: DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(options.clone()).map_err(|e| e.to_string())
}
