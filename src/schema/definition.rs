//! Declarative schema definitions
//!
//! A definition is the JSON form of a schema:
//!
//! ```json
//! {
//!   "name": "user",
//!   "properties": {
//!     "email":    { "required": true, "validator": "email" },
//!     "password": { "virtual": true, "validator": "string",
//!                   "validatorOptions": { "minLength": 8 } },
//!     "kind":     { "constant": true, "value": "user" },
//!     "handle":   { "dependent": true, "dependsOn": "email", "resolver": "copy" }
//!   }
//! }
//! ```
//!
//! Property order in the file is declaration order. Validators, resolvers
//! and default producers are referenced by name and looked up in an
//! explicit [`Registry`]. A `"default": null` is treated as no default.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::registry::{Registry, RegistryError};

use super::compiled::CompiledSchema;
use super::errors::{SchemaError, SchemaResult};
use super::types::PropertyDescriptor;

/// One dependency name or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependsOn {
    /// `"dependsOn": "a"`
    One(String),
    /// `"dependsOn": ["a", "b"]`
    Many(Vec<String>),
}

impl DependsOn {
    /// Dependency names in declared order
    pub fn names(&self) -> Vec<String> {
        match self {
            DependsOn::One(name) => vec![name.clone()],
            DependsOn::Many(names) => names.clone(),
        }
    }
}

/// Configuration of one property as written in a definition file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyConfig {
    /// Literal default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Named default producer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_producer: Option<String>,
    /// Whether input must supply the property
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    /// Constant property flag
    #[serde(skip_serializing_if = "is_false")]
    pub constant: bool,
    /// Constant value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Dependent property flag
    #[serde(skip_serializing_if = "is_false")]
    pub dependent: bool,
    /// Dependency names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,
    /// Named resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
    /// Resolver options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver_options: Option<Value>,
    /// Virtual property flag
    #[serde(rename = "virtual", skip_serializing_if = "is_false")]
    pub is_virtual: bool,
    /// Named validator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    /// Validator options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator_options: Option<Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl PropertyConfig {
    /// Translates the configuration into a descriptor.
    ///
    /// Flag combinations that can only be expressed in the declarative
    /// form are rejected here; everything else is left to schema
    /// compilation.
    pub fn to_descriptor(&self, name: &str, registry: &Registry) -> SchemaResult<PropertyDescriptor> {
        let kinds = [self.constant, self.dependent, self.is_virtual]
            .iter()
            .filter(|flag| **flag)
            .count();
        if kinds > 1 {
            return Err(SchemaError::invalid_descriptor(
                name,
                "only one of constant, dependent and virtual may be set",
            ));
        }
        if self.value.is_some() && !self.constant {
            return Err(SchemaError::invalid_descriptor(
                name,
                "value applies only to constants",
            ));
        }
        if !self.dependent
            && (self.depends_on.is_some() || self.resolver.is_some() || self.resolver_options.is_some())
        {
            return Err(SchemaError::invalid_descriptor(
                name,
                "dependsOn and resolver apply only to dependent properties",
            ));
        }
        if self.validator_options.is_some() && self.validator.is_none() {
            return Err(SchemaError::invalid_descriptor(
                name,
                "validatorOptions given without a validator",
            ));
        }
        if self.default.is_some() && self.default_producer.is_some() {
            return Err(SchemaError::invalid_descriptor(
                name,
                "default and defaultProducer are mutually exclusive",
            ));
        }

        let mut descriptor = if self.constant {
            let value = self
                .value
                .clone()
                .ok_or_else(|| SchemaError::invalid_descriptor(name, "a constant needs a value"))?;
            PropertyDescriptor::constant(name, value)
        } else if self.dependent {
            let depends_on = self.depends_on.as_ref().ok_or_else(|| {
                SchemaError::invalid_descriptor(name, "a dependent property needs dependsOn")
            })?;
            let resolver_name = self.resolver.as_deref().ok_or_else(|| {
                SchemaError::invalid_descriptor(name, "a dependent property needs a resolver")
            })?;
            let options = self.resolver_options.clone().unwrap_or(Value::Null);
            let resolver = registry
                .resolver(resolver_name, &options)
                .map_err(|e| registry_error(name, e))?;
            PropertyDescriptor::dependent_shared(name, depends_on.names(), resolver)
        } else if self.is_virtual {
            PropertyDescriptor::virtual_property(name)
        } else {
            PropertyDescriptor::plain(name)
        };

        if self.required {
            descriptor = descriptor.required();
        }
        if let Some(value) = &self.default {
            descriptor = descriptor.with_default(value.clone());
        }
        if let Some(producer) = &self.default_producer {
            let producer = registry
                .producer(producer)
                .map_err(|e| registry_error(name, e))?;
            descriptor = descriptor.with_shared_default_producer(producer);
        }
        if let Some(validator) = &self.validator {
            let options = self.validator_options.clone().unwrap_or(Value::Null);
            let validator = registry
                .validator(validator, &options)
                .map_err(|e| registry_error(name, e))?;
            descriptor = descriptor.with_shared_validator(validator);
        }

        Ok(descriptor)
    }
}

fn registry_error(property: &str, err: RegistryError) -> SchemaError {
    match err.unknown_entry() {
        Some((kind, name)) => SchemaError::unknown_reference(property, kind, name),
        None => SchemaError::invalid_descriptor(property, err.to_string()),
    }
}

/// A named, ordered set of property configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaDefinition {
    /// Unique schema name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Property configurations, declaration order
    #[serde(with = "ordered_properties")]
    pub properties: Vec<(String, PropertyConfig)>,
}

impl SchemaDefinition {
    /// Create a definition
    pub fn new(name: impl Into<String>, properties: Vec<(String, PropertyConfig)>) -> Self {
        Self {
            name: name.into(),
            description: None,
            properties,
        }
    }

    /// Parses a definition from JSON text.
    ///
    /// `source` names the text in error messages (usually a file path).
    pub fn from_json(source: &str, content: &str) -> SchemaResult<Self> {
        let definition: SchemaDefinition = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed_definition(source, format!("Invalid JSON: {}", e)))?;

        if definition.name.is_empty() {
            return Err(SchemaError::malformed_definition(
                source,
                "schema name must not be empty",
            ));
        }
        Ok(definition)
    }

    /// Resolves every name against `registry` and compiles the schema.
    pub fn compile(&self, registry: &Registry) -> SchemaResult<CompiledSchema> {
        let descriptors = self
            .properties
            .iter()
            .map(|(name, config)| config.to_descriptor(name, registry))
            .collect::<SchemaResult<Vec<_>>>()?;
        CompiledSchema::compile(&self.name, descriptors)
    }
}

/// Keeps property order by going through an order-preserving JSON map.
mod ordered_properties {
    use serde::de::Error as _;

    use super::*;

    pub fn serialize<S>(properties: &[(String, PropertyConfig)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(properties.iter().map(|(name, config)| (name, config)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, PropertyConfig)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(name, value)| {
                let config = serde_json::from_value(value)
                    .map_err(|e| D::Error::custom(format!("property '{}': {}", name, e)))?;
                Ok((name, config))
            })
            .collect()
    }
}
