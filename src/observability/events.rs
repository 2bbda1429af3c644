//! Observable events for aeromodel
//!
//! Events are explicit and typed. Each event carries the severity it is
//! logged at.

use std::fmt;

use super::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Schema directory loaded
    SchemasLoaded,

    // Schemas
    /// Schema passed construction checks
    SchemaCompiled,
    /// Schema construction failed
    SchemaRejected,

    // Instances
    /// Instance built in create mode
    InstanceCreated,
    /// Instance built in update mode
    InstanceUpdated,
    /// Build returned field errors
    InstanceRejected,

    // Batch
    /// Batch processing begins
    BatchBegin,
    /// Batch processing complete
    BatchComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaCompiled => "SCHEMA_COMPILED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::InstanceCreated => "INSTANCE_CREATED",
            Event::InstanceUpdated => "INSTANCE_UPDATED",
            Event::InstanceRejected => "INSTANCE_REJECTED",
            Event::BatchBegin => "BATCH_BEGIN",
            Event::BatchComplete => "BATCH_COMPLETE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::InstanceCreated | Event::InstanceUpdated | Event::InstanceRejected => {
                Severity::Trace
            }
            Event::SchemaRejected => Severity::Warn,
            Event::ConfigLoaded
            | Event::SchemasLoaded
            | Event::SchemaCompiled
            | Event::BatchBegin
            | Event::BatchComplete => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
