//! Schema construction error types
//!
//! Error codes:
//! - MODEL_UNKNOWN_DEPENDENCY (REJECT)
//! - MODEL_CYCLIC_DEPENDENCY (REJECT)
//! - MODEL_INVALID_DESCRIPTOR (REJECT)
//! - MODEL_UNKNOWN_REFERENCE (REJECT)
//! - MODEL_MALFORMED_DEFINITION (FATAL)
//! - MODEL_SCHEMA_IMMUTABLE (REJECT)
//!
//! All of these abort schema construction. Call-time field failures are
//! never errors of this type; they are returned as data in a build result.

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Schema definition rejected
    Reject,
    /// Definition source unusable (unreadable file, invalid JSON)
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// A dependsOn target does not exist
    UnknownDependency,
    /// The dependency relation contains a cycle
    CyclicDependency,
    /// Conflicting or incomplete flags on one property
    InvalidDescriptor,
    /// A validator, resolver or producer name is not registered
    UnknownReference,
    /// Definition file unreadable or not valid JSON
    MalformedDefinition,
    /// Schema name already registered
    SchemaImmutable,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownDependency => "MODEL_UNKNOWN_DEPENDENCY",
            SchemaErrorCode::CyclicDependency => "MODEL_CYCLIC_DEPENDENCY",
            SchemaErrorCode::InvalidDescriptor => "MODEL_INVALID_DESCRIPTOR",
            SchemaErrorCode::UnknownReference => "MODEL_UNKNOWN_REFERENCE",
            SchemaErrorCode::MalformedDefinition => "MODEL_MALFORMED_DEFINITION",
            SchemaErrorCode::SchemaImmutable => "MODEL_SCHEMA_IMMUTABLE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::MalformedDefinition => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Offending property if applicable
    property: Option<String>,
    /// Cycle path (first node repeated at the end) for cyclic dependencies
    cycle: Option<Vec<String>>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String, property: Option<String>) -> Self {
        Self {
            code,
            message,
            property,
            cycle: None,
        }
    }

    /// Create an unknown dependency error
    pub fn unknown_dependency(property: impl Into<String>, target: impl Into<String>) -> Self {
        let property = property.into();
        Self::new(
            SchemaErrorCode::UnknownDependency,
            format!(
                "Property '{}' depends on unknown property '{}'",
                property,
                target.into()
            ),
            Some(property),
        )
    }

    /// Create a cyclic dependency error
    ///
    /// `cycle` lists the nodes on the cycle, starting and ending with the
    /// same name.
    pub fn cyclic_dependency(cycle: Vec<String>) -> Self {
        let mut err = Self::new(
            SchemaErrorCode::CyclicDependency,
            format!("Cyclic dependency: {}", cycle.join(" -> ")),
            cycle.first().cloned(),
        );
        err.cycle = Some(cycle);
        err
    }

    /// Create an invalid descriptor error
    pub fn invalid_descriptor(property: impl Into<String>, reason: impl Into<String>) -> Self {
        let property = property.into();
        Self::new(
            SchemaErrorCode::InvalidDescriptor,
            format!("Invalid property '{}': {}", property, reason.into()),
            Some(property),
        )
    }

    /// Create an unknown reference error
    pub fn unknown_reference(
        property: impl Into<String>,
        kind: &str,
        name: impl Into<String>,
    ) -> Self {
        let property = property.into();
        Self::new(
            SchemaErrorCode::UnknownReference,
            format!(
                "Property '{}' references unknown {} '{}'",
                property,
                kind,
                name.into()
            ),
            Some(property),
        )
    }

    /// Create an error for a malformed definition source
    pub fn malformed_definition(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::MalformedDefinition,
            format!("Malformed definition '{}': {}", source.into(), reason.into()),
            None,
        )
    }

    /// Create a schema immutable error
    pub fn schema_immutable(schema: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::SchemaImmutable,
            format!("Schema '{}' is already registered", schema.into()),
            None,
        )
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending property if applicable
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Returns the cycle path for cyclic dependency errors
    pub fn cycle(&self) -> Option<&[String]> {
        self.cycle.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
