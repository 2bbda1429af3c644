//! Primitive validator set
//!
//! Every validator is a pure function `(value, options) -> Validation`.
//! The core engine only ever sees the `Validation` shape; it never looks
//! validators up by itself. Named lookup goes through an explicit
//! [`crate::registry::Registry`].

mod primitives;

pub use primitives::{
    array, boolean, credit_card, email, number, string, ArrayOptions, BooleanOptions,
    EmailOptions, NumberOptions, StringOptions,
};

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Outcome of validating one value.
///
/// `Valid` carries the validated (possibly normalised) value, `Invalid`
/// carries at least one reason. Serialises as
/// `{"valid": bool, "validated"?: value, "reasons"?: [..]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Accepted; the value to store
    Valid(Value),
    /// Rejected; why
    Invalid(Vec<String>),
}

impl Validation {
    /// Accept a value
    pub fn valid(value: Value) -> Self {
        Validation::Valid(value)
    }

    /// Reject with a single reason
    pub fn reject(reason: impl Into<String>) -> Self {
        Validation::Invalid(vec![reason.into()])
    }

    /// Reject with several reasons
    pub fn invalid<I, S>(reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validation::Invalid(reasons.into_iter().map(Into::into).collect())
    }

    /// Whether the value was accepted
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// The validated value, if accepted
    pub fn validated(&self) -> Option<&Value> {
        match self {
            Validation::Valid(value) => Some(value),
            Validation::Invalid(_) => None,
        }
    }

    /// Rejection reasons; empty if accepted
    pub fn reasons(&self) -> &[String] {
        match self {
            Validation::Valid(_) => &[],
            Validation::Invalid(reasons) => reasons,
        }
    }

    /// Converts into a `Result`
    pub fn into_result(self) -> Result<Value, Vec<String>> {
        match self {
            Validation::Valid(value) => Ok(value),
            Validation::Invalid(reasons) => Err(reasons),
        }
    }
}

#[derive(Serialize)]
struct ValidationWire<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    validated: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasons: Option<&'a [String]>,
}

impl Serialize for Validation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Validation::Valid(value) => ValidationWire {
                valid: true,
                validated: Some(value),
                reasons: None,
            },
            Validation::Invalid(reasons) => ValidationWire {
                valid: false,
                validated: None,
                reasons: Some(reasons),
            },
        };
        wire.serialize(serializer)
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_shape() {
        let v = Validation::valid(json!("ok"));
        assert!(v.is_valid());
        assert_eq!(v.validated(), Some(&json!("ok")));
        assert!(v.reasons().is_empty());
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"valid": true, "validated": "ok"})
        );
    }

    #[test]
    fn test_invalid_shape() {
        let v = Validation::invalid(["too short", "bad pattern"]);
        assert!(!v.is_valid());
        assert!(v.validated().is_none());
        assert_eq!(v.reasons().len(), 2);
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"valid": false, "reasons": ["too short", "bad pattern"]})
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(Validation::valid(json!(1)).into_result(), Ok(json!(1)));
        assert_eq!(
            Validation::reject("nope").into_result(),
            Err(vec!["nope".to_string()])
        );
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "bool");
        assert_eq!(json_type_name(&json!(1)), "int");
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!("s")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
