//! Built-in primitive validators
//!
//! Each function is pure and collects every applicable reason rather than
//! stopping at the first. Options deserialize from the camelCase JSON form
//! used in definition files and default to "no constraint".

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

use super::{json_type_name, Validation};

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();

fn email_regex() -> Option<&'static Regex> {
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Options for [`boolean`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BooleanOptions {
    /// Accept the strings "true" and "false"
    pub coerce: bool,
}

/// Accepts JSON booleans.
pub fn boolean(value: &Value, options: &BooleanOptions) -> Validation {
    match value {
        Value::Bool(b) => Validation::valid(Value::Bool(*b)),
        Value::String(s) if options.coerce => match s.trim() {
            "true" => Validation::valid(Value::Bool(true)),
            "false" => Validation::valid(Value::Bool(false)),
            _ => Validation::reject("must be a boolean"),
        },
        _ => Validation::reject("must be a boolean"),
    }
}

/// Options for [`email`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EmailOptions {
    /// Lowercase the validated address
    pub lowercase: bool,
}

/// Accepts a syntactically valid email address, trimmed.
pub fn email(value: &Value, options: &EmailOptions) -> Validation {
    let Some(raw) = value.as_str() else {
        return Validation::reject(format!("must be a string, got {}", json_type_name(value)));
    };

    let address = raw.trim();
    let matches = email_regex().map_or(false, |re| re.is_match(address));
    if !matches || address.len() > 254 {
        return Validation::reject("must be a valid email address");
    }

    let validated = if options.lowercase {
        address.to_lowercase()
    } else {
        address.to_string()
    };
    Validation::valid(Value::String(validated))
}

/// Options for [`string`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StringOptions {
    /// Minimum length in characters
    pub min_length: Option<usize>,
    /// Maximum length in characters
    pub max_length: Option<usize>,
    /// Reject the empty string
    pub non_empty: bool,
    /// Trim whitespace before checking; the trimmed value is stored
    pub trim: bool,
    /// Regular expression the whole value must match
    #[serde(deserialize_with = "deserialize_pattern")]
    pub pattern: Option<Regex>,
}

impl StringOptions {
    /// Options rejecting the empty string
    pub fn non_empty() -> Self {
        Self {
            non_empty: true,
            ..Self::default()
        }
    }
}

fn deserialize_pattern<'de, D>(deserializer: D) -> Result<Option<Regex>, D::Error>
where
    D: Deserializer<'de>,
{
    let source: Option<String> = Option::deserialize(deserializer)?;
    source
        .map(|p| Regex::new(&format!("^(?:{})$", p)).map_err(serde::de::Error::custom))
        .transpose()
}

/// Accepts strings meeting every configured constraint.
pub fn string(value: &Value, options: &StringOptions) -> Validation {
    let Some(raw) = value.as_str() else {
        return Validation::reject(format!("must be a string, got {}", json_type_name(value)));
    };

    let s = if options.trim { raw.trim() } else { raw };
    let len = s.chars().count();
    let mut reasons = Vec::new();

    if options.non_empty && s.is_empty() {
        reasons.push("must not be empty".to_string());
    }
    if let Some(min) = options.min_length {
        if len < min {
            reasons.push(format!("must be at least {} characters", min));
        }
    }
    if let Some(max) = options.max_length {
        if len > max {
            reasons.push(format!("must be at most {} characters", max));
        }
    }
    if let Some(pattern) = &options.pattern {
        if !pattern.is_match(s) {
            reasons.push(format!("must match pattern {}", pattern.as_str()));
        }
    }

    if reasons.is_empty() {
        Validation::valid(Value::String(s.to_string()))
    } else {
        Validation::Invalid(reasons)
    }
}

/// Accepts card numbers (string or integer), 12 to 19 digits, passing the
/// Luhn checksum. Spaces and dashes are allowed as separators; the
/// validated value is the bare digit string.
pub fn credit_card(value: &Value) -> Validation {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_u64() => n.to_string(),
        other => {
            return Validation::reject(format!(
                "must be a string or number, got {}",
                json_type_name(other)
            ))
        }
    };

    if raw.chars().any(|c| !(c.is_ascii_digit() || c == ' ' || c == '-')) {
        return Validation::reject("must contain only digits, spaces or dashes");
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if !(12..=19).contains(&digits.len()) {
        return Validation::reject("must be between 12 and 19 digits");
    }
    if !luhn(&digits) {
        return Validation::reject("must pass the Luhn checksum");
    }

    Validation::valid(Value::String(digits))
}

fn luhn(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Options for [`number`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NumberOptions {
    /// Inclusive lower bound
    pub min: Option<f64>,
    /// Inclusive upper bound
    pub max: Option<f64>,
    /// Reject values with a fractional part
    pub integer: bool,
    /// Parse numeric strings
    pub coerce: bool,
}

/// Accepts numbers within the configured bounds.
pub fn number(value: &Value, options: &NumberOptions) -> Validation {
    let parsed = match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) if options.coerce => parse_number(s.trim()),
        _ => None,
    };
    let Some(n) = parsed else {
        return Validation::reject("must be a number");
    };
    let Some(as_f64) = n.as_f64() else {
        return Validation::reject("must be a number");
    };

    let mut reasons = Vec::new();
    if options.integer && !(n.is_i64() || n.is_u64() || as_f64.fract() == 0.0) {
        reasons.push("must be an integer".to_string());
    }
    if let Some(min) = options.min {
        if as_f64 < min {
            reasons.push(format!("must be at least {}", min));
        }
    }
    if let Some(max) = options.max {
        if as_f64 > max {
            reasons.push(format!("must be at most {}", max));
        }
    }

    if reasons.is_empty() {
        Validation::valid(Value::Number(n))
    } else {
        Validation::Invalid(reasons)
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Options for [`array`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ArrayOptions {
    /// Minimum item count
    pub min_items: Option<usize>,
    /// Maximum item count
    pub max_items: Option<usize>,
    /// Reject duplicate items
    pub unique: bool,
}

/// Accepts arrays meeting every configured constraint.
pub fn array(value: &Value, options: &ArrayOptions) -> Validation {
    let Some(items) = value.as_array() else {
        return Validation::reject(format!("must be an array, got {}", json_type_name(value)));
    };

    let mut reasons = Vec::new();
    if let Some(min) = options.min_items {
        if items.len() < min {
            reasons.push(format!("must contain at least {} items", min));
        }
    }
    if let Some(max) = options.max_items {
        if items.len() > max {
            reasons.push(format!("must contain at most {} items", max));
        }
    }
    if options.unique
        && items
            .iter()
            .enumerate()
            .any(|(i, item)| items[..i].contains(item))
    {
        reasons.push("must not contain duplicate items".to_string());
    }

    if reasons.is_empty() {
        Validation::valid(value.clone())
    } else {
        Validation::Invalid(reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean() {
        let strict = BooleanOptions::default();
        assert_eq!(boolean(&json!(true), &strict), Validation::valid(json!(true)));
        assert!(!boolean(&json!("true"), &strict).is_valid());

        let coerce = BooleanOptions { coerce: true };
        assert_eq!(boolean(&json!("false"), &coerce), Validation::valid(json!(false)));
        assert!(!boolean(&json!("yes"), &coerce).is_valid());
    }

    #[test]
    fn test_email() {
        let opts = EmailOptions::default();
        assert_eq!(
            email(&json!("  Alice@Example.com "), &opts),
            Validation::valid(json!("Alice@Example.com"))
        );
        assert_eq!(
            email(&json!("Alice@Example.com"), &EmailOptions { lowercase: true }),
            Validation::valid(json!("alice@example.com"))
        );
        assert!(!email(&json!("alice@"), &opts).is_valid());
        assert!(!email(&json!("no-at-sign.com"), &opts).is_valid());
        assert!(email(&json!(42), &opts).reasons()[0].contains("int"));
    }

    #[test]
    fn test_string_collects_all_reasons() {
        let opts: StringOptions =
            serde_json::from_value(json!({"minLength": 5, "pattern": "[a-z]+"})).unwrap();
        let result = string(&json!("AB"), &opts);
        assert_eq!(result.reasons().len(), 2);
    }

    #[test]
    fn test_string_trim_and_non_empty() {
        let opts = StringOptions {
            trim: true,
            ..StringOptions::non_empty()
        };
        assert_eq!(string(&json!("  bob "), &opts), Validation::valid(json!("bob")));
        assert_eq!(
            string(&json!("   "), &opts),
            Validation::reject("must not be empty")
        );
    }

    #[test]
    fn test_string_pattern_is_anchored() {
        let opts: StringOptions = serde_json::from_value(json!({"pattern": "[0-9]{4}"})).unwrap();
        assert!(string(&json!("2024"), &opts).is_valid());
        assert!(!string(&json!("x2024x"), &opts).is_valid());
    }

    #[test]
    fn test_string_bad_pattern_fails_to_parse() {
        let parsed: Result<StringOptions, _> = serde_json::from_value(json!({"pattern": "("}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_string_unknown_option_rejected() {
        let parsed: Result<StringOptions, _> = serde_json::from_value(json!({"minLen": 1}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_credit_card() {
        assert_eq!(
            credit_card(&json!("4111 1111 1111 1111")),
            Validation::valid(json!("4111111111111111"))
        );
        assert!(credit_card(&json!(4111111111111111u64)).is_valid());
        assert_eq!(
            credit_card(&json!("4111 1111 1111 1112")),
            Validation::reject("must pass the Luhn checksum")
        );
        assert!(!credit_card(&json!("4111-abcd")).is_valid());
        assert!(!credit_card(&json!("4242")).is_valid());
        assert!(!credit_card(&json!(true)).is_valid());
    }

    #[test]
    fn test_number_bounds() {
        let opts = NumberOptions {
            min: Some(0.0),
            max: Some(10.0),
            integer: true,
            coerce: false,
        };
        assert!(number(&json!(5), &opts).is_valid());
        assert_eq!(number(&json!(11), &opts), Validation::reject("must be at most 10"));
        assert_eq!(number(&json!(-1.5), &opts).reasons().len(), 2);
        assert!(!number(&json!("5"), &opts).is_valid());
    }

    #[test]
    fn test_number_coerce() {
        let opts = NumberOptions {
            coerce: true,
            ..NumberOptions::default()
        };
        assert_eq!(number(&json!(" 42 "), &opts), Validation::valid(json!(42)));
        assert_eq!(number(&json!("2.5"), &opts), Validation::valid(json!(2.5)));
        assert!(!number(&json!("abc"), &opts).is_valid());
    }

    #[test]
    fn test_array() {
        let opts = ArrayOptions {
            min_items: Some(1),
            max_items: Some(3),
            unique: true,
        };
        assert!(array(&json!(["a", "b"]), &opts).is_valid());
        assert_eq!(
            array(&json!([]), &opts),
            Validation::reject("must contain at least 1 items")
        );
        assert_eq!(
            array(&json!(["a", "a"]), &opts),
            Validation::reject("must not contain duplicate items")
        );
        assert!(!array(&json!({"a": 1}), &opts).is_valid());
    }
}
