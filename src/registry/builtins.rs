//! Built-in registry entries

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::engine::ResolveContext;
use crate::schema::{ResolverFn, ValidatorFn};
use crate::validators::{
    self, ArrayOptions, BooleanOptions, EmailOptions, NumberOptions, StringOptions, Validation,
};

use super::{parse_options, Registry};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register_validator_factory("boolean", |options| {
            let opts: BooleanOptions = parse_options(options)?;
            Ok(validator_fn(move |v| validators::boolean(v, &opts)))
        })
        .register_validator_factory("email", |options| {
            let opts: EmailOptions = parse_options(options)?;
            Ok(validator_fn(move |v| validators::email(v, &opts)))
        })
        .register_validator_factory("string", |options| {
            let opts: StringOptions = parse_options(options)?;
            Ok(validator_fn(move |v| validators::string(v, &opts)))
        })
        .register_validator_factory("non_empty_string", |options| {
            let mut opts: StringOptions = parse_options(options)?;
            opts.non_empty = true;
            Ok(validator_fn(move |v| validators::string(v, &opts)))
        })
        .register_validator("credit_card", validators::credit_card)
        .register_validator_factory("number", |options| {
            let opts: NumberOptions = parse_options(options)?;
            Ok(validator_fn(move |v| validators::number(v, &opts)))
        })
        .register_validator_factory("array", |options| {
            let opts: ArrayOptions = parse_options(options)?;
            Ok(validator_fn(move |v| validators::array(v, &opts)))
        });

    registry
        .register_resolver("copy", copy)
        .register_resolver_factory("concat", |options| {
            let opts: ConcatOptions = parse_options(options)?;
            Ok(resolver_fn(move |ctx| Ok(concat(ctx, &opts.separator))))
        })
        .register_resolver("length", length);

    registry
        .register_producer("uuid", || Value::String(Uuid::new_v4().to_string()))
        .register_producer("now", || {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        });
}

fn validator_fn<F>(f: F) -> ValidatorFn
where
    F: Fn(&Value) -> Validation + Send + Sync + 'static,
{
    Arc::new(f)
}

fn resolver_fn<F>(f: F) -> ResolverFn
where
    F: Fn(&ResolveContext<'_>) -> Result<Value, String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Value of the first dependency.
fn copy(ctx: &ResolveContext<'_>) -> Result<Value, String> {
    ctx.dependency()
        .cloned()
        .ok_or_else(|| format!("{} has no resolved dependency", ctx.property()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct ConcatOptions {
    separator: String,
}

/// String forms of every dependency, joined. Strings are used verbatim,
/// nulls are skipped, anything else is rendered as JSON.
fn concat(ctx: &ResolveContext<'_>, separator: &str) -> Value {
    let parts: Vec<String> = ctx
        .dependencies()
        .filter(|(_, v)| !v.is_null())
        .map(|(_, v)| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    Value::String(parts.join(separator))
}

/// Characters of a string, items of an array or keys of an object.
fn length(ctx: &ResolveContext<'_>) -> Result<Value, String> {
    match ctx.dependency() {
        Some(Value::String(s)) => Ok(Value::from(s.chars().count())),
        Some(Value::Array(items)) => Ok(Value::from(items.len())),
        Some(Value::Object(map)) => Ok(Value::from(map.len())),
        Some(other) => Err(format!(
            "cannot take the length of {}",
            validators::json_type_name(other)
        )),
        None => Err(format!("{} has no resolved dependency", ctx.property())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn ctx_with<'a>(
        deps: &'a [String],
        resolved: &'a Map<String, Value>,
        input: &'a Map<String, Value>,
    ) -> ResolveContext<'a> {
        ResolveContext::new("out", deps, resolved, input)
    }

    #[test]
    fn test_builtin_validators_wire_options() {
        let registry = Registry::with_builtins();
        let v = registry.validator("number", &json!({"max": 3})).unwrap();
        assert!(v(&json!(2)).is_valid());
        assert!(!v(&json!(4)).is_valid());

        let v = registry.validator("non_empty_string", &Value::Null).unwrap();
        assert!(!v(&json!("")).is_valid());

        let v = registry.validator("credit_card", &Value::Null).unwrap();
        assert!(v(&json!("4111111111111111")).is_valid());
    }

    #[test]
    fn test_concat_and_copy() {
        let deps = vec!["first".to_string(), "middle".to_string(), "last".to_string()];
        let resolved = json!({"first": "Ada", "middle": null, "last": "Lovelace"});
        let input = Map::new();
        let ctx = ctx_with(&deps, resolved.as_object().unwrap(), &input);

        assert_eq!(concat(&ctx, " "), json!("Ada Lovelace"));
        assert_eq!(copy(&ctx), Ok(json!("Ada")));
    }

    #[test]
    fn test_concat_options_from_registry() {
        let registry = Registry::with_builtins();
        let resolver = registry.resolver("concat", &json!({"separator": "-"})).unwrap();

        let deps = vec!["a".to_string(), "b".to_string()];
        let resolved = json!({"a": "x", "b": 2});
        let input = Map::new();
        let ctx = ctx_with(&deps, resolved.as_object().unwrap(), &input);
        assert_eq!(resolver(&ctx), Ok(json!("x-2")));
    }

    #[test]
    fn test_length() {
        let deps = vec!["tags".to_string()];
        let input = Map::new();

        let resolved = json!({"tags": ["a", "b", "c"]});
        let ctx = ctx_with(&deps, resolved.as_object().unwrap(), &input);
        assert_eq!(length(&ctx), Ok(json!(3)));

        let resolved = json!({"tags": true});
        let ctx = ctx_with(&deps, resolved.as_object().unwrap(), &input);
        assert!(length(&ctx).is_err());
    }

    #[test]
    fn test_producers() {
        let registry = Registry::with_builtins();
        let id = registry.producer("uuid").unwrap()();
        assert!(Uuid::parse_str(id.as_str().unwrap()).is_ok());

        let now = registry.producer("now").unwrap()();
        assert!(chrono::DateTime::parse_from_rfc3339(now.as_str().unwrap()).is_ok());
    }
}
