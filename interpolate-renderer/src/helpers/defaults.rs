//! Defaulting helpers.
//!
//! "Empty" follows template truthiness: none, `false`, `0`, `""` and empty
//! sequences or mappings.

use minijinja::value::Rest;
use minijinja::{Error, Value};

use super::{Helper, HelperKind};
use crate::error::HelperError;

/// First non-empty argument, or none.
pub fn coalesce(values: Rest<Value>) -> Value {
    values
        .0
        .into_iter()
        .find(Value::is_true)
        .unwrap_or_else(|| Value::from(()))
}

/// `cond | ternary(a, b)` is `a` when `cond` is truthy, else `b`.
pub fn ternary(condition: Value, when_true: Value, when_false: Value) -> Value {
    if condition.is_true() {
        when_true
    } else {
        when_false
    }
}

/// Pass `value` through, failing with `message` when it is none or an empty
/// string.
pub fn required(value: Value, message: Option<String>) -> Result<Value, Error> {
    let missing = value.is_none() || value.is_undefined() || value.as_str() == Some("");
    if missing {
        let message = message.unwrap_or_else(|| "a required value is empty".to_string());
        return Err(HelperError::Required(message).into());
    }
    Ok(value)
}

pub(super) fn helpers() -> Vec<Helper> {
    vec![
        Helper::new(
            "coalesce",
            HelperKind::Function,
            "coalesce(a, b, ...): first non-empty argument",
            |env, name| env.add_function(name, coalesce),
        ),
        Helper::new(
            "ternary",
            HelperKind::Filter,
            "cond | ternary(a, b): a if cond is truthy, else b",
            |env, name| env.add_filter(name, ternary),
        ),
        Helper::new(
            "required",
            HelperKind::Filter,
            "value | required(message): fail rendering when value is empty",
            |env, name| env.add_filter(name, required),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesce_skips_empty_values() {
        let picked = coalesce(Rest(vec![
            Value::from(()),
            Value::from(""),
            Value::from(0),
            Value::from("fallback"),
        ]));
        assert_eq!(picked.as_str(), Some("fallback"));
        assert!(coalesce(Rest(vec![])).is_none());
    }

    #[test]
    fn ternary_follows_truthiness() {
        assert_eq!(ternary(Value::from(true), Value::from(1), Value::from(2)), Value::from(1));
        assert_eq!(ternary(Value::from(""), Value::from(1), Value::from(2)), Value::from(2));
    }

    #[test]
    fn required_rejects_empty_strings() {
        let err = required(Value::from(""), Some("image tag is required".into())).unwrap_err();
        assert!(err.to_string().contains("image tag is required"));
        assert_eq!(required(Value::from(0), None).unwrap(), Value::from(0));
    }
}
