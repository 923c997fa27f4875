//! List and mapping helpers.

use minijinja::value::{Rest, ValueKind};
use minijinja::{Error, Value};

use super::{Helper, HelperKind};
use crate::error::HelperError;

fn expect_map(helper: &'static str, value: &Value) -> Result<(), Error> {
    if value.kind() == ValueKind::Map {
        Ok(())
    } else {
        Err(HelperError::invalid(helper, format!("expected a mapping, got {:?}", value.kind())).into())
    }
}

fn expect_seq(helper: &'static str, value: &Value) -> Result<(), Error> {
    match value.kind() {
        ValueKind::Seq | ValueKind::Iterable => Ok(()),
        other => Err(HelperError::invalid(helper, format!("expected a list, got {other:?}")).into()),
    }
}

fn entries(helper: &'static str, map: &Value) -> Result<Vec<(Value, Value)>, Error> {
    expect_map(helper, map)?;
    map.try_iter()?
        .map(|key| {
            let value = map.get_item(&key)?;
            Ok((key, value))
        })
        .collect()
}

pub fn list(values: Rest<Value>) -> Value {
    Value::from(values.0)
}

pub fn keys(map: Value) -> Result<Value, Error> {
    expect_map("keys", &map)?;
    Ok(Value::from(map.try_iter()?.collect::<Vec<_>>()))
}

pub fn values(map: Value) -> Result<Value, Error> {
    let values: Vec<Value> = entries("values", &map)?.into_iter().map(|(_, v)| v).collect();
    Ok(Value::from(values))
}

pub fn has_key(map: Value, key: Value) -> Result<bool, Error> {
    expect_map("has_key", &map)?;
    Ok(!map.get_item(&key)?.is_undefined())
}

/// Shallow merge; keys from later mappings replace earlier ones.
pub fn merge(base: Value, overrides: Rest<Value>) -> Result<Value, Error> {
    let mut merged = entries("merge", &base)?;
    for map in overrides.0 {
        merged.extend(entries("merge", &map)?);
    }
    Ok(merged.into_iter().collect())
}

pub fn pick(map: Value, keys: Rest<Value>) -> Result<Value, Error> {
    Ok(entries("pick", &map)?
        .into_iter()
        .filter(|(k, _)| keys.0.contains(k))
        .collect())
}

pub fn omit(map: Value, keys: Rest<Value>) -> Result<Value, Error> {
    Ok(entries("omit", &map)?
        .into_iter()
        .filter(|(k, _)| !keys.0.contains(k))
        .collect())
}

/// Drop empty items (none, `false`, `0`, `""`, empty collections).
pub fn compact(items: Value) -> Result<Value, Error> {
    expect_seq("compact", &items)?;
    Ok(Value::from(items.try_iter()?.filter(Value::is_true).collect::<Vec<_>>()))
}

pub fn concat(first: Value, rest: Rest<Value>) -> Result<Value, Error> {
    let mut out = Vec::new();
    for items in std::iter::once(first).chain(rest.0) {
        expect_seq("concat", &items)?;
        out.extend(items.try_iter()?);
    }
    Ok(Value::from(out))
}

pub(super) fn helpers() -> Vec<Helper> {
    vec![
        Helper::new(
            "list",
            HelperKind::Function,
            "list(a, b, ...): build a list",
            |env, name| env.add_function(name, list),
        ),
        Helper::new(
            "keys",
            HelperKind::Filter,
            "map | keys: list of keys",
            |env, name| env.add_filter(name, keys),
        ),
        Helper::new(
            "values",
            HelperKind::Filter,
            "map | values: list of values",
            |env, name| env.add_filter(name, values),
        ),
        Helper::new(
            "has_key",
            HelperKind::Filter,
            "map | has_key(key): whether key is present",
            |env, name| env.add_filter(name, has_key),
        ),
        Helper::new(
            "merge",
            HelperKind::Filter,
            "map | merge(other, ...): shallow merge, later keys win",
            |env, name| env.add_filter(name, merge),
        ),
        Helper::new(
            "pick",
            HelperKind::Filter,
            "map | pick(key, ...): only the named keys",
            |env, name| env.add_filter(name, pick),
        ),
        Helper::new(
            "omit",
            HelperKind::Filter,
            "map | omit(key, ...): all but the named keys",
            |env, name| env.add_filter(name, omit),
        ),
        Helper::new(
            "compact",
            HelperKind::Filter,
            "list | compact: drop empty items",
            |env, name| env.add_filter(name, compact),
        ),
        Helper::new(
            "concat",
            HelperKind::Filter,
            "list | concat(other, ...): join lists",
            |env, name| env.add_filter(name, concat),
        ),
    ]
}
