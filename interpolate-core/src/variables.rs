//! Variable loading — read every source in order and merge the results.
//!
//! Each source must be a YAML (or JSON) document whose top level is a
//! mapping. An empty document contributes nothing. Sources are merged
//! shallowly: for every top-level key, the value from the source processed
//! last wins entirely.

use serde_json::{Map, Number, Value as Json};
use serde_yaml::Value as Yaml;

use crate::error::VariableError;
use crate::source::Source;
use crate::types::VariableSet;

/// Load and merge `sources` in order.
///
/// Stops at the first source that cannot be read or parsed; later sources
/// are not touched.
pub fn load<I>(sources: I) -> Result<VariableSet, VariableError>
where
    I: IntoIterator,
    I::Item: Source,
{
    let mut merged = VariableSet::new();
    for source in sources {
        let vars = load_one(&source)?;
        tracing::debug!("loaded {} variable(s) from {}", vars.len(), source.id());
        merged.merge(vars);
    }
    Ok(merged)
}

/// Read and parse a single source into a [`VariableSet`].
pub fn load_one<S: Source + ?Sized>(source: &S) -> Result<VariableSet, VariableError> {
    let source_id = source.id();
    let bytes = source.read().map_err(|e| VariableError::Read {
        source_id: source_id.clone(),
        source: e,
    })?;
    parse(&source_id, &bytes)
}

/// Parse raw bytes as a top-level mapping.
pub fn parse(source_id: &str, bytes: &[u8]) -> Result<VariableSet, VariableError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(VariableSet::new());
    }

    let parse_err = |source: serde_yaml::Error| VariableError::Parse {
        source_id: source_id.to_string(),
        source,
    };
    let mut document: Yaml = serde_yaml::from_slice(bytes).map_err(parse_err)?;
    document.apply_merge().map_err(parse_err)?;

    let mapping = match document {
        Yaml::Null => return Ok(VariableSet::new()),
        Yaml::Mapping(mapping) => mapping,
        Yaml::Tagged(tagged) => match tagged.value {
            Yaml::Mapping(mapping) => mapping,
            other => return Err(not_a_mapping(source_id, &other)),
        },
        other => return Err(not_a_mapping(source_id, &other)),
    };

    let mut vars = VariableSet::new();
    for (key, value) in mapping {
        let name = key_string(source_id, &key)?;
        vars.insert(name, to_json(source_id, value)?);
    }
    Ok(vars)
}

fn not_a_mapping(source_id: &str, value: &Yaml) -> VariableError {
    VariableError::NotAMapping {
        source_id: source_id.to_string(),
        found: kind_name(value),
    }
}

fn kind_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "a boolean",
        Yaml::Number(_) => "a number",
        Yaml::String(_) => "a string",
        Yaml::Sequence(_) => "a sequence",
        Yaml::Mapping(_) => "a mapping",
        Yaml::Tagged(_) => "a tagged value",
    }
}

/// Scalar keys become their string form (`1:` is the key `"1"`).
fn key_string(source_id: &str, key: &Yaml) -> Result<String, VariableError> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(VariableError::InvalidKey {
            source_id: source_id.to_string(),
            found: kind_name(other),
        }),
    }
}

fn to_json(source_id: &str, value: Yaml) -> Result<Json, VariableError> {
    Ok(match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Json::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Json::Number)
                    .ok_or_else(|| VariableError::NonFiniteNumber {
                        source_id: source_id.to_string(),
                        value: n.to_string(),
                    })?
            }
        }
        Yaml::String(s) => Json::String(s),
        Yaml::Sequence(items) => Json::Array(
            items
                .into_iter()
                .map(|item| to_json(source_id, item))
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                object.insert(key_string(source_id, &key)?, to_json(source_id, value)?);
            }
            Json::Object(object)
        }
        Yaml::Tagged(tagged) => to_json(source_id, tagged.value)?,
    })
}
