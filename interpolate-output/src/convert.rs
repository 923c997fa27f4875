//! Post-render format conversion.
//!
//! `json` and `yaml` both parse the rendered bytes as YAML first (JSON is a
//! subset), so a template may emit either syntax whatever the target. Key
//! order of the rendered document is kept.

use interpolate_core::OutputFormat;

use crate::error::ConvertError;

/// Convert `rendered` to `format`. `origin` names the template in errors.
pub fn convert(rendered: &[u8], format: OutputFormat, origin: &str) -> Result<Vec<u8>, ConvertError> {
    match format {
        OutputFormat::Preserve => Ok(rendered.to_vec()),
        OutputFormat::Json => {
            let doc = parse(rendered, origin)?;
            if let Some(value) = non_finite(&doc) {
                return Err(ConvertError::NonFiniteNumber {
                    origin: origin.to_string(),
                    value,
                });
            }
            serde_json::to_vec(&doc).map_err(|source| ConvertError::EncodeJson {
                origin: origin.to_string(),
                source,
            })
        }
        OutputFormat::Yaml => {
            let doc = parse(rendered, origin)?;
            serde_yaml::to_string(&doc)
                .map(String::into_bytes)
                .map_err(|source| ConvertError::EncodeYaml {
                    origin: origin.to_string(),
                    source,
                })
        }
    }
}

/// Parse and expand `<<` merge keys.
fn parse(rendered: &[u8], origin: &str) -> Result<serde_yaml::Value, ConvertError> {
    let parse_err = |source: serde_yaml::Error| ConvertError::Parse {
        origin: origin.to_string(),
        source,
    };
    let mut doc: serde_yaml::Value = serde_yaml::from_slice(rendered).map_err(parse_err)?;
    doc.apply_merge().map_err(parse_err)?;
    Ok(doc)
}

/// First `.nan`/`.inf` in `value`; JSON has no encoding for them.
fn non_finite(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::Number(n) if n.is_nan() || n.is_infinite() => Some(n.to_string()),
        Value::Sequence(items) => items.iter().find_map(non_finite),
        Value::Mapping(mapping) => mapping
            .iter()
            .find_map(|(k, v)| non_finite(k).or_else(|| non_finite(v))),
        Value::Tagged(tagged) => non_finite(&tagged.value),
        _ => None,
    }
}
