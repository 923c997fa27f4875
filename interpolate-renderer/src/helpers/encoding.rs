//! Encoding helpers: base64, SHA-256 digests and JSON/YAML serialization of
//! template values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use minijinja::{Error, Value};
use sha2::{Digest, Sha256};

use super::{Helper, HelperKind};
use crate::error::HelperError;

pub fn b64enc(value: String) -> String {
    STANDARD.encode(value.as_bytes())
}

pub fn b64dec(value: String) -> Result<String, Error> {
    let bytes = STANDARD
        .decode(value.trim())
        .map_err(|e| HelperError::invalid("b64dec", e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|_| HelperError::invalid("b64dec", "decoded bytes are not UTF-8").into())
}

/// Lowercase hex SHA-256 of the UTF-8 bytes.
pub fn sha256sum(value: String) -> String {
    let mut h = Sha256::new();
    h.update(value.as_bytes());
    hex::encode(h.finalize())
}

/// Compact JSON encoding of any template value.
pub fn to_json(value: Value) -> Result<String, Error> {
    serde_json::to_string(&value).map_err(|e| HelperError::invalid("to_json", e.to_string()).into())
}

/// YAML encoding without the trailing newline, for embedding in templates.
pub fn to_yaml(value: Value) -> Result<String, Error> {
    let yaml = serde_yaml::to_string(&value)
        .map_err(|e| HelperError::invalid("to_yaml", e.to_string()))?;
    Ok(yaml.trim_end_matches('\n').to_string())
}

pub(super) fn helpers() -> Vec<Helper> {
    vec![
        Helper::new(
            "b64enc",
            HelperKind::Filter,
            "value | b64enc: standard base64 encoding",
            |env, name| env.add_filter(name, b64enc),
        ),
        Helper::new(
            "b64dec",
            HelperKind::Filter,
            "value | b64dec: decode standard base64 to text",
            |env, name| env.add_filter(name, b64dec),
        ),
        Helper::new(
            "sha256sum",
            HelperKind::Filter,
            "value | sha256sum: hex SHA-256 digest",
            |env, name| env.add_filter(name, sha256sum),
        ),
        Helper::new(
            "to_json",
            HelperKind::Filter,
            "value | to_json: compact JSON encoding",
            |env, name| env.add_filter(name, to_json),
        ),
        Helper::new(
            "to_yaml",
            HelperKind::Filter,
            "value | to_yaml: YAML encoding",
            |env, name| env.add_filter(name, to_yaml),
        ),
    ]
}
