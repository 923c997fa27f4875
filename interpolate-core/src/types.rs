//! Domain types shared by the loader, renderer and output stages.
//!
//! Variable values are held as `serde_json::Value`, i.e. the JSON-compatible
//! view of whatever YAML the variable files contained.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UnsupportedFormat;

// ---------------------------------------------------------------------------
// VariableSet
// ---------------------------------------------------------------------------

/// The merged namespace handed to the renderer.
///
/// Keys are top-level variable names. Merging is shallow: a key present in a
/// later set replaces the earlier value wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableSet(BTreeMap<String, Value>);

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Set `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    /// Shallow last-wins merge: every top-level key of `later` overwrites
    /// the entry in `self`. Nested mappings and lists are not combined.
    pub fn merge(&mut self, later: VariableSet) {
        for (name, value) in later.0 {
            if self.0.insert(name.clone(), value).is_some() {
                tracing::trace!("variable '{name}' overwritten by a later source");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut set = VariableSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

/// Serialization applied to rendered output. Closed set; unknown names are
/// rejected by [`FromStr`] rather than mapped to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rendered bytes pass through untouched.
    #[default]
    Preserve,
    /// Parsed as YAML/JSON and re-emitted as compact JSON.
    Json,
    /// Parsed as YAML/JSON and re-emitted as normalized YAML.
    Yaml,
}

impl OutputFormat {
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Preserve, OutputFormat::Json, OutputFormat::Yaml]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Preserve => "preserve",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preserve" => Ok(OutputFormat::Preserve),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}
