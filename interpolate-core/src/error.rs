//! Error types for interpolate-core.

use thiserror::Error;

/// All errors that can arise while loading variable sources.
#[derive(Debug, Error)]
pub enum VariableError {
    /// The source could not be read (file not found, permission denied, etc.).
    #[error("unable to read input file at '{source_id}': {source}")]
    Read {
        source_id: String,
        #[source]
        source: std::io::Error,
    },

    /// The source is not valid YAML/JSON — includes line context from serde_yaml.
    #[error("expected '{source_id}' to be a valid YAML file: {source}")]
    Parse {
        source_id: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The source parsed, but its top level is not a mapping.
    #[error("expected '{source_id}' to contain a mapping at the top level, found {found}")]
    NotAMapping { source_id: String, found: &'static str },

    /// A mapping key is a sequence or mapping and has no string form.
    #[error("expected '{source_id}' to use scalar mapping keys, found {found}")]
    InvalidKey { source_id: String, found: &'static str },

    /// `.nan` or `.inf`; variables must be representable as JSON.
    #[error("expected '{source_id}' to contain only finite numbers, found {value}")]
    NonFiniteNumber { source_id: String, value: String },
}

/// The requested output format is not one of `preserve`, `json`, `yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported output type '{format}'; expected: preserve, json, yaml")]
pub struct UnsupportedFormat {
    pub format: String,
}
