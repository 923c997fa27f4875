//! Error types for interpolate-output.

use std::fmt;

use thiserror::Error;

use interpolate_core::{UnsupportedFormat, VariableError};
use interpolate_renderer::RenderError;

/// The rendered document could not be re-encoded in the requested format.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Rendered output is not valid YAML/JSON.
    #[error("template '{origin}' is not valid YAML/JSON: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Parsed, but could not be encoded as JSON (e.g. a mapping used as a key).
    #[error("template '{origin}' cannot be encoded as JSON: {source}")]
    EncodeJson {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// `.nan`/`.inf` have no JSON encoding.
    #[error("template '{origin}' cannot be encoded as JSON: non-finite number {value}")]
    NonFiniteNumber { origin: String, value: String },

    /// Parsed, but could not be re-encoded as YAML.
    #[error("template '{origin}' cannot be encoded as YAML: {source}")]
    EncodeYaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// All errors that can end an invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    #[error(transparent)]
    Variables(#[from] VariableError),

    /// The template source could not be read.
    #[error("unable to read template file at '{source_id}': {source}")]
    TemplateRead {
        source_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The sink rejected the output.
    #[error("unable to write output to '{sink}': {source}")]
    Write {
        sink: String,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Read,
    Parse,
    TemplateSyntax,
    UndefinedVariable,
    Render,
    FormatConversion,
    UnsupportedFormat,
    Write,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Read => "read error",
            ErrorKind::Parse => "parse error",
            ErrorKind::TemplateSyntax => "template syntax error",
            ErrorKind::UndefinedVariable => "undefined variable",
            ErrorKind::Render => "render error",
            ErrorKind::FormatConversion => "format conversion error",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::Write => "write error",
        };
        f.write_str(s)
    }
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            PipelineError::Variables(VariableError::Read { .. }) => ErrorKind::Read,
            PipelineError::Variables(_) => ErrorKind::Parse,
            PipelineError::TemplateRead { .. } => ErrorKind::Read,
            PipelineError::Render(RenderError::Syntax { .. }) => ErrorKind::TemplateSyntax,
            PipelineError::Render(RenderError::UndefinedVariable { .. }) => {
                ErrorKind::UndefinedVariable
            }
            PipelineError::Render(_) => ErrorKind::Render,
            PipelineError::Convert(_) => ErrorKind::FormatConversion,
            PipelineError::Write { .. } => ErrorKind::Write,
        }
    }
}
