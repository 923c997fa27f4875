//! Error types for interpolate-renderer.

use thiserror::Error;

/// All errors that can arise from parsing or rendering a template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template text could not be parsed.
    #[error("template '{path}' is not a valid template: {source}")]
    Syntax {
        path: String,
        #[source]
        source: minijinja::Error,
    },

    /// The template references a variable (or mapping key) that no source defined.
    #[error("template '{path}' references undefined variable '{name}'")]
    UndefinedVariable { path: String, name: String },

    /// A helper function rejected its input.
    #[error("failed to render template '{path}': {source}")]
    Helper {
        path: String,
        #[source]
        source: HelperError,
    },

    /// Any other evaluation failure reported by the engine.
    #[error("failed to render template '{path}': {source}")]
    Evaluation {
        path: String,
        #[source]
        source: minijinja::Error,
    },
}

impl RenderError {
    /// Template path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            RenderError::Syntax { path, .. }
            | RenderError::UndefinedVariable { path, .. }
            | RenderError::Helper { path, .. }
            | RenderError::Evaluation { path, .. } => path,
        }
    }
}

/// Failures raised by helper functions. Every helper is pure, so the same
/// input always produces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelperError {
    /// Malformed CIDR notation.
    #[error("invalid CIDR expression '{input}': {reason}")]
    InvalidCidr { input: String, reason: String },

    /// Host number outside the network's address block.
    #[error("prefix of {prefix_len} does not accommodate a host numbered {host}")]
    HostOutOfRange { prefix_len: u8, host: i64 },

    /// Subnet selection outside what the prefix can be extended to.
    #[error("cannot extend prefix {network} by {newbits} bits to select subnet {netnum}")]
    SubnetOutOfRange {
        network: String,
        newbits: i64,
        netnum: i64,
    },

    /// `required` received an empty value.
    #[error("{0}")]
    Required(String),

    /// Argument of the wrong shape for the helper.
    #[error("{helper}: {message}")]
    InvalidArgument {
        helper: &'static str,
        message: String,
    },
}

impl HelperError {
    pub(crate) fn invalid(helper: &'static str, message: impl Into<String>) -> Self {
        HelperError::InvalidArgument {
            helper,
            message: message.into(),
        }
    }

    /// `true` for the two out-of-range variants.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            HelperError::HostOutOfRange { .. } | HelperError::SubnetOutOfRange { .. }
        )
    }
}

impl From<HelperError> for minijinja::Error {
    fn from(err: HelperError) -> Self {
        minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, err.to_string())
            .with_source(err)
    }
}
