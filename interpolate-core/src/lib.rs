//! Interpolate core library — variable sources, the merged variable set,
//! output formats and errors.
//!
//! - [`source`] — the byte-source abstraction ([`Source`], [`FileSource`], [`BytesSource`])
//! - [`types`] — [`VariableSet`] and [`OutputFormat`]
//! - [`variables`] — load and merge variable sources
//! - [`error`] — [`VariableError`] and [`UnsupportedFormat`]

pub mod error;
pub mod source;
pub mod types;
pub mod variables;

pub use error::{UnsupportedFormat, VariableError};
pub use source::{BytesSource, FileSource, Source};
pub use types::{OutputFormat, VariableSet};
