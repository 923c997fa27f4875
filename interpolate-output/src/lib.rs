//! # interpolate-output
//!
//! Format conversion, output sinks and the end-to-end pipeline.
//!
//! Call [`run`] with an [`Invocation`] and a [`Sink`] to render one template.
//!
//! ```rust,no_run
//! use interpolate_core::FileSource;
//! use interpolate_output::{run, Invocation, StdoutSink};
//!
//! let invocation = Invocation::new(FileSource::new("service.yaml.tpl"))
//!     .variables(FileSource::new("defaults.yaml"))
//!     .variables(FileSource::new("prod.yaml"))
//!     .format("json");
//! if let Err(e) = run(invocation, StdoutSink) {
//!     eprintln!("{e}");
//! }
//! ```

pub mod convert;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use convert::convert;
pub use error::{ConvertError, ErrorKind, PipelineError};
pub use pipeline::{run, Invocation, Summary};
pub use writer::{FileSink, Sink, StdoutSink};
