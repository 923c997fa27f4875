//! Single-invocation pipeline shared by the CLI and library callers.
//!
//! Order of operations:
//!
//! 1. Parse the output format (before any I/O).
//! 2. Load and merge variable sources, in order.
//! 3. Read the template source.
//! 4. Render with a fresh helper catalog and engine.
//! 5. Convert to the output format.
//! 6. Hand the complete buffer to the sink in one call.
//!
//! Nothing is written unless every earlier step succeeded.

use std::io;

use interpolate_core::{variables, OutputFormat, Source};
use interpolate_renderer::{HelperLibrary, TemplateEngine};

use crate::convert::convert;
use crate::error::PipelineError;
use crate::writer::Sink;

/// Inputs for one run.
pub struct Invocation {
    template: Box<dyn Source>,
    variables: Vec<Box<dyn Source>>,
    format: String,
}

impl Invocation {
    /// Render `template` with no variables, preserving its output as-is.
    pub fn new(template: impl Source + 'static) -> Self {
        Self {
            template: Box::new(template),
            variables: Vec::new(),
            format: OutputFormat::Preserve.as_str().to_string(),
        }
    }

    /// Append a variable source; later sources override earlier ones.
    pub fn variables(mut self, source: impl Source + 'static) -> Self {
        self.variables.push(Box::new(source));
        self
    }

    /// Output format name: `preserve`, `json` or `yaml`.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub template: String,
    pub format: OutputFormat,
    pub variables: usize,
    pub bytes_written: usize,
}

/// Run one invocation, writing the converted document to `sink`.
pub fn run<S: Sink>(invocation: Invocation, mut sink: S) -> Result<Summary, PipelineError> {
    let Invocation {
        template,
        variables: sources,
        format,
    } = invocation;

    let format: OutputFormat = format.parse()?;
    let template_id = template.id();
    tracing::debug!(
        "rendering '{}' as {} with {} variable source(s)",
        template_id,
        format,
        sources.len()
    );

    let vars = variables::load(sources)?;
    let text = read_template(&*template)?;

    let engine = TemplateEngine::new(HelperLibrary::standard());
    let parsed = engine.parse(&template_id, &text)?;
    let rendered = engine.render(&parsed, &vars)?;
    let output = convert(&rendered, format, &template_id)?;

    sink.write_output(&output)
        .map_err(|source| PipelineError::Write {
            sink: sink.id(),
            source,
        })?;
    tracing::debug!("wrote {} bytes to {}", output.len(), sink.id());

    Ok(Summary {
        template: template_id,
        format,
        variables: vars.len(),
        bytes_written: output.len(),
    })
}

fn read_template(template: &dyn Source) -> Result<String, PipelineError> {
    let read_err = |source: io::Error| PipelineError::TemplateRead {
        source_id: template.id(),
        source,
    };
    let bytes = template.read().map_err(read_err)?;
    String::from_utf8(bytes)
        .map_err(|e| read_err(io::Error::new(io::ErrorKind::InvalidData, e)))
}
