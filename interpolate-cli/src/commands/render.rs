//! `interpolate render` — render one template.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use interpolate_core::FileSource;
use interpolate_output::{run, FileSink, Invocation, StdoutSink, Summary};

/// Arguments for `interpolate render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template file to render.
    pub template: PathBuf,

    /// YAML variable file; repeat to layer files, later files win.
    #[arg(short = 'l', long = "vars-file", value_name = "FILE")]
    pub vars_files: Vec<PathBuf>,

    /// Output format: preserve, json or yaml.
    #[arg(short, long, default_value = "preserve")]
    pub format: String,

    /// Write to this file (atomically) instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let invocation = self
            .vars_files
            .iter()
            .fold(Invocation::new(FileSource::new(&self.template)), |inv, path| {
                inv.variables(FileSource::new(path))
            })
            .format(self.format.as_str());

        let failed = || format!("failed to render '{}'", self.template.display());
        match &self.output {
            Some(path) => {
                let summary = run(invocation, FileSink::new(path)).with_context(failed)?;
                print_summary(&summary, path);
            }
            None => {
                run(invocation, StdoutSink).with_context(failed)?;
            }
        }
        Ok(())
    }
}

fn print_summary(summary: &Summary, path: &std::path::Path) {
    println!(
        "{} '{}' → {} ({}, {} bytes, {} variables)",
        "✓".green().bold(),
        summary.template,
        path.display(),
        summary.format,
        summary.bytes_written,
        summary.variables,
    );
}
