//! Interpolate — render templates against merged YAML variables.
//!
//! # Usage
//!
//! ```text
//! interpolate render <TEMPLATE> [-l|--vars-file FILE]... [-f|--format preserve|json|yaml] [-o|--output PATH]
//! interpolate helpers [--json]
//! interpolate [-v|--verbose] ...
//! ```
//!
//! Logs go to stderr; `RUST_LOG` overrides the level chosen by `-v`.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{helpers::HelpersArgs, render::RenderArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "interpolate",
    version,
    about = "Render a template against layered YAML variable files",
    long_about = None,
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template and write the result to stdout or a file.
    Render(RenderArgs),

    /// List the helper functions and filters available to templates.
    Helpers(HelpersArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Render(args) => args.run(),
        Commands::Helpers(args) => args.run(),
    }
}
