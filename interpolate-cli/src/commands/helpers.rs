//! `interpolate helpers` — list the helper catalog.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use interpolate_renderer::HelperLibrary;

/// Arguments for `interpolate helpers`.
#[derive(Args, Debug)]
pub struct HelpersArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct HelperRow {
    #[tabled(rename = "name")]
    name: &'static str,
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "usage")]
    summary: &'static str,
}

impl HelpersArgs {
    pub fn run(self) -> Result<()> {
        let mut rows: Vec<HelperRow> = HelperLibrary::standard()
            .iter()
            .map(|h| HelperRow {
                name: h.name(),
                kind: h.kind().to_string(),
                summary: h.summary(),
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(b.name));

        if self.json {
            let payload =
                serde_json::to_string_pretty(&rows).context("failed to encode helper list")?;
            println!("{payload}");
            return Ok(());
        }

        let count = rows.len();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("{count} helpers; MiniJinja built-in filters are also available.");
        Ok(())
    }
}
