//! Report command - rebuild the spreadsheet from cached results only.
//!
//! Makes no model calls, so an operator can regenerate the report
//! offline after hand-fixing or deleting cached result files.

use std::path::PathBuf;

use clap::Args;
use console::style;

use facturas_core::models::config::FacturasConfig;
use facturas_core::{flatten, merge, report};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Output folder holding the cached results
    #[arg(required = true)]
    output_dir: PathBuf,
}

pub async fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    // Load configuration
    let config = if let Some(path) = config_path {
        FacturasConfig::from_file(std::path::Path::new(path))?
    } else {
        FacturasConfig::default()
    };

    if !args.output_dir.is_dir() {
        anyhow::bail!("Output folder not found: {}", args.output_dir.display());
    }

    let snapshot = merge::merge(&args.output_dir)?;
    let records = flatten::flatten(&snapshot)?;
    let report_path = args.output_dir.join(report::REPORT_FILENAME);
    report::write_report(&records, &report_path, &config.report.sheet_name)?;

    println!(
        "{} Wrote {} rows to {}",
        style("✓").green(),
        records.len(),
        report_path.display()
    );

    Ok(())
}
