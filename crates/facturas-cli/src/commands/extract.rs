//! Extract command - structured data from a single invoice photo.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use facturas_core::extract::{Extractor, VisionExtractor};
use facturas_core::models::config::FacturasConfig;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input image (png, jpg, jpeg)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    // Load configuration
    let config = if let Some(path) = config_path {
        FacturasConfig::from_file(std::path::Path::new(path))?
    } else {
        FacturasConfig::default()
    };

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extractor = VisionExtractor::from_config(&config.api)?;
    let entry = extractor.extract(&args.input).await?;
    let json = serde_json::to_string_pretty(&entry)?;

    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            println!(
                "{} Result written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
