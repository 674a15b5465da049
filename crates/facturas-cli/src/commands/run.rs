//! Run command - the full extract/merge/flatten/report pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use facturas_core::extract::{Extractor, VisionExtractor};
use facturas_core::models::config::FacturasConfig;
use facturas_core::{cache, flatten, merge, report, scan};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Folder holding the invoice photographs
    #[arg(required = true)]
    image_dir: PathBuf,

    /// Output folder for cached results, merged snapshot, and report
    #[arg(required = true)]
    output_dir: PathBuf,
}

/// Outcome of the per-image extraction phase.
struct ExtractionStats {
    extracted: usize,
    cached: usize,
    failed: Vec<(PathBuf, String)>,
}

pub async fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        FacturasConfig::from_file(std::path::Path::new(path))?
    } else {
        FacturasConfig::default()
    };

    if !args.image_dir.is_dir() {
        anyhow::bail!("Image folder not found: {}", args.image_dir.display());
    }
    ensure_output_dir(&args.output_dir)?;

    let images = scan::list_images(&args.image_dir)?;
    println!(
        "{} Found {} images to process",
        style("ℹ").blue(),
        images.len()
    );

    let extractor = VisionExtractor::from_config(&config.api)?;
    let stats = extract_missing(&extractor, &images, &args.output_dir).await;

    // A failure in any of the remaining stages aborts the whole run.
    let snapshot = merge::merge(&args.output_dir)?;
    let records = flatten::flatten(&snapshot)?;
    let report_path = args.output_dir.join(report::REPORT_FILENAME);
    report::write_report(&records, &report_path, &config.report.sheet_name)?;

    println!();
    println!(
        "{} Wrote {} rows to {} in {:?}",
        style("✓").green(),
        records.len(),
        report_path.display(),
        start.elapsed()
    );
    println!(
        "   {} extracted, {} cached, {} failed",
        style(stats.extracted).green(),
        style(stats.cached).blue(),
        style(stats.failed.len()).red()
    );

    if !stats.failed.is_empty() {
        println!();
        println!("{}", style("Failed images:").red());
        for (path, error) in &stats.failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

/// Extract every image that has no cached result yet, one at a time.
///
/// A per-image failure is logged and skipped; the pipeline continues
/// with the next image.
async fn extract_missing(
    extractor: &impl Extractor,
    images: &[PathBuf],
    output_dir: &Path,
) -> ExtractionStats {
    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut stats = ExtractionStats {
        extracted: 0,
        cached: 0,
        failed: Vec::new(),
    };

    for image in images {
        if !cache::should_process(output_dir, image) {
            info!(path = %image.display(), "Skipping, cached result exists");
            stats.cached += 1;
            pb.inc(1);
            continue;
        }

        match extract_one(extractor, image, output_dir).await {
            Ok(()) => stats.extracted += 1,
            Err(e) => {
                warn!(path = %image.display(), error = %e, "Extraction failed, skipping image");
                stats.failed.push((image.clone(), e.to_string()));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Complete");
    stats
}

async fn extract_one(
    extractor: &impl Extractor,
    image: &Path,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let entry = extractor.extract(image).await?;
    let path = cache::result_path(output_dir, image);
    cache::store(&path, &entry)?;
    info!(path = %path.display(), "Stored extraction result");
    Ok(())
}

fn ensure_output_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        info!(path = %dir.display(), "Output folder already exists");
    } else {
        fs::create_dir_all(dir)?;
        info!(path = %dir.display(), "Created output folder");
    }
    Ok(())
}
