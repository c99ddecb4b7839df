//! Batch command for reading multiple scoreboard photos.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, warn};

use flipperslog_core::VisionOutcome;

use super::Context;
use super::output::{OutputFormat, Row, render_list};
use super::read::{save_outcome, score_reader};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the photos
    #[arg(required = true)]
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Store every authoritative reading in the score book
    #[arg(long)]
    save: bool,

    /// Also write a summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

/// Reading of a single photo.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhotoResult {
    path: PathBuf,
    #[serde(flatten)]
    outcome: VisionOutcome,
    processing_time_ms: u64,
}

impl Row for PhotoResult {
    fn header() -> &'static [&'static str] {
        &["filename", "status", "score", "table", "processing_time_ms", "error"]
    }

    fn record(&self) -> Vec<String> {
        let filename = self.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if self.outcome.is_mock_data {
            vec![
                filename.to_string(),
                "placeholder".to_string(),
                String::new(),
                String::new(),
                self.processing_time_ms.to_string(),
                self.outcome.error.clone().unwrap_or_default(),
            ]
        } else {
            vec![
                filename.to_string(),
                "success".to_string(),
                self.outcome.score.to_string(),
                self.outcome.table_name.clone().unwrap_or_default(),
                self.processing_time_ms.to_string(),
                String::new(),
            ]
        }
    }

    fn text(&self) -> String {
        let name = self.path.display();
        if self.outcome.is_mock_data {
            format!(
                "{} {}: {}",
                style("✗").red(),
                name,
                self.outcome.error.as_deref().unwrap_or("unknown error")
            )
        } else {
            format!(
                "{} {}: {} on {}",
                style("✓").green(),
                name,
                self.outcome.score,
                self.outcome.table_name.as_deref().unwrap_or("unknown table")
            )
        }
    }
}

pub async fn run(args: BatchArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_photo(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching photos found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} photos to read", style("ℹ").blue(), files.len());

    let reader = score_reader(ctx)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} photos")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let photo_start = Instant::now();
        let outcome = reader.analyze_photo(&path).await;
        let processing_time_ms = photo_start.elapsed().as_millis() as u64;
        debug!("Read {} in {}ms", path.display(), processing_time_ms);

        results.push(PhotoResult {
            path,
            outcome,
            processing_time_ms,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("{}", render_list(&results, args.format)?);

    if args.save {
        for result in results.iter().filter(|r| !r.outcome.is_mock_data) {
            if let Err(e) = save_outcome(ctx, result.outcome.clone(), &result.path, None) {
                warn!("Could not save {}: {}", result.path.display(), e);
            }
        }
    }

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed = results.iter().filter(|r| r.outcome.is_mock_data).count();
    eprintln!();
    eprintln!(
        "{} Read {} photos in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(results.len() - failed).green(),
        style(failed).red()
    );

    Ok(())
}

fn is_photo(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(
        ext.to_lowercase().as_str(),
        "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tif" | "tiff"
    )
}

fn write_summary(path: &Path, results: &[PhotoResult]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(PhotoResult::header())?;
    for result in results {
        wtr.write_record(result.record())?;
    }
    wtr.flush()?;
    Ok(())
}
