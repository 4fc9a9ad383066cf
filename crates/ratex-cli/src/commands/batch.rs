//! Batch command - extract rates from many text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use ratex_core::{ExtractionResult, RatePipeline, TextGenerator};

use super::extract::{format_rate, OutputFormat};
use super::{load_config, ModelArgs};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input text files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel extractions
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    #[command(flatten)]
    model: ModelArgs,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    extraction: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

type SharedPipeline = Arc<RatePipeline<Box<dyn TextGenerator>>>;

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.model.apply(&mut config)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching .txt files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let model = args.model.clone();
    let pipeline_config = config.clone();
    let pipeline: SharedPipeline = Arc::new(
        tokio::task::spawn_blocking(move || model.build_pipeline(&pipeline_config)).await??,
    );

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let stop = Arc::new(AtomicBool::new(false));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        if stop.load(Ordering::SeqCst) {
            break;
        }

        let pipeline = Arc::clone(&pipeline);
        let stop = Arc::clone(&stop);
        let continue_on_error = args.continue_on_error;
        let model_id = config.model.model_id.clone();
        let pb = overall_pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            // Another file already failed; leave this one untouched.
            if stop.load(Ordering::SeqCst) {
                return None;
            }

            let file_start = Instant::now();
            let result = extract_file(&path, &pipeline, &model_id);
            pb.inc(1);

            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            Some(match result {
                Ok(extraction) => FileResult {
                    path,
                    extraction: Some(extraction),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => {
                    if !continue_on_error {
                        stop.store(true, Ordering::SeqCst);
                    }
                    FileResult {
                        path,
                        extraction: None,
                        error: Some(e.to_string()),
                        processing_time_ms,
                    }
                }
            })
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        if let Some(result) = handle.await? {
            if let Some(error_msg) = &result.error {
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", result.path.display(), error_msg);
                } else {
                    error!("Failed to process {}: {}", result.path.display(), error_msg);
                }
            }
            results.push(result);
        }
    }

    let successful: Vec<_> = results.iter().filter(|r| r.extraction.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    let extension = match args.format {
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
        OutputFormat::Text => "txt",
    };

    for result in &successful {
        if let Some(extraction) = &result.extraction {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("rate");
            let output_path = args.output_dir.join(format!("{}.{}", output_name, extension));

            let content = format_rate(&extraction.rate, args.format, config.output.pretty)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if !args.continue_on_error {
        if let Some(first) = failed.first() {
            overall_pb.abandon();
            anyhow::bail!(
                "Processing failed for {}: {}",
                first.path.display(),
                first.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    overall_pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args.output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn extract_file(
    path: &Path,
    pipeline: &SharedPipeline,
    model_id: &str,
) -> anyhow::Result<ExtractionResult> {
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        anyhow::bail!("Input file is empty");
    }
    Ok(pipeline.extract(&raw, model_id)?)
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "supplier_name",
        "location",
        "room_type",
        "price",
        "currency",
        "valid_from",
        "valid_to",
        "nights",
        "extras",
        "attempts",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.extraction {
            let rate = &extraction.rate;
            wtr.write_record([
                filename,
                "success",
                &rate.supplier_name,
                &rate.location,
                &rate.room_type,
                &rate.price.to_string(),
                &rate.currency,
                &rate.valid_from,
                &rate.valid_to,
                &rate.nights().map(|n| n.to_string()).unwrap_or_default(),
                &rate.extras.join("; "),
                &extraction.attempts.to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
