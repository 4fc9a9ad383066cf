//! Extract command - pull a structured rate out of a single text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ratex_core::SupplierRate;

use super::{load_config, ModelArgs};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(flatten)]
    model: ModelArgs,

    /// Show attempt count, retry reason and date warnings
    #[arg(long)]
    show_attempts: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.model.apply(&mut config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let raw = fs::read_to_string(&args.input)?;

    info!(
        "Extracting {} with {}",
        args.input.display(),
        config.model.model_id
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Calling {}...", config.model.model_id));
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let model = args.model.clone();
    let model_id = config.model.model_id.clone();
    let pipeline_config = config.clone();
    let result = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let pipeline = model.build_pipeline(&pipeline_config)?;
        Ok(pipeline.extract(&raw, &model_id)?)
    })
    .await;

    pb.finish_and_clear();
    let result = result??;

    let output = format_rate(&result.rate, args.format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_attempts {
        eprintln!();
        eprintln!("{} Model calls: {}", style("ℹ").blue(), result.attempts);
        if let Some(reason) = &result.retry_reason {
            eprintln!("{} Retried after: {}", style("ℹ").blue(), reason);
        }
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_rate(rate: &SupplierRate, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(rate)?),
        OutputFormat::Json => Ok(serde_json::to_string(rate)?),
        OutputFormat::Csv => format_csv(rate),
        OutputFormat::Text => Ok(format_text(rate)),
    }
}

fn format_csv(rate: &SupplierRate) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "supplier_name",
        "location",
        "room_type",
        "price",
        "currency",
        "valid_from",
        "valid_to",
        "extras",
    ])?;

    wtr.write_record([
        &rate.supplier_name,
        &rate.location,
        &rate.room_type,
        &rate.price.to_string(),
        &rate.currency,
        &rate.valid_from,
        &rate.valid_to,
        &rate.extras.join("; "),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(rate: &SupplierRate) -> String {
    let mut output = String::new();

    output.push_str(&format!("Supplier: {}\n", rate.supplier_name));
    output.push_str(&format!("Location: {}\n", rate.location));
    output.push_str(&format!("Room:     {}\n", rate.room_type));
    output.push_str(&format!("Price:    {} {} per night\n", rate.price, rate.currency));
    output.push_str(&format!("Valid:    {} to {}\n", rate.valid_from, rate.valid_to));

    if !rate.extras.is_empty() {
        output.push_str(&format!("Extras:   {}\n", rate.extras.join(", ")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate() -> SupplierRate {
        serde_json::from_str(
            r#"{"supplier_name":"Kiwi Lodge","location":"Auckland, NZ","room_type":"Family Room","price":199.5,"currency":"NZD","valid_from":"2026-02-01","valid_to":"2026-02-10","extras":["pool","spa"]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let csv = format_rate(&rate(), OutputFormat::Csv, true).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("supplier_name,location"));
        assert!(lines[1].contains("\"Auckland, NZ\""));
        assert!(lines[1].contains("pool; spa"));
    }

    #[test]
    fn test_text_summary() {
        let text = format_rate(&rate(), OutputFormat::Text, true).unwrap();
        assert!(text.contains("Price:    199.5 NZD per night"));
        assert!(text.contains("Extras:   pool, spa"));
    }

    #[test]
    fn test_compact_json() {
        let json = format_rate(&rate(), OutputFormat::Json, false).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"price\":199.5"));
    }
}
