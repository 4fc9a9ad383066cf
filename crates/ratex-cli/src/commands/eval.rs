//! Eval command - score extractions against labelled cases.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use ratex_core::eval::{field_accuracy, mean_accuracy, EvalCase, FieldScore};

use super::{load_config, ModelArgs};

/// Arguments for the eval command.
#[derive(Args)]
pub struct EvalArgs {
    /// JSON file with an array of {"text": ..., "expected": {...}} cases
    #[arg(required = true)]
    cases: PathBuf,

    /// Write a JSON report with predictions and scores
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    model: ModelArgs,
}

#[derive(Serialize)]
struct CaseReport {
    index: usize,
    prediction: Option<Value>,
    score: FieldScore,
    field_accuracy: f64,
    error: Option<String>,
}

#[derive(Serialize)]
struct EvalReport {
    cases: Vec<CaseReport>,
    mean_field_accuracy: f64,
}

pub async fn run(args: EvalArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    args.model.apply(&mut config)?;

    let content = fs::read_to_string(&args.cases)?;
    let cases: Vec<EvalCase> = serde_json::from_str(&content)?;
    if cases.is_empty() {
        anyhow::bail!("No cases found in {}", args.cases.display());
    }

    info!("Evaluating {} cases with {}", cases.len(), config.model.model_id);

    let model = args.model.clone();
    let model_id = config.model.model_id.clone();
    let reports = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<CaseReport>> {
        let pipeline = model.build_pipeline(&config)?;
        let mut reports = Vec::with_capacity(cases.len());

        for (index, case) in cases.iter().enumerate() {
            let report = match pipeline.extract(&case.text, &model_id) {
                Ok(result) => {
                    let score = field_accuracy(&case.expected, &result.rate);
                    CaseReport {
                        index,
                        prediction: Some(serde_json::to_value(&result.rate)?),
                        field_accuracy: score.accuracy(),
                        score,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!("Case {} failed: {}", index, e);
                    let score = FieldScore {
                        total: case.expected.len(),
                        mismatched: case.expected.keys().cloned().collect(),
                        ..Default::default()
                    };
                    CaseReport {
                        index,
                        prediction: None,
                        field_accuracy: 0.0,
                        score,
                        error: Some(e.to_string()),
                    }
                }
            };
            reports.push(report);
        }

        Ok(reports)
    })
    .await??;

    for report in &reports {
        let marker = if report.error.is_some() {
            style("✗").red()
        } else if report.score.mismatched.is_empty() {
            style("✓").green()
        } else {
            style("~").yellow()
        };

        println!(
            "{} case {}: {}/{} fields ({:.1}%)",
            marker,
            report.index,
            report.score.matched,
            report.score.total,
            report.field_accuracy * 100.0
        );
        if let Some(error) = &report.error {
            println!("    error: {}", error);
        } else if !report.score.mismatched.is_empty() {
            println!("    mismatched: {}", report.score.mismatched.join(", "));
        }
    }

    let scores: Vec<FieldScore> = reports.iter().map(|r| r.score.clone()).collect();
    let mean = mean_accuracy(&scores);

    println!();
    println!(
        "{} Mean field accuracy: {:.1}% over {} cases",
        style("ℹ").blue(),
        mean * 100.0,
        reports.len()
    );

    if let Some(output_path) = &args.output {
        let report = EvalReport {
            cases: reports,
            mean_field_accuracy: mean,
        };
        fs::write(output_path, serde_json::to_string_pretty(&report)?)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            output_path.display()
        );
    }

    Ok(())
}
