//! Synth command - write synthetic rate texts.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::Value;

use ratex_core::eval::EvalCase;
use ratex_core::SyntheticGenerator;

/// Arguments for the synth command.
#[derive(Args)]
pub struct SynthArgs {
    /// Number of examples
    #[arg(long, default_value = "5")]
    n: usize,

    /// Output directory
    #[arg(long, default_value = "examples_out")]
    outdir: PathBuf,

    /// Seed for a reproducible corpus
    #[arg(long)]
    seed: Option<u64>,

    /// Also write cases.json with the expected records, for `ratex eval`
    #[arg(long)]
    cases: bool,
}

pub async fn run(args: SynthArgs) -> anyhow::Result<()> {
    fs::create_dir_all(&args.outdir)?;

    let today = chrono::Local::now().date_naive();
    let generator = match args.seed {
        Some(seed) => SyntheticGenerator::new(seed, today),
        None => SyntheticGenerator::from_random_seed(today),
    };

    let mut cases = Vec::with_capacity(args.n);
    for (i, example) in generator.take(args.n).enumerate() {
        let path = args.outdir.join(format!("input_{}.txt", i + 1));
        fs::write(&path, &example.text)?;
        println!("Wrote {}", path.display());

        if args.cases {
            let expected = match serde_json::to_value(&example.expected)? {
                Value::Object(map) => map,
                _ => anyhow::bail!("Expected record did not serialize to an object"),
            };
            cases.push(EvalCase {
                text: example.text,
                expected,
            });
        }
    }

    if args.cases {
        let path = args.outdir.join("cases.json");
        fs::write(&path, serde_json::to_string_pretty(&cases)?)?;
        println!(
            "{} Wrote {} cases to {}",
            style("✓").green(),
            cases.len(),
            path.display()
        );
    }

    Ok(())
}
