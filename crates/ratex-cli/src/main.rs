//! CLI application for tourism rate extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, eval, extract, synth};

/// Tourism rate extraction - turn free-form supplier rate text into structured records
#[derive(Parser)]
#[command(name = "ratex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a rate from a single text file
    Extract(extract::ExtractArgs),

    /// Extract rates from multiple text files
    Batch(batch::BatchArgs),

    /// Score extractions against labelled cases
    Eval(eval::EvalArgs),

    /// Generate synthetic rate texts
    Synth(synth::SynthArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Eval(args) => eval::run(args, cli.config.as_deref()).await,
        Commands::Synth(args) => synth::run(args).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
