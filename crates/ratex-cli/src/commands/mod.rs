//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod eval;
pub mod extract;
pub mod synth;

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use ratex_core::models::config::RatexConfig;
use ratex_core::{RatePipeline, ScriptedBackend, TextGenerator};

/// Model selection shared by every command that calls the model.
#[derive(Args, Clone, Debug)]
pub struct ModelArgs {
    /// Model identifier (overrides config)
    #[arg(long, env = "RATEX_MODEL")]
    pub model_id: Option<String>,

    /// Model server URL (overrides config)
    #[arg(long, env = "RATEX_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Sampling temperature of the first attempt
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate per call
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Fail after the first attempt instead of retrying with a strict prompt
    #[arg(long)]
    pub no_retry: bool,

    /// Replay a saved model completion instead of calling a model server
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,
}

impl ModelArgs {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut RatexConfig) -> anyhow::Result<()> {
        if let Some(model_id) = &self.model_id {
            config.model.model_id = model_id.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.model.endpoint = endpoint.clone();
        }
        if let Some(temperature) = self.temperature {
            config.extraction.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.extraction.max_tokens = max_tokens;
        }
        if self.no_retry {
            config.extraction.retry = false;
        }
        config.check()?;
        Ok(())
    }

    /// Build the extraction pipeline for the configured backend.
    ///
    /// HTTP backends use a blocking client, so call this from a blocking
    /// context.
    pub fn build_pipeline(
        &self,
        config: &RatexConfig,
    ) -> anyhow::Result<RatePipeline<Box<dyn TextGenerator>>> {
        let generator: Box<dyn TextGenerator> = match &self.replay {
            Some(path) => {
                debug!("Replaying completion from {}", path.display());
                Box::new(ScriptedBackend::from_file(path)?)
            }
            None => config.model.build_generator()?,
        };
        Ok(RatePipeline::from_config(generator, &config.extraction))
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ratex")
        .join("config.json")
}

/// Config file in use: the `--config` path, else the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the config file if it exists, defaults otherwise.
///
/// An explicit path that does not exist is an error.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<RatexConfig> {
    if let Some(path) = explicit {
        return Ok(RatexConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(RatexConfig::from_file(&path)?)
    } else {
        Ok(RatexConfig::default())
    }
}
