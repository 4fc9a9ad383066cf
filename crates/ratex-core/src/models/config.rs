//! Configuration structures for the extraction pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RatexError, Result};
use ratex_inference::{DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

#[cfg(feature = "http")]
use ratex_inference::TextGenerator;

/// Main configuration for ratex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RatexConfig {
    /// Model server configuration.
    pub model: ModelConfig,

    /// Extraction pipeline configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Which kind of model server to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Ollama `/api/generate`.
    Ollama,
    /// OpenAI-compatible `/v1/completions`.
    Openai,
}

/// Model server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Backend kind.
    pub backend: BackendKind,

    /// Base URL of the model server.
    pub endpoint: String,

    /// Model identifier passed to the server.
    pub model_id: String,

    /// Bearer token for OpenAI-compatible servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Ollama,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model_id: "qwen2.5:1.5b-instruct".to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the configured generation backend.
    #[cfg(feature = "http")]
    pub fn build_generator(&self) -> Result<Box<dyn TextGenerator>> {
        let generator: Box<dyn TextGenerator> = match self.backend {
            BackendKind::Ollama => Box::new(ratex_inference::OllamaBackend::new(
                self.endpoint.clone(),
                self.timeout(),
            )?),
            BackendKind::Openai => Box::new(ratex_inference::OpenAiCompatBackend::new(
                self.endpoint.clone(),
                self.api_key.clone(),
                self.timeout(),
            )?),
        };
        Ok(generator)
    }
}

/// Extraction pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Completion budget per model call.
    pub max_tokens: u32,

    /// Sampling temperature of the first attempt.
    pub temperature: f32,

    /// Retry once with a strict prompt at temperature 0.
    pub retry: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            retry: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl RatexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn check(&self) -> Result<()> {
        if self.model.model_id.trim().is_empty() {
            return Err(RatexError::Config("model.model_id is empty".to_string()));
        }
        if self.extraction.max_tokens == 0 {
            return Err(RatexError::Config(
                "extraction.max_tokens must be positive".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.extraction.temperature) {
            return Err(RatexError::Config(format!(
                "extraction.temperature must be within 0..=2, got {}",
                self.extraction.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: RatexConfig =
            serde_json::from_str(r#"{"model": {"backend": "openai"}}"#).unwrap();
        assert_eq!(config.model.backend, BackendKind::Openai);
        assert_eq!(config.model.model_id, "qwen2.5:1.5b-instruct");
        assert_eq!(config.extraction.max_tokens, 512);
        assert!(config.extraction.retry);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RatexConfig::default();
        config.extraction.temperature = 0.3;
        config.save(&path).unwrap();

        let loaded = RatexConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.temperature, 0.3);
    }

    #[test]
    fn test_check_rejects_bad_values() {
        let mut config = RatexConfig::default();
        config.extraction.max_tokens = 0;
        assert!(config.check().is_err());

        let mut config = RatexConfig::default();
        config.extraction.temperature = -1.0;
        assert!(config.check().is_err());
    }
}
