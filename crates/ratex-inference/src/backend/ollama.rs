//! Ollama backend (`POST /api/generate`).

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InferenceError;
use crate::{GenerationRequest, Result, TextGenerator};

use super::strip_prompt_echo;

/// Seed used for greedy requests so repeated calls agree.
const GREEDY_SEED: i64 = 42;

/// Backend talking to a local Ollama server.
pub struct OllamaBackend {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    raw: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaBackend {
    /// Create a backend for the given base URL.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(InferenceError::Config("empty Ollama endpoint".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Config(e.to_string()))?;

        debug!("Using Ollama at {}", endpoint);

        Ok(Self { client, endpoint })
    }

    fn build_body<'a>(request: &GenerationRequest<'a>) -> OllamaRequest<'a> {
        OllamaRequest {
            model: request.model_id,
            prompt: request.prompt,
            stream: false,
            raw: true,
            options: OllamaOptions {
                temperature: request.temperature.max(0.0),
                num_predict: request.max_tokens,
                seed: request.is_greedy().then_some(GREEDY_SEED),
            },
        }
    }
}

impl TextGenerator for OllamaBackend {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        debug!(
            "Ollama request: model={} prompt_chars={} max_tokens={} temperature={}",
            request.model_id,
            request.prompt.len(),
            request.max_tokens,
            request.temperature
        );

        let response = self
            .client
            .post(&url)
            .json(&Self::build_body(request))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaResponse = response.json()?;
        debug!("Ollama returned {} characters", parsed.response.len());

        Ok(strip_prompt_echo(parsed.response, request.prompt))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body_shape() {
        let req = GenerationRequest::new("qwen", "hello")
            .with_max_tokens(128)
            .with_temperature(0.1);
        let body = serde_json::to_value(OllamaBackend::build_body(&req)).unwrap();

        assert_eq!(body["model"], "qwen");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 128);
        assert!(body["options"].get("seed").is_none());
    }

    #[test]
    fn test_greedy_request_is_seeded() {
        let req = GenerationRequest::new("qwen", "hello").with_temperature(0.0);
        let body = serde_json::to_value(OllamaBackend::build_body(&req)).unwrap();

        assert_eq!(body["options"]["temperature"], 0.0);
        assert_eq!(body["options"]["seed"], 42);
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let backend = OllamaBackend::new("http://host:1/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.endpoint, "http://host:1");
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        assert!(OllamaBackend::new("", Duration::from_secs(1)).is_err());
    }
}
