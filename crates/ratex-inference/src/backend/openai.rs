//! OpenAI-compatible completions backend (`POST /v1/completions`).

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InferenceError;
use crate::{GenerationRequest, Result, TextGenerator};

use super::strip_prompt_echo;

/// Backend for servers implementing the legacy completions API.
pub struct OpenAiCompatBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenAiCompatBackend {
    /// Create a backend for the given base URL (without `/v1`).
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(InferenceError::Config("empty completions endpoint".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Config(e.to_string()))?;

        debug!("Using OpenAI-compatible server at {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    fn completions_url(&self) -> String {
        if self.endpoint.ends_with("/v1") {
            format!("{}/completions", self.endpoint)
        } else {
            format!("{}/v1/completions", self.endpoint)
        }
    }
}

impl TextGenerator for OpenAiCompatBackend {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        let body = CompletionRequest {
            model: request.model_id,
            prompt: request.prompt,
            max_tokens: request.max_tokens,
            temperature: request.temperature.max(0.0),
        };

        let mut builder = self.client.post(self.completions_url()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response.json()?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| InferenceError::InvalidResponse("no choices in completion".to_string()))?;

        debug!("Completion returned {} characters", text.len());

        Ok(strip_prompt_echo(text, request.prompt))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
