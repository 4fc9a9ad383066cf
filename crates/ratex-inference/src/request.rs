//! Generation request passed to every backend.

/// Default completion budget in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Default sampling temperature for the first extraction attempt.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Endpoint of a local Ollama server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// One completion request.
///
/// Mirrors `generate(model_id, prompt, max_tokens, temperature)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRequest<'a> {
    /// Model identifier understood by the backend (e.g. `qwen2.5:1.5b-instruct`).
    pub model_id: &'a str,
    /// Full prompt text.
    pub prompt: &'a str,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature. `0.0` means greedy decoding.
    pub temperature: f32,
}

impl<'a> GenerationRequest<'a> {
    /// Create a request with default length and temperature.
    pub fn new(model_id: &'a str, prompt: &'a str) -> Self {
        Self {
            model_id,
            prompt,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Whether sampling is disabled for this request.
    pub fn is_greedy(&self) -> bool {
        self.temperature <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = GenerationRequest::new("m", "p");
        assert_eq!(req.max_tokens, 512);
        assert!(!req.is_greedy());
    }

    #[test]
    fn test_zero_temperature_is_greedy() {
        let req = GenerationRequest::new("m", "p").with_temperature(0.0);
        assert!(req.is_greedy());
    }
}
