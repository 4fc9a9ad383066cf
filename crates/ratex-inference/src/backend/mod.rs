//! Text generation backend implementations.

#[cfg(feature = "http")]
pub mod ollama;

#[cfg(feature = "http")]
pub mod openai;

mod scripted;

pub use scripted::{RecordedRequest, ScriptedBackend};

use std::sync::Arc;

use crate::{GenerationRequest, Result};

/// Trait for text generation backends.
///
/// This trait abstracts over the different ways of reaching a generative
/// model, so the extraction pipeline can run against a local server in
/// production and against canned completions in tests.
pub trait TextGenerator: Send + Sync {
    /// Generate a continuation for `request.prompt`.
    ///
    /// Implementations return only the newly generated text, never the
    /// prompt itself.
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String>;

    /// Short backend name used in logs.
    fn name(&self) -> &str;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        (**self).generate(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        (**self).generate(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        (**self).generate(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Remove the prompt from the front of a generation that echoes it.
///
/// Some servers return `prompt + continuation`; the continuation is what
/// callers want.
pub fn strip_prompt_echo(generated: String, prompt: &str) -> String {
    match generated.strip_prefix(prompt) {
        Some(rest) => rest.to_string(),
        None => generated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prompt_echo() {
        let out = strip_prompt_echo("PROMPT {\"a\":1}".to_string(), "PROMPT ");
        assert_eq!(out, "{\"a\":1}");
    }

    #[test]
    fn test_strip_prompt_echo_without_echo() {
        let out = strip_prompt_echo("{\"a\":1}".to_string(), "PROMPT");
        assert_eq!(out, "{\"a\":1}");
    }

    #[test]
    fn test_boxed_generator_delegates() {
        let backend: Box<dyn TextGenerator> = Box::new(ScriptedBackend::new(["hi"]));
        let req = GenerationRequest::new("m", "p");
        assert_eq!(backend.generate(&req).unwrap(), "hi");
        assert_eq!(backend.name(), "scripted");
    }
}
