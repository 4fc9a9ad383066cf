//! Text generation abstraction layer for ratex.
//!
//! This crate provides a unified interface for asking a generative language
//! model to continue a prompt:
//! - `OllamaBackend` for a local Ollama server (`/api/generate`)
//! - `OpenAiCompatBackend` for servers exposing `/v1/completions`
//!   (vLLM, llama.cpp server, TGI)
//! - `ScriptedBackend` for canned completions in tests and replays

mod backend;
mod error;
mod request;

pub use backend::{strip_prompt_echo, RecordedRequest, ScriptedBackend, TextGenerator};
pub use error::InferenceError;
pub use request::{GenerationRequest, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

#[cfg(feature = "http")]
pub use backend::ollama::OllamaBackend;

#[cfg(feature = "http")]
pub use backend::openai::OpenAiCompatBackend;

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
