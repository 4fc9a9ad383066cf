//! Canned completions for tests and offline replays.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use tracing::debug;

use crate::error::InferenceError;
use crate::{GenerationRequest, Result, TextGenerator};

/// A request as seen by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub model_id: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Backend that answers from a fixed list of completions.
///
/// Completions are handed out in order. Once only one is left it is
/// repeated for every further call, so a single canned answer serves any
/// number of requests. Every request is recorded for later inspection.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedBackend {
    /// Create a backend from a sequence of completions.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Load a single completion from a file and replay it for every call.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading scripted completion from: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new([text]))
    }

    /// All requests received so far.
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

impl TextGenerator for ScriptedBackend {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedRequest {
                model_id: request.model_id.to_string(),
                prompt: request.prompt.to_string(),
                max_tokens: request.max_tokens,
                temperature: request.temperature,
            });
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| InferenceError::Exhausted)?;

        match responses.len() {
            0 => Err(InferenceError::Exhausted),
            1 => Ok(responses[0].clone()),
            _ => responses.pop_front().ok_or(InferenceError::Exhausted),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
