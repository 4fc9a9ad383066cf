//! Error types for the inference layer.

use thiserror::Error;

/// Errors that can occur while asking a model for a completion.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The backend could not be constructed from its settings.
    #[error("invalid backend configuration: {0}")]
    Config(String),

    /// The request never produced an HTTP response (connect, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("model server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A scripted backend was asked for more completions than it holds.
    #[error("no scripted completions left")]
    Exhausted,

    /// I/O error when loading replay files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            InferenceError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_decode() {
            InferenceError::InvalidResponse(err.to_string())
        } else {
            InferenceError::Http(err.to_string())
        }
    }
}
