//! Error types for the ratex-core library.

use thiserror::Error;

/// Main error type for the ratex library.
#[derive(Error, Debug)]
pub enum RatexError {
    /// Rate extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Model invocation error from the inference layer.
    #[error("inference error: {0}")]
    Inference(#[from] ratex_inference::InferenceError),

    /// JSON (de)serialization error outside the extraction attempt.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RatexError {
    /// Extraction failure kind, if this is an extraction failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            RatexError::Extraction(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Errors raised by a single extraction attempt.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No JSON object boundary was found and the text does not parse.
    #[error("no JSON object found in model output: {0}")]
    Recovery(String),

    /// The recovered text is still not valid JSON.
    #[error("model output is not valid JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        text: String,
    },

    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl ExtractionError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ExtractionError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Coarse failure kind used by the retry policy and by callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::Recovery(_) => ErrorKind::Recovery,
            ExtractionError::Parse { .. } => ErrorKind::Parse,
            ExtractionError::MissingField(_) | ExtractionError::Validation { .. } => {
                ErrorKind::Validation
            }
        }
    }
}

/// Kinds of extraction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No plausible object boundary in the completion.
    Recovery,
    /// Recovered text is not syntactically valid JSON.
    Parse,
    /// Valid JSON that violates the record schema.
    Validation,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Recovery => write!(f, "recovery"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::Validation => write!(f, "validation"),
        }
    }
}

/// Result type for the ratex library.
pub type Result<T> = std::result::Result<T, RatexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ExtractionError::Recovery("x".into()).kind(),
            ErrorKind::Recovery
        );
        assert_eq!(
            ExtractionError::MissingField("price".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ExtractionError::validation("currency", "bad").kind(),
            ErrorKind::Validation
        );

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ExtractionError::Parse {
            source,
            text: "{".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_ratex_error_kind() {
        let err: RatexError = ExtractionError::MissingField("price".into()).into();
        assert_eq!(err.kind(), Some(ErrorKind::Validation));

        let err = RatexError::Config("x".into());
        assert_eq!(err.kind(), None);
    }
}
