//! Core library for tourism rate extraction.
//!
//! This crate provides:
//! - Text normalization of free-form supplier rate text
//! - Few-shot prompt construction for a generative model
//! - JSON recovery and repair of model completions
//! - Schema validation into a strongly-typed `SupplierRate`
//! - Currency and extras canonicalization
//! - The two-phase extraction pipeline with one strict retry
//! - Field-accuracy scoring and a synthetic corpus generator

pub mod error;
pub mod eval;
pub mod models;
pub mod rate;
pub mod synth;

pub use error::{ErrorKind, ExtractionError, RatexError, Result};
pub use eval::{field_accuracy, FieldScore};
pub use models::config::RatexConfig;
pub use models::rate::SupplierRate;
pub use rate::{extract, ExtractionResult, RatePipeline};
pub use synth::SyntheticGenerator;

/// Re-export generation types.
pub use ratex_inference::{GenerationRequest, InferenceError, ScriptedBackend, TextGenerator};

#[cfg(feature = "http")]
pub use ratex_inference::{OllamaBackend, OpenAiCompatBackend};
