//! Two-phase extraction: a lenient attempt followed by one strict retry.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use ratex_inference::{GenerationRequest, TextGenerator};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::rate::SupplierRate;

use super::normalizer::normalize;
use super::postprocess::postprocess;
use super::prompt::{build_prompt, strict_prompt};
use super::recovery::recover_json;
use super::schema::validate;
use super::Result;

/// Longest completion excerpt kept in a recovery error.
const COMPLETION_PREVIEW_CHARS: usize = 200;

/// Result of rate extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted, postprocessed record.
    pub rate: SupplierRate,
    /// Input text after normalization, as placed in the prompt.
    pub normalized_text: String,
    /// Number of model calls made (1 or 2).
    pub attempts: u32,
    /// Why the first attempt failed, if a retry happened.
    pub retry_reason: Option<String>,
    /// Non-fatal issues with the record.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Extraction pipeline bound to a text generator.
pub struct RatePipeline<G> {
    generator: G,
    max_tokens: u32,
    temperature: f32,
    retry: bool,
}

impl<G: TextGenerator> RatePipeline<G> {
    /// Create a pipeline with default settings.
    pub fn new(generator: G) -> Self {
        Self::from_config(generator, &ExtractionConfig::default())
    }

    /// Create a pipeline from extraction settings.
    pub fn from_config(generator: G, config: &ExtractionConfig) -> Self {
        Self {
            generator,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            retry: config.retry,
        }
    }

    /// Set the completion budget per model call.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the first-attempt sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Enable or disable the strict retry.
    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    /// Extract a supplier rate from raw text.
    ///
    /// Recovery, parse and validation failures of the first attempt trigger
    /// one retry with a strict prompt at temperature 0. Failures of the
    /// model call itself are returned immediately.
    pub fn extract(&self, raw_text: &str, model_id: &str) -> crate::Result<ExtractionResult> {
        let start = Instant::now();

        info!(
            "Extracting rate from {} characters with {} ({})",
            raw_text.len(),
            model_id,
            self.generator.name()
        );

        let normalized_text = normalize(raw_text);
        let prompt = build_prompt(&normalized_text);
        debug!("Built prompt of {} characters", prompt.len());

        let completion = self.generate(model_id, &prompt, self.temperature)?;

        let (rate, attempts, retry_reason) = match parse_completion(&completion, raw_text) {
            Ok(rate) => (rate, 1, None),
            Err(e) if self.retry => {
                warn!("First attempt failed ({}): {}", e.kind(), e);
                let completion = self.generate(model_id, &strict_prompt(&prompt), 0.0)?;
                let rate = parse_completion(&completion, raw_text).inspect_err(|e| {
                    warn!("Strict retry failed ({}): {}", e.kind(), e);
                })?;
                (rate, 2, Some(e.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let warnings = rate.date_issues();
        for warning in &warnings {
            warn!("{}", warning);
        }

        debug!(
            "Extracted rate for {} after {} attempt(s)",
            rate.supplier_name, attempts
        );

        Ok(ExtractionResult {
            rate,
            normalized_text,
            attempts,
            retry_reason,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn generate(&self, model_id: &str, prompt: &str, temperature: f32) -> crate::Result<String> {
        let request = GenerationRequest::new(model_id, prompt)
            .with_max_tokens(self.max_tokens)
            .with_temperature(temperature);

        let completion = self.generator.generate(&request)?;
        debug!(
            "Model returned {} characters at temperature {}",
            completion.len(),
            temperature
        );
        Ok(completion)
    }
}

/// Extract a supplier rate with default pipeline settings.
pub fn extract<G: TextGenerator>(
    generator: G,
    raw_text: &str,
    model_id: &str,
) -> crate::Result<SupplierRate> {
    RatePipeline::new(generator)
        .extract(raw_text, model_id)
        .map(|result| result.rate)
}

/// Turn one model completion into a postprocessed record.
///
/// A completion without an object boundary that does not parse is a
/// recovery failure; a bounded one that does not parse is a parse failure.
pub fn parse_completion(completion: &str, raw_text: &str) -> Result<SupplierRate> {
    let recovered = recover_json(completion);

    let value: Value = serde_json::from_str(&recovered.text).map_err(|source| {
        if recovered.bounded {
            ExtractionError::Parse {
                source,
                text: recovered.text.clone(),
            }
        } else {
            ExtractionError::Recovery(preview(completion))
        }
    })?;

    let rate = validate(&value)?;
    Ok(postprocess(rate, raw_text))
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(COMPLETION_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
