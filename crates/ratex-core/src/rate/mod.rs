//! Supplier rate extraction module.

pub mod normalizer;
pub mod patterns;
mod pipeline;
pub mod postprocess;
pub mod prompt;
pub mod recovery;
pub mod schema;

pub use normalizer::normalize;
pub use pipeline::{extract, parse_completion, ExtractionResult, RatePipeline};
pub use postprocess::{canonical_currency, canonical_extras, postprocess, split_extras, Currency};
pub use prompt::{build_prompt, strict_prompt, FewShotExample, FEW_SHOT_EXAMPLES};
pub use recovery::{extract_json_block, recover_json, repair_json, RecoveredJson};
pub use schema::validate;

use crate::error::ExtractionError;

/// Result type for a single extraction attempt.
pub type Result<T> = std::result::Result<T, ExtractionError>;
