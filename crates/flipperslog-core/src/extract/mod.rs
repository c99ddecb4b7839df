//! Extraction of a scoreboard reading from free-form model responses.

mod cleanup;
mod parser;

pub use cleanup::{json_span, strip_backtick_runs, strip_code_fence};
pub use parser::{JsonResponseExtractor, extract_result};

use crate::error::ExtractionError;
use crate::models::vision::ExtractionResult;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for model response extractors.
pub trait ResponseExtractor {
    /// Extract a validated reading from the raw response text.
    fn extract(&self, raw: &str) -> Result<ExtractionResult>;
}
