//! Scoreboard reading types produced by extraction and by the score reader.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::models::score::NewScore;

/// Table name reported by the sentinel reading.
pub const SENTINEL_TABLE_NAME: &str = "Medieval Madness";

/// Score reported by the sentinel reading.
pub const SENTINEL_SCORE: f64 = 125_000_000.0;

/// Manufacturer reported by the sentinel reading.
pub const SENTINEL_MANUFACTURER: &str = "Williams";

/// A validated reading extracted from a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Score shown on the scoreboard. Always finite.
    pub score: f64,

    /// Table name, when the model could identify one.
    pub table_name: Option<String>,
}

/// Outcome of analyzing one scoreboard photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionOutcome {
    pub score: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    /// 1.0 for a model reading, 0.0 for the sentinel.
    pub confidence: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Set when the values are placeholders rather than a real reading.
    pub is_mock_data: bool,

    /// Why the sentinel was substituted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VisionOutcome {
    /// Authoritative outcome built from an extracted reading.
    pub fn from_extraction(result: ExtractionResult) -> Self {
        Self {
            score: result.score,
            table_name: result.table_name,
            confidence: 1.0,
            manufacturer: None,
            is_mock_data: false,
            error: None,
        }
    }

    /// Placeholder outcome carrying the failure message.
    pub fn sentinel(error: impl Into<String>) -> Self {
        Self {
            score: SENTINEL_SCORE,
            table_name: Some(SENTINEL_TABLE_NAME.to_string()),
            confidence: 0.0,
            manufacturer: Some(SENTINEL_MANUFACTURER.to_string()),
            is_mock_data: true,
            error: Some(error.into()),
        }
    }

    /// Convert an authoritative outcome into a score ready to be stored.
    ///
    /// The score must be a non-negative whole number.
    pub fn into_new_score(self, date: impl Into<String>) -> Result<NewScore, StorageError> {
        if self.is_mock_data {
            return Err(StorageError::Invalid(
                "refusing to store placeholder reading".to_string(),
            ));
        }
        if self.score < 0.0 || self.score.fract() != 0.0 || self.score > u64::MAX as f64 {
            return Err(StorageError::Invalid(format!(
                "score {} is not a whole, non-negative number",
                self.score
            )));
        }

        Ok(NewScore {
            score: self.score as u64,
            table_name: self.table_name,
            date: date.into(),
            photo_uri: None,
            venue_id: None,
        })
    }
}
