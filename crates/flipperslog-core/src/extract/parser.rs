//! JSON response extractor for scoreboard readings.

use serde_json::Value;

use crate::error::ExtractionError;
use crate::models::vision::ExtractionResult;

use super::cleanup::{json_span, strip_backtick_runs, strip_code_fence};
use super::{ResponseExtractor, Result};

/// Extract a reading from raw model text.
///
/// Stages run in a fixed order: trim, strip a surrounding code fence, strip
/// stray backtick runs, trim, cut the first `{` .. last `}` span, parse it
/// and validate the `score` field.
pub fn extract_result(raw: &str) -> Result<ExtractionResult> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ExtractionError::EmptyInput);
    }

    let text = strip_code_fence(text);
    let text = strip_backtick_runs(text).trim();

    let span = json_span(text).ok_or(ExtractionError::NoJsonFound)?;

    let value: Value = serde_json::from_str(span)
        .map_err(|e| ExtractionError::MalformedJson(e.to_string()))?;

    let score = value
        .get("score")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .ok_or(ExtractionError::InvalidScoreType)?;

    let table_name = value
        .get("tableName")
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok(ExtractionResult { score, table_name })
}

/// Stateless extractor for the `{"score": N, "tableName": T}` reply shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseExtractor;

impl JsonResponseExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ResponseExtractor for JsonResponseExtractor {
    fn extract(&self, raw: &str) -> Result<ExtractionResult> {
        extract_result(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reading(score: f64, table_name: Option<&str>) -> ExtractionResult {
        ExtractionResult {
            score,
            table_name: table_name.map(str::to_owned),
        }
    }

    #[test]
    fn test_fenced_json_block() {
        let raw = "```json\n{\"score\": 121962080, \"tableName\": \"Guardians of the Galaxy\"}\n```";
        assert_eq!(
            extract_result(raw).unwrap(),
            reading(121962080.0, Some("Guardians of the Galaxy"))
        );
    }

    #[test]
    fn test_prose_before_fenced_block() {
        let raw = "I can see the scoreboard of the machine. The display shows a player \
                   score, but the backglass is cut off so the table name is unclear.\n\n\
                   ```json\n{\"score\": 3542040, \"tableName\": null}\n```";
        assert_eq!(extract_result(raw).unwrap(), reading(3542040.0, None));
    }

    #[test]
    fn test_single_backticks() {
        let raw = "`{\"score\": 2500000, \"tableName\": \"Medieval Madness\"}`";
        assert_eq!(
            extract_result(raw).unwrap(),
            reading(2500000.0, Some("Medieval Madness"))
        );
    }

    #[test]
    fn test_pure_json() {
        let raw = "{\"score\": 99999999, \"tableName\": \"Pure JSON\"}";
        assert_eq!(extract_result(raw).unwrap(), reading(99999999.0, Some("Pure JSON")));
    }

    #[test]
    fn test_prose_after_json() {
        let raw = "{\"score\": 42000000, \"tableName\": \"Test Table\"}\nLet me know if you need more.";
        assert_eq!(extract_result(raw).unwrap(), reading(42000000.0, Some("Test Table")));
    }

    #[test]
    fn test_fence_without_newline_after_tag() {
        let raw = "```json {\"score\": 7, \"tableName\": \"Fish Tales\"}```";
        assert_eq!(extract_result(raw).unwrap(), reading(7.0, Some("Fish Tales")));
    }

    #[test]
    fn test_missing_table_name() {
        assert_eq!(extract_result("{\"score\": 15}").unwrap(), reading(15.0, None));
    }

    #[test]
    fn test_non_string_table_name_is_dropped() {
        assert_eq!(
            extract_result("{\"score\": 15, \"tableName\": 42}").unwrap(),
            reading(15.0, None)
        );
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(
            extract_result("  \n\t{\"score\": 1, \"tableName\": \"Jaws\"}\n  ").unwrap(),
            reading(1.0, Some("Jaws"))
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_result(""), Err(ExtractionError::EmptyInput));
        assert_eq!(extract_result("   \n\t "), Err(ExtractionError::EmptyInput));
    }

    #[test]
    fn test_no_json_found() {
        assert_eq!(
            extract_result("plain text, no braces at all"),
            Err(ExtractionError::NoJsonFound)
        );
        assert_eq!(
            extract_result("Sorry, I could not read the score from this image."),
            Err(ExtractionError::NoJsonFound)
        );
    }

    #[test]
    fn test_lone_closing_brace() {
        assert_eq!(extract_result("}"), Err(ExtractionError::NoJsonFound));
    }

    #[test]
    fn test_backticks_only() {
        assert_eq!(extract_result("```"), Err(ExtractionError::NoJsonFound));
    }

    #[test]
    fn test_truncated_json() {
        let raw = "{\"score\": 3542040, \"tableName\": \"Incomplete";
        assert!(matches!(
            extract_result(raw),
            Err(ExtractionError::MalformedJson(_))
        ));
    }

    #[test]
    fn test_braced_prose_before_json_is_malformed() {
        let raw = "The display {top row} reads: {\"score\": 5, \"tableName\": \"Jaws\"}";
        assert!(matches!(
            extract_result(raw),
            Err(ExtractionError::MalformedJson(_))
        ));
    }

    #[test]
    fn test_trailing_comma() {
        let raw = "{\"score\": 3542040, \"tableName\": \"Medieval Madness\",}";
        assert!(matches!(
            extract_result(raw),
            Err(ExtractionError::MalformedJson(_))
        ));
    }

    #[test]
    fn test_string_score_rejected() {
        let raw = "{\"score\": \"3542040\", \"tableName\": \"Medieval Madness\"}";
        assert_eq!(extract_result(raw), Err(ExtractionError::InvalidScoreType));
    }

    #[test]
    fn test_missing_score_rejected() {
        let raw = "{\"tableName\": \"Medieval Madness\"}";
        assert_eq!(extract_result(raw), Err(ExtractionError::InvalidScoreType));
    }

    #[test]
    fn test_null_score_rejected() {
        let raw = "{\"score\": null, \"tableName\": \"Medieval Madness\"}";
        assert_eq!(extract_result(raw), Err(ExtractionError::InvalidScoreType));
    }

    #[test]
    fn test_extractor_trait() {
        let extractor = JsonResponseExtractor::new();
        let result = extractor
            .extract("```\n{\"score\": 55555555, \"tableName\": \"Another Table\"}\n```")
            .unwrap();

        assert_eq!(result, reading(55555555.0, Some("Another Table")));
    }
}
