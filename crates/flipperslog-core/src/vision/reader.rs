//! Score reader: model call, extraction and sentinel fallback.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::VisionError;
use crate::extract::{JsonResponseExtractor, ResponseExtractor};
use crate::models::config::VisionConfig;
use crate::models::vision::VisionOutcome;

use super::image::{PreparedImage, prepare_photo};
use super::prompt::SCOREBOARD_PROMPT;
use super::VisionModel;

/// Reads scores from scoreboard photos.
///
/// Analysis never fails. Any problem along the way (no model configured,
/// unreadable photo, failed request, unusable reply) yields the sentinel
/// outcome with the problem described in `error`.
pub struct ScoreReader<M> {
    model: Option<M>,
    extractor: JsonResponseExtractor,
    config: VisionConfig,
}

impl<M: VisionModel> ScoreReader<M> {
    /// Reader backed by `model`. Without a model every analysis returns the sentinel.
    pub fn new(model: Option<M>, config: VisionConfig) -> Self {
        Self {
            model,
            extractor: JsonResponseExtractor::new(),
            config,
        }
    }

    /// Whether a model is configured.
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Analyze a photo on disk. The photo is prepared on the blocking pool.
    pub async fn analyze_photo(&self, path: &Path) -> VisionOutcome {
        if self.model.is_none() {
            return self.fallback(VisionError::MissingApiKey.to_string());
        }

        // Decoding and re-encoding are CPU bound
        let owned_path = path.to_path_buf();
        let config = self.config.clone();
        let prepared = tokio::task::spawn_blocking(move || prepare_photo(&owned_path, &config)).await;

        match prepared {
            Ok(Ok(image)) => self.analyze_image(&image).await,
            Ok(Err(e)) => self.fallback(format!("could not prepare {}: {}", path.display(), e)),
            Err(e) => self.fallback(format!("could not prepare {}: {}", path.display(), e)),
        }
    }

    /// Analyze an already prepared image.
    pub async fn analyze_image(&self, image: &PreparedImage) -> VisionOutcome {
        let Some(model) = &self.model else {
            return self.fallback(VisionError::MissingApiKey.to_string());
        };

        let start = Instant::now();
        let reply = match model.complete(image, SCOREBOARD_PROMPT).await {
            Ok(reply) => reply,
            Err(e) => return self.fallback(e.to_string()),
        };
        debug!("Model replied with {} characters in {:?}", reply.len(), start.elapsed());

        match self.extractor.extract(&reply) {
            Ok(result) => {
                info!(
                    "Read score {} on {}",
                    result.score,
                    result.table_name.as_deref().unwrap_or("unknown table")
                );
                VisionOutcome::from_extraction(result)
            }
            Err(e) => {
                debug!("Unusable reply: {:?}", reply);
                self.fallback(e.to_string())
            }
        }
    }

    fn fallback(&self, error: String) -> VisionOutcome {
        warn!("Falling back to placeholder reading: {}", error);
        VisionOutcome::sentinel(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vision::{SENTINEL_SCORE, SENTINEL_TABLE_NAME};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Model returning a canned reply and recording the prompts it saw.
    struct CannedModel {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn replying(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), prompts: Mutex::new(Vec::new()) }
        }

        fn failing(message: &str) -> Self {
            Self { reply: Err(message.to_string()), prompts: Mutex::new(Vec::new()) }
        }
    }

    impl VisionModel for CannedModel {
        async fn complete(&self, _image: &PreparedImage, prompt: &str) -> Result<String, VisionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(VisionError::Request)
        }
    }

    fn image() -> PreparedImage {
        PreparedImage {
            data: vec![0xFF, 0xD8, 0xFF, 0xD9],
            media_type: "image/jpeg",
            width: 1,
            height: 1,
        }
    }

    fn reader(model: Option<CannedModel>) -> ScoreReader<CannedModel> {
        ScoreReader::new(model, VisionConfig::default())
    }

    #[tokio::test]
    async fn test_plain_json_reply() {
        let reader = reader(Some(CannedModel::replying(
            r#"{"score": 42000000, "tableName": "Test Table"}"#,
        )));

        let outcome = reader.analyze_image(&image()).await;

        assert_eq!(outcome.score, 42000000.0);
        assert_eq!(outcome.table_name.as_deref(), Some("Test Table"));
        assert_eq!(outcome.confidence, 1.0);
        assert!(!outcome.is_mock_data);
        assert_eq!(outcome.error, None);
    }

    #[tokio::test]
    async fn test_fenced_reply() {
        let reader = reader(Some(CannedModel::replying(
            "```json\n{\"score\": 42000000, \"tableName\": \"Test Table\"}\n```",
        )));

        let outcome = reader.analyze_image(&image()).await;

        assert_eq!(outcome.score, 42000000.0);
        assert!(!outcome.is_mock_data);
    }

    #[tokio::test]
    async fn test_backtick_reply() {
        let reader = reader(Some(CannedModel::replying(
            r#"`{"score": 55555555, "tableName": "Another Table"}`"#,
        )));

        let outcome = reader.analyze_image(&image()).await;

        assert_eq!(outcome.score, 55555555.0);
        assert_eq!(outcome.table_name.as_deref(), Some("Another Table"));
    }

    #[tokio::test]
    async fn test_reply_without_json_falls_back() {
        let reader = reader(Some(CannedModel::replying(
            "Sorry, I could not read the score from this image.",
        )));

        let outcome = reader.analyze_image(&image()).await;

        assert!(outcome.is_mock_data);
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.score, SENTINEL_SCORE);
        assert_eq!(outcome.table_name.as_deref(), Some(SENTINEL_TABLE_NAME));
        assert_eq!(outcome.error.as_deref(), Some("no JSON object found in response"));
    }

    #[tokio::test]
    async fn test_string_score_falls_back() {
        let reader = reader(Some(CannedModel::replying(
            r#"{"score": "3542040", "tableName": "Medieval Madness"}"#,
        )));

        let outcome = reader.analyze_image(&image()).await;

        assert!(outcome.is_mock_data);
        assert_eq!(outcome.error.as_deref(), Some("score is missing or not a number"));
    }

    #[tokio::test]
    async fn test_model_error_falls_back() {
        let reader = reader(Some(CannedModel::failing("API Error")));

        let outcome = reader.analyze_image(&image()).await;

        assert!(outcome.is_mock_data);
        assert_eq!(outcome.error.as_deref(), Some("request failed: API Error"));
    }

    #[tokio::test]
    async fn test_no_model_falls_back() {
        let reader = reader(None);

        let outcome = reader.analyze_photo(Path::new("test://photo.jpg")).await;

        assert!(!reader.has_model());
        assert!(outcome.is_mock_data);
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.error.as_deref(), Some("no API key configured"));
    }

    #[tokio::test]
    async fn test_unreadable_photo_falls_back() {
        let reader = reader(Some(CannedModel::replying(r#"{"score": 1}"#)));

        let outcome = reader.analyze_photo(Path::new("/nonexistent/photo.jpg")).await;

        assert!(outcome.is_mock_data);
        assert!(outcome.error.unwrap().contains("/nonexistent/photo.jpg"));
    }

    #[tokio::test]
    async fn test_sends_scoreboard_prompt() {
        let model = CannedModel::replying(r#"{"score": 1}"#);
        let reader = reader(Some(model));

        reader.analyze_image(&image()).await;

        let prompts = reader.model.as_ref().unwrap().prompts.lock().unwrap();
        assert_eq!(prompts.as_slice(), &[SCOREBOARD_PROMPT.to_string()]);
    }

    #[tokio::test]
    async fn test_photo_on_disk_is_prepared_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoreboard.png");
        image::RgbImage::from_pixel(64, 32, image::Rgb([10, 200, 10]))
            .save(&path)
            .unwrap();
        let reader = reader(Some(CannedModel::replying(
            r#"{"score": 3542040, "tableName": "Medieval Madness"}"#,
        )));

        let outcome = reader.analyze_photo(&path).await;

        assert!(!outcome.is_mock_data);
        assert_eq!(outcome.score, 3542040.0);
        assert_eq!(outcome.table_name.as_deref(), Some("Medieval Madness"));
    }
}
