//! Scoreboard photo analysis with a vision-capable language model.

#[cfg(feature = "http")]
mod anthropic;
mod image;
mod prompt;
mod reader;

#[cfg(feature = "http")]
pub use anthropic::AnthropicClient;
pub use image::{JPEG_MEDIA_TYPE, PreparedImage, prepare_image_bytes, prepare_photo};
pub use prompt::SCOREBOARD_PROMPT;
pub use reader::ScoreReader;

use std::future::Future;

use crate::error::VisionError;

/// A model that answers a text prompt about an image.
pub trait VisionModel {
    /// Send the image and prompt, returning the model's text reply.
    fn complete(
        &self,
        image: &PreparedImage,
        prompt: &str,
    ) -> impl Future<Output = Result<String, VisionError>> + Send;
}
