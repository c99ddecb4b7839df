//! Anthropic Messages API client.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VisionError;
use crate::models::config::VisionConfig;

use super::VisionModel;
use super::image::PreparedImage;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Vision model backed by the Anthropic Messages API.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    config: VisionConfig,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, config: VisionConfig) -> Result<Self, VisionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VisionError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Client using the key from the environment or the configuration.
    ///
    /// Returns `Ok(None)` when no key is available.
    pub fn from_config(config: &VisionConfig) -> Result<Option<Self>, VisionError> {
        match config.resolve_api_key() {
            Some(key) => Self::new(key, config.clone()).map(Some),
            None => Ok(None),
        }
    }

    fn request_body<'a>(&'a self, image: &'a PreparedImage, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: image.media_type,
                            data: STANDARD.encode(&image.data),
                        },
                    },
                    ContentBlock::Text { text: prompt },
                ],
            }],
        }
    }
}

impl VisionModel for AnthropicClient {
    async fn complete(&self, image: &PreparedImage, prompt: &str) -> Result<String, VisionError> {
        let body = self.request_body(image, prompt);
        debug!(
            "POST {} model={} image={} bytes",
            self.config.api_url,
            self.config.model,
            image.data.len()
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Request(e.to_string()))?;

        reply_text(parsed)
    }
}

/// Concatenate the text blocks of a reply.
fn reply_text(response: MessagesResponse) -> Result<String, VisionError> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.trim().is_empty() {
        return Err(VisionError::EmptyResponse);
    }
    Ok(text)
}
