//! Configuration structures for scoreboard reading, storage and venue lookup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable checked for the vision API key before the config.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Main configuration for flipperslog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipperConfig {
    /// Vision model configuration.
    pub vision: VisionConfig,

    /// Score book storage configuration.
    pub storage: StorageConfig,

    /// Venue lookup configuration.
    pub venues: VenueConfig,
}

/// Vision model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Messages API endpoint.
    pub api_url: String,

    /// API key. The environment variable takes precedence.
    pub api_key: Option<String>,

    /// Model identifier.
    pub model: String,

    /// Maximum tokens in the reply.
    pub max_tokens: u32,

    /// Sampling temperature. Zero keeps readings deterministic.
    pub temperature: f32,

    /// Photos wider than this are downscaled before upload.
    pub max_image_width: u32,

    /// JPEG quality (1 - 100) for the uploaded photo.
    pub jpeg_quality: u8,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
            api_key: None,
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            max_image_width: 1568, // keeps uploads under the 5 MB image limit
            jpeg_quality: 90,
            timeout_secs: 60,
        }
    }
}

impl VisionConfig {
    /// API key from the environment, falling back to the config value.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }
}

/// Score book storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the score book files.
    pub data_dir: Option<PathBuf>,

    /// Number of tables offered for quick selection.
    pub quick_select_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            quick_select_limit: 10,
        }
    }
}

/// Venue lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueConfig {
    /// Pinball Map API base URL.
    pub base_url: String,

    /// Pinball Map regions searched.
    pub regions: Vec<String>,

    /// First search radius in kilometers.
    pub search_radius_km: f64,

    /// Radius used when nothing is found within the first one.
    pub expanded_radius_km: f64,

    /// Maximum number of nearby venues returned.
    pub max_results: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pinballmap.com/api/v1".to_string(),
            regions: vec!["seattle".to_string(), "spokane".to_string()],
            search_radius_km: 0.5,
            expanded_radius_km: 1.0,
            max_results: 3,
            timeout_secs: 30,
        }
    }
}

impl FlipperConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
