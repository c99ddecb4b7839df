//! Subcommands and the state they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod output;
pub mod read;
pub mod scores;
pub mod tables;
pub mod venues;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::debug;

use flipperslog_core::models::config::FlipperConfig;
use flipperslog_core::{FileStore, ScoreBook, VenueContext};

/// Configuration and data location resolved from the global flags.
pub struct Context {
    pub config: FlipperConfig,
    pub data_dir: PathBuf,
}

impl Context {
    /// Load the config file and pick the data directory.
    ///
    /// An explicit `--config` must exist. Without it the default config file
    /// is used when present. `--data-dir` wins over `storage.data_dir`.
    pub fn load(config_path: Option<&Path>, data_dir: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => FlipperConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => {
                let path = config::default_config_path();
                if path.exists() {
                    FlipperConfig::from_file(&path)
                        .with_context(|| format!("Failed to load config from {}", path.display()))?
                } else {
                    FlipperConfig::default()
                }
            }
        };

        let data_dir = data_dir
            .map(Path::to_path_buf)
            .or_else(|| config.storage.data_dir.clone())
            .unwrap_or_else(default_data_dir);
        debug!("Using data directory {}", data_dir.display());

        Ok(Self { config, data_dir })
    }

    pub fn score_book(&self) -> ScoreBook<FileStore> {
        ScoreBook::new(FileStore::new(&self.data_dir))
    }

    pub fn venue_context(&self) -> VenueContext<FileStore> {
        VenueContext::new(FileStore::new(&self.data_dir))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flipperslog")
}
