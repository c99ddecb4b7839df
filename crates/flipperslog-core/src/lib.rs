//! Core library for logging pinball scores.
//!
//! This crate provides:
//! - Extraction of `{score, tableName}` readings from free-form model replies
//! - Scoreboard photo analysis with a sentinel fallback on any failure
//! - A score book of scores and tables over a key-value store
//! - Venue lookup against Pinball Map location data

pub mod error;
pub mod extract;
pub mod models;
pub mod store;
pub mod venues;
pub mod vision;

pub use error::{ExtractionError, FlipperError, Result, StorageError, VenueError, VisionError};
pub use extract::{JsonResponseExtractor, ResponseExtractor, extract_result};
pub use models::config::FlipperConfig;
pub use models::score::{NewScore, Score, ScoreUpdate, Table, TableWithScores};
pub use models::venue::{ActiveVenue, PinballVenue};
pub use models::vision::{ExtractionResult, VisionOutcome};
pub use store::{FileStore, KeyValueStore, MemoryStore, ScoreBook, VenueContext};
pub use vision::{PreparedImage, ScoreReader, VisionModel};

#[cfg(feature = "http")]
pub use venues::PinballMapClient;
#[cfg(feature = "http")]
pub use vision::AnthropicClient;
