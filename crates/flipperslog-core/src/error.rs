//! Error types for the flipperslog-core library.

use thiserror::Error;

/// Main error type for the flipperslog library.
#[derive(Error, Debug)]
pub enum FlipperError {
    /// Model response extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Vision model error.
    #[error("vision error: {0}")]
    Vision(#[from] VisionError),

    /// Score book storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Venue lookup error.
    #[error("venue error: {0}")]
    Venue(#[from] VenueError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors produced while extracting a result from a model response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The response is empty or whitespace only.
    #[error("empty response")]
    EmptyInput,

    /// The response has no opening brace.
    #[error("no JSON object found in response")]
    NoJsonFound,

    /// The braced span is not valid JSON.
    #[error("malformed JSON in response: {0}")]
    MalformedJson(String),

    /// `score` is missing or is not a JSON number.
    #[error("score is missing or not a number")]
    InvalidScoreType,
}

/// Errors related to the vision model call.
#[derive(Error, Debug)]
pub enum VisionError {
    /// No API key in the environment or the configuration.
    #[error("no API key configured")]
    MissingApiKey,

    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered without any text content.
    #[error("model returned no text content")]
    EmptyResponse,

    /// The photo could not be decoded or re-encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The photo could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the score book.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backing store I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be decoded.
    #[error("corrupt value under {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// No score with the given id.
    #[error("score not found: {0}")]
    ScoreNotFound(String),

    /// Rejected input.
    #[error("invalid input: {0}")]
    Invalid(String),
}

/// Errors related to venue lookup.
#[derive(Error, Debug)]
pub enum VenueError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Result type for the flipperslog library.
pub type Result<T> = std::result::Result<T, FlipperError>;
