//! Vocab Coach Error Types
//!
//! Centralized error handling for lesson loading, speech backends and config.

use thiserror::Error;

/// Central error type for Vocab Coach
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Lesson data error: {0}")]
    Lesson(String),

    #[error("TTS engine error: {0}")]
    Tts(String),

    #[error("Speech capture error: {0}")]
    Capture(String),

    #[error("Speech capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown vocabulary entry: {0}")]
    UnknownEntry(String),

    #[error("Unknown study command: {0}")]
    Command(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Vocab Coach operations
pub type CoachResult<T> = Result<T, CoachError>;
