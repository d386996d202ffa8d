//! Core scoring modules
//!
//! Contains normalization, the pronunciation scorer, and the recording
//! session state machine. Nothing in here touches audio or the terminal.

pub mod normalizer;
pub mod scorer;
pub mod session;

pub use normalizer::normalize;
pub use scorer::{levenshtein, score, FeedbackTier, ScoreResult};
pub use session::{
    AttemptId, AttemptState, AttemptStatus, CaptureEvent, CaptureOutcome, RecordingAttempt,
    RecordingSession, SessionEvent, Target, TargetKind,
};
