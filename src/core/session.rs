//! Recording Session
//!
//! Tracks the single pronunciation attempt in flight: which target is being
//! recorded, whether capture is still running, and the last outcome.
//!
//! Only one attempt exists at a time, application-wide. Requesting a new
//! capture replaces whatever was there before, and capture events carry the
//! [`AttemptId`] they were started for so late events from a replaced
//! attempt can be told apart and dropped.

use super::scorer::{self, ScoreResult};
use std::fmt;
use tracing::{debug, info, warn};

/// Feedback shown when capture fails
pub const CAPTURE_FAILED_FEEDBACK: &str = "Could not hear you. Please try again.";

/// Error description used when capture ends with neither text nor error
pub const NO_SPEECH_ERROR: &str = "no-speech";

/// Identity of one request-to-result cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(u64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether the learner is saying the word itself or its example sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Word,
    Sentence,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Word => "word",
            TargetKind::Sentence => "sentence",
        }
    }
}

/// What the learner is trying to pronounce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Vocabulary entry id
    pub id: String,
    pub kind: TargetKind,
    pub text: String,
}

impl Target {
    pub fn new(id: impl Into<String>, kind: TargetKind, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            text: text.into(),
        }
    }

    pub fn matches(&self, id: &str, kind: TargetKind) -> bool {
        self.id == id && self.kind == kind
    }
}

/// Coarse state of the session, for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Capturing,
    Complete,
    Failed,
}

/// Lifecycle of the tracked attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    /// Waiting for the capture backend
    Capturing,
    /// Transcript received and scored
    Complete {
        transcript: String,
        result: ScoreResult,
    },
    /// Capture errored or ended without speech
    Failed { transcript: String },
}

/// One recording attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingAttempt {
    pub id: AttemptId,
    pub target: Target,
    pub status: AttemptStatus,
}

impl RecordingAttempt {
    pub fn state(&self) -> AttemptState {
        match self.status {
            AttemptStatus::Capturing => AttemptState::Capturing,
            AttemptStatus::Complete { .. } => AttemptState::Complete,
            AttemptStatus::Failed { .. } => AttemptState::Failed,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.status == AttemptStatus::Capturing
    }

    /// Verbatim transcript, or the error placeholder for failed attempts
    pub fn transcript(&self) -> Option<&str> {
        match &self.status {
            AttemptStatus::Capturing => None,
            AttemptStatus::Complete { transcript, .. } | AttemptStatus::Failed { transcript } => {
                Some(transcript)
            }
        }
    }

    pub fn result(&self) -> Option<&ScoreResult> {
        match &self.status {
            AttemptStatus::Complete { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Score badge value: the result score, or 0 for a failed attempt
    pub fn display_score(&self) -> Option<u8> {
        match &self.status {
            AttemptStatus::Capturing => None,
            AttemptStatus::Complete { result, .. } => Some(result.score),
            AttemptStatus::Failed { .. } => Some(0),
        }
    }

    pub fn feedback(&self) -> Option<&str> {
        match &self.status {
            AttemptStatus::Capturing => None,
            AttemptStatus::Complete { result, .. } => Some(&result.feedback),
            AttemptStatus::Failed { .. } => Some(CAPTURE_FAILED_FEEDBACK),
        }
    }
}

/// What the capture backend reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Transcript(String),
    Error(String),
    /// Capture stopped without a transcript or an error (e.g. silence)
    Ended,
}

/// Event from a capture backend, tagged with the attempt it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEvent {
    pub attempt: AttemptId,
    pub outcome: CaptureOutcome,
}

impl CaptureEvent {
    pub fn transcript(attempt: AttemptId, text: impl Into<String>) -> Self {
        Self {
            attempt,
            outcome: CaptureOutcome::Transcript(text.into()),
        }
    }

    pub fn error(attempt: AttemptId, description: impl Into<String>) -> Self {
        Self {
            attempt,
            outcome: CaptureOutcome::Error(description.into()),
        }
    }

    pub fn ended(attempt: AttemptId) -> Self {
        Self {
            attempt,
            outcome: CaptureOutcome::Ended,
        }
    }
}

/// Input to the session reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Requested(Target),
    Capture(CaptureEvent),
}

/// Single-slot register for the attempt in flight
#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    next_id: u64,
    current: Option<RecordingAttempt>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// State-in, state-out form of the session transitions
    pub fn reduce(mut self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::Requested(target) => {
                self.request(target);
            }
            SessionEvent::Capture(event) => {
                self.handle_capture(event);
            }
        }
        self
    }

    /// Start a new attempt, discarding whatever was tracked before
    pub fn request(&mut self, target: Target) -> AttemptId {
        if let Some(previous) = &self.current {
            if previous.is_capturing() {
                debug!("Superseding attempt {} still capturing", previous.id);
            }
        }

        self.next_id += 1;
        let id = AttemptId(self.next_id);
        info!(
            "🎙️ Attempt {} started for {} '{}' ({})",
            id,
            target.kind.as_str(),
            target.id,
            target.text
        );

        self.current = Some(RecordingAttempt {
            id,
            target,
            status: AttemptStatus::Capturing,
        });
        id
    }

    /// Route a capture event to the matching transition
    ///
    /// Returns `false` when the event was dropped.
    pub fn handle_capture(&mut self, event: CaptureEvent) -> bool {
        match event.outcome {
            CaptureOutcome::Transcript(text) => self.on_transcript_received(event.attempt, &text),
            CaptureOutcome::Error(description) => {
                self.on_capture_error(event.attempt, &description)
            }
            CaptureOutcome::Ended => self.on_capture_ended_without_result(event.attempt),
        }
    }

    /// Score the transcript and complete the attempt
    pub fn on_transcript_received(&mut self, attempt: AttemptId, transcript: &str) -> bool {
        let Some(current) = self.capturing_mut(attempt) else {
            return false;
        };

        let result = scorer::score(&current.target.text, transcript);
        info!(
            "📝 Attempt {} heard '{}' -> {} ({:?})",
            attempt, transcript, result.score, result.tier
        );
        current.status = AttemptStatus::Complete {
            transcript: transcript.to_string(),
            result,
        };
        true
    }

    /// Fail the attempt with the generic "could not hear you" feedback
    pub fn on_capture_error(&mut self, attempt: AttemptId, description: &str) -> bool {
        let Some(current) = self.capturing_mut(attempt) else {
            return false;
        };

        warn!("Speech capture error for attempt {}: {}", attempt, description);
        current.status = AttemptStatus::Failed {
            transcript: format!("Error: {}", description),
        };
        true
    }

    /// Capture stopped silently; treated as a `no-speech` capture error
    pub fn on_capture_ended_without_result(&mut self, attempt: AttemptId) -> bool {
        if self.capturing_mut(attempt).is_none() {
            return false;
        }
        self.on_capture_error(attempt, NO_SPEECH_ERROR)
    }

    /// True if the tracked attempt belongs to this exact target
    pub fn is_attempt_active(&self, target_id: &str, kind: TargetKind) -> bool {
        self.attempt_for(target_id, kind).is_some()
    }

    /// The tracked attempt, if it belongs to this target
    pub fn attempt_for(&self, target_id: &str, kind: TargetKind) -> Option<&RecordingAttempt> {
        self.current
            .as_ref()
            .filter(|attempt| attempt.target.matches(target_id, kind))
    }

    pub fn current(&self) -> Option<&RecordingAttempt> {
        self.current.as_ref()
    }

    pub fn state(&self) -> AttemptState {
        self.current
            .as_ref()
            .map_or(AttemptState::Idle, RecordingAttempt::state)
    }

    fn capturing_mut(&mut self, attempt: AttemptId) -> Option<&mut RecordingAttempt> {
        match self.current.as_mut() {
            Some(current) if current.id == attempt && current.is_capturing() => Some(current),
            _ => {
                debug!("Dropping capture event for stale attempt {}", attempt);
                None
            }
        }
    }
}
