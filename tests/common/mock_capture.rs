//! Mock capture backend for testing
//!
//! Replays scripted outcomes so attempts can be driven without audio.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use vocab_coach::capture::{CaptureSender, SpeechCapture};
use vocab_coach::core::{AttemptId, CaptureEvent, CaptureOutcome};
use vocab_coach::error::{CoachError, CoachResult};

/// What the mock does when an attempt is started
#[derive(Debug, Clone)]
pub enum Script {
    /// Send this outcome for the started attempt
    Reply(CaptureOutcome),
    /// Send an outcome tagged with a different (stale) attempt first, then
    /// this outcome for the started attempt
    StaleThenReply(AttemptId, CaptureOutcome),
    /// Drop the sender without sending anything
    Silent,
    /// Refuse to start
    FailToStart(String),
}

/// Mock capture engine that replays a queue of scripts
pub struct MockCapture {
    scripts: Mutex<VecDeque<Script>>,
    /// Every (lang, attempt) passed to `start`
    pub started: Arc<Mutex<Vec<(String, AttemptId)>>>,
}

impl MockCapture {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            started: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mock that "hears" a single phrase
    pub fn hearing(text: &str) -> Self {
        Self::new(vec![Script::Reply(CaptureOutcome::Transcript(
            text.to_string(),
        ))])
    }

    pub fn started(&self) -> Vec<(String, AttemptId)> {
        self.started.lock().unwrap().clone()
    }
}

impl SpeechCapture for MockCapture {
    fn start(&self, lang: &str, attempt: AttemptId, events: CaptureSender) -> CoachResult<()> {
        self.started
            .lock()
            .unwrap()
            .push((lang.to_string(), attempt));

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Script::Silent);

        match script {
            Script::Reply(outcome) => {
                let _ = events.send(CaptureEvent { attempt, outcome });
            }
            Script::StaleThenReply(stale, outcome) => {
                let _ = events.send(CaptureEvent::transcript(stale, "stale words"));
                let _ = events.send(CaptureEvent { attempt, outcome });
            }
            Script::Silent => {}
            Script::FailToStart(reason) => return Err(CoachError::Capture(reason)),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
