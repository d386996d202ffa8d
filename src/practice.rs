//! Practice driver
//!
//! Runs messages through [`AppState::update`] and carries out the effects
//! it asks for. [`Practice::dispatch`] waits for speech and for the
//! attempt it started to finish; [`Practice::dispatch_detached`] only
//! starts them, for interactive loops that keep taking input meanwhile.

use crate::app::{AppState, Effect, Message};
use crate::capture::{CaptureSender, SpeechCapture};
use crate::core::{AttemptId, CaptureEvent, Target};
use crate::lesson::Lesson;
use crate::tts::SpeechOutput;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Connects the state reducer to the speech capabilities
pub struct Practice {
    capture: Arc<dyn SpeechCapture>,
    speech: Arc<dyn SpeechOutput>,
}

impl Practice {
    pub fn new(capture: Arc<dyn SpeechCapture>, speech: Arc<dyn SpeechOutput>) -> Self {
        Self { capture, speech }
    }

    /// Apply a message and every follow-up it triggers
    pub async fn dispatch(&self, state: AppState, lesson: &Lesson, message: Message) -> AppState {
        let mut state = state;
        let mut pending = Some(message);

        while let Some(message) = pending.take() {
            let (next, effect) = state.update(lesson, message);
            state = next;

            match effect {
                Some(Effect::StartCapture { attempt, lang }) => {
                    state = self.await_capture(state, lesson, attempt, &lang).await;
                }
                Some(effect) => {
                    pending = perform(self.speech.as_ref(), effect).await;
                }
                None => {}
            }
        }

        state
    }

    /// Record and score one attempt at `target`
    pub async fn run_attempt(&self, state: AppState, lesson: &Lesson, target: Target) -> AppState {
        self.dispatch(state, lesson, Message::RecordRequested(target))
            .await
    }

    /// Apply a message and start its effect without waiting for it
    ///
    /// Capture events for a started attempt arrive on `events`. Speech runs
    /// on a spawned task that sends [`Message::PlaybackFinished`] on
    /// `followups` when done; its handle is returned.
    pub fn dispatch_detached(
        &self,
        state: AppState,
        lesson: &Lesson,
        message: Message,
        events: &CaptureSender,
        followups: &UnboundedSender<Message>,
    ) -> (AppState, Option<JoinHandle<()>>) {
        let (state, effect) = state.update(lesson, message);

        match effect {
            Some(Effect::StartCapture { attempt, lang }) => {
                let state = self.start_capture(state, lesson, attempt, &lang, events.clone());
                (state, None)
            }
            Some(effect) => {
                let speech = Arc::clone(&self.speech);
                let followups = followups.clone();
                let handle = tokio::spawn(async move {
                    if let Some(message) = perform(speech.as_ref(), effect).await {
                        // Receiver is gone once the loop has finished
                        let _ = followups.send(message);
                    }
                });
                (state, Some(handle))
            }
            None => (state, None),
        }
    }

    /// Start capture for `attempt`; a refused start fails the attempt
    fn start_capture(
        &self,
        state: AppState,
        lesson: &Lesson,
        attempt: AttemptId,
        lang: &str,
        events: CaptureSender,
    ) -> AppState {
        match self.capture.start(lang, attempt, events) {
            Ok(()) => state,
            Err(e) => {
                let event = CaptureEvent::error(attempt, e.to_string());
                state.update(lesson, Message::Capture(event)).0
            }
        }
    }

    /// Start capture for `attempt` and feed its events back into the state
    async fn await_capture(
        &self,
        mut state: AppState,
        lesson: &Lesson,
        attempt: AttemptId,
        lang: &str,
    ) -> AppState {
        let (tx, mut rx) = mpsc::unbounded_channel();
        state = self.start_capture(state, lesson, attempt, lang, tx);

        while is_capturing(&state, attempt) {
            let event = match rx.recv().await {
                Some(event) => event,
                None => {
                    debug!("Capture stream closed while attempt {} was open", attempt);
                    CaptureEvent::ended(attempt)
                }
            };
            state = state.update(lesson, Message::Capture(event)).0;
        }

        state
    }
}

/// Carry out a speech effect, returning the follow-up message
async fn perform(speech: &dyn SpeechOutput, effect: Effect) -> Option<Message> {
    match effect {
        Effect::Speak {
            text,
            voice,
            rate,
            interrupt,
        } => {
            if interrupt {
                if let Err(e) = speech.cancel().await {
                    warn!("Could not cancel speech: {}", e);
                }
            }
            if let Err(e) = speech.speak(&text, voice.as_deref(), rate).await {
                warn!("⚠️ {} could not speak: {}", speech.name(), e);
            }
            Some(Message::PlaybackFinished)
        }
        Effect::CancelSpeech => {
            if let Err(e) = speech.cancel().await {
                warn!("Could not cancel speech: {}", e);
            }
            None
        }
        Effect::StartCapture { attempt, .. } => {
            warn!("Capture start for {} outside dispatch ignored", attempt);
            None
        }
    }
}

fn is_capturing(state: &AppState, attempt: AttemptId) -> bool {
    state
        .recording
        .current()
        .is_some_and(|current| current.id == attempt && current.is_capturing())
}
