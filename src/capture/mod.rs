//! Speech Capture Module
//!
//! Capture backends turn one spoken attempt into a transcript. Starting a
//! capture returns immediately; the outcome arrives later as a
//! [`CaptureEvent`] tagged with the attempt it was started for.
//!
//! Backends:
//! - Typed: reads the "heard" text from stdin (no microphone needed)
//! - Mic: cpal microphone input into a Vosk recognizer (feature `mic`)

#[cfg(feature = "mic")]
pub mod mic;
pub mod typed;

use crate::config::Config;
use crate::core::{AttemptId, CaptureEvent};
use crate::error::{CoachError, CoachResult};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

pub use typed::{TypedCapture, TypedRelay};

/// Sender half of the capture event stream
pub type CaptureSender = UnboundedSender<CaptureEvent>;

/// Trait for speech capture backends
pub trait SpeechCapture: Send + Sync {
    /// Begin capturing one utterance for `attempt`
    ///
    /// Must not block. Exactly one of transcript, error or ended should be
    /// sent on `events` when capture finishes.
    fn start(&self, lang: &str, attempt: AttemptId, events: CaptureSender) -> CoachResult<()>;

    /// Get the backend name
    fn name(&self) -> &str;
}

/// Factory to create the configured capture backend
///
/// Fails with [`CoachError::CaptureUnavailable`] when the backend cannot be
/// used in this build or on this machine.
pub fn create_capture(config: &Config) -> CoachResult<Arc<dyn SpeechCapture>> {
    let capture: Arc<dyn SpeechCapture> = match config.capture_engine.as_str() {
        "typed" => Arc::new(TypedCapture::new()),
        "mic" => create_mic(config)?,
        other => {
            return Err(CoachError::CaptureUnavailable(format!(
                "unknown capture engine '{}'",
                other
            )))
        }
    };
    info!("🎙️ Speech capture backend: {}", capture.name());
    Ok(capture)
}

#[cfg(feature = "mic")]
fn create_mic(config: &Config) -> CoachResult<Arc<dyn SpeechCapture>> {
    Ok(Arc::new(mic::MicCapture::new(config)?))
}

#[cfg(not(feature = "mic"))]
fn create_mic(_config: &Config) -> CoachResult<Arc<dyn SpeechCapture>> {
    Err(CoachError::CaptureUnavailable(
        "built without microphone support (enable the `mic` feature)".to_string(),
    ))
}
