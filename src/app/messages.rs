//! Message types for the study view
//!
//! All messages that can be sent to update the application state, and the
//! side effects an update can ask the driver to perform.

use super::state::Tab;
use crate::core::{AttemptId, CaptureEvent, Target};
use crate::print::PrintFormat;

/// Messages that drive the application
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Navigation
    TabSelected(Tab),

    // Selection and cards
    ToggleSelect(String),
    ToggleAll,
    ToggleExpand(String),

    // Text view toggles
    ToggleHighlights,
    ToggleTranslation,

    // Printing
    ToggleMenu,
    PrintRequested(PrintFormat),
    BackToApp,

    // Speech output
    VoiceSelected(Option<String>),
    PlayStory,
    PlaybackFinished,
    PlayText(String),

    // Pronunciation practice
    RecordRequested(Target),
    Capture(CaptureEvent),

    DismissNotice,
}

/// Side effect requested by an update
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Speak text; `interrupt` cancels anything already playing first
    Speak {
        text: String,
        voice: Option<String>,
        rate: f32,
        interrupt: bool,
    },
    CancelSpeech,
    /// Start the capture backend for this attempt
    StartCapture { attempt: AttemptId, lang: String },
}
