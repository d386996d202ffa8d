//! State types for the study view
//!
//! Enums and structs for application state management.

use crate::core::RecordingSession;
use crate::lesson::Lesson;
use crate::print::PrintFormat;
use std::collections::HashSet;

/// Current tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Text,
    Vocab,
}

/// What is being printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSettings {
    pub format: PrintFormat,
    /// Selected entry ids, in lesson order
    pub ids: Vec<String>,
}

/// Study view or print preview
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    App,
    Print(PrintSettings),
}

/// Whole-application state, replaced on every update
#[derive(Debug, Clone)]
pub struct AppState {
    pub view_mode: ViewMode,
    pub tab: Tab,
    pub selected_ids: HashSet<String>,
    pub expanded_ids: HashSet<String>,
    pub show_menu: bool,
    pub show_highlights: bool,
    pub show_translation: bool,
    pub is_playing: bool,
    pub voice: Option<String>,
    /// A speech capture backend could be created
    pub capture_available: bool,
    pub speech_lang: String,
    pub story_rate: f32,
    /// Blocking message for the user, if any
    pub notice: Option<String>,
    pub recording: RecordingSession,
}

impl AppState {
    /// Initial state: text tab, every word selected
    pub fn new(lesson: &Lesson) -> Self {
        Self {
            view_mode: ViewMode::App,
            tab: Tab::Text,
            selected_ids: lesson.ids().into_iter().collect(),
            expanded_ids: HashSet::new(),
            show_menu: false,
            show_highlights: true,
            show_translation: true,
            is_playing: false,
            voice: None,
            capture_available: true,
            speech_lang: "en-US".to_string(),
            story_rate: 0.9,
            notice: None,
            recording: RecordingSession::new(),
        }
    }

    pub fn with_capture(mut self, available: bool) -> Self {
        self.capture_available = available;
        self
    }

    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_speech(mut self, lang: &str, story_rate: f32) -> Self {
        self.speech_lang = lang.to_string();
        self.story_rate = story_rate;
        self
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.contains(id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_ids.contains(id)
    }

    pub fn all_selected(&self, lesson: &Lesson) -> bool {
        lesson.vocabulary.iter().all(|v| self.is_selected(&v.id))
    }
}
