//! Study application state
//!
//! The whole view is driven by one explicit [`AppState`] and a
//! unidirectional [`AppState::update`]: state and message in, new state
//! and an optional effect out. The recording session is updated through
//! its own reducer.

pub mod messages;
pub mod state;
pub mod view;

pub use messages::{Effect, Message};
pub use state::{AppState, PrintSettings, Tab, ViewMode};

use crate::core::SessionEvent;
use crate::lesson::Lesson;
use tracing::{debug, info};

/// Shown when printing with nothing selected
pub const NO_SELECTION_NOTICE: &str = "単語を選択してください";

/// Shown when recording is requested without a capture backend
pub const CAPTURE_UNAVAILABLE_NOTICE: &str =
    "この環境は音声認識に対応していません。capture_engine の設定を確認してください。";

/// Rate used for single words and sentences
const WORD_RATE: f32 = 1.0;

impl AppState {
    pub fn update(mut self, lesson: &Lesson, message: Message) -> (Self, Option<Effect>) {
        debug!("Update: {:?}", message);
        let mut effect = None;

        match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
            }
            Message::ToggleSelect(id) => {
                if !self.selected_ids.remove(&id) {
                    self.selected_ids.insert(id);
                }
            }
            Message::ToggleAll => {
                if self.all_selected(lesson) {
                    self.selected_ids.clear();
                } else {
                    self.selected_ids = lesson.ids().into_iter().collect();
                }
            }
            Message::ToggleExpand(id) => {
                if !self.expanded_ids.remove(&id) {
                    self.expanded_ids.insert(id);
                }
            }
            Message::ToggleHighlights => {
                self.show_highlights = !self.show_highlights;
            }
            Message::ToggleTranslation => {
                self.show_translation = !self.show_translation;
            }
            Message::ToggleMenu => {
                self.show_menu = !self.show_menu;
            }
            Message::PrintRequested(format) => {
                let ids: Vec<String> = lesson
                    .vocabulary
                    .iter()
                    .filter(|v| self.is_selected(&v.id))
                    .map(|v| v.id.clone())
                    .collect();

                if ids.is_empty() {
                    self.notice = Some(NO_SELECTION_NOTICE.to_string());
                } else {
                    info!("🖨️ Print preview: {} ({} words)", format.as_str(), ids.len());
                    self.view_mode = ViewMode::Print(PrintSettings { format, ids });
                    self.show_menu = false;
                }
            }
            Message::BackToApp => {
                self.view_mode = ViewMode::App;
            }
            Message::VoiceSelected(voice) => {
                self.voice = voice;
            }
            Message::PlayStory => {
                if self.is_playing {
                    self.is_playing = false;
                    effect = Some(Effect::CancelSpeech);
                } else {
                    self.is_playing = true;
                    effect = Some(Effect::Speak {
                        text: lesson.story.en.clone(),
                        voice: self.voice.clone(),
                        rate: self.story_rate,
                        interrupt: false,
                    });
                }
            }
            Message::PlaybackFinished => {
                self.is_playing = false;
            }
            Message::PlayText(text) => {
                effect = Some(Effect::Speak {
                    text,
                    voice: self.voice.clone(),
                    rate: WORD_RATE,
                    interrupt: true,
                });
            }
            Message::RecordRequested(target) => {
                if !self.capture_available {
                    self.notice = Some(CAPTURE_UNAVAILABLE_NOTICE.to_string());
                } else {
                    self.recording = self.recording.reduce(SessionEvent::Requested(target));
                    if let Some(attempt) = self.recording.current() {
                        effect = Some(Effect::StartCapture {
                            attempt: attempt.id,
                            lang: self.speech_lang.clone(),
                        });
                    }
                }
            }
            Message::Capture(event) => {
                self.recording = self.recording.reduce(SessionEvent::Capture(event));
            }
            Message::DismissNotice => {
                self.notice = None;
            }
        }

        (self, effect)
    }
}
