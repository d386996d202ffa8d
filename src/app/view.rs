//! Terminal rendering of the study view

use super::state::{AppState, Tab, ViewMode};
use crate::core::{AttemptState, TargetKind};
use crate::lesson::{Lesson, VocabEntry};
use crate::passage::segment;
use crate::print::{self, PrintFormat};
use std::fmt::Write;

/// Score from which the badge shows as passed
const PASS_MARK: u8 = 80;

/// Render the current view
pub fn render(state: &AppState, lesson: &Lesson) -> String {
    let mut out = match &state.view_mode {
        ViewMode::Print(settings) => {
            let items: Vec<&VocabEntry> = settings
                .ids
                .iter()
                .filter_map(|id| lesson.entry(id))
                .collect();
            print::render_sheet(lesson, settings.format, &items, &print::today())
        }
        ViewMode::App => {
            let mut out = render_header(state, lesson);
            out.push_str(&render_tab_nav(state));
            match state.tab {
                Tab::Text => out.push_str(&render_text(state, lesson)),
                Tab::Vocab => out.push_str(&render_vocab(state, lesson)),
            }
            out
        }
    };

    if let Some(notice) = &state.notice {
        let _ = writeln!(out, "\n⚠ {}", notice);
    }
    out
}

fn render_header(state: &AppState, lesson: &Lesson) -> String {
    let voice = state.voice.as_deref().unwrap_or("(default voice)");
    format!("{}\n{}\n🔈 {}\n\n", lesson.title, lesson.sub_title, voice)
}

fn render_tab_nav(state: &AppState) -> String {
    let (text, vocab) = match state.tab {
        Tab::Text => ("[ Text ]", "  Vocab  "),
        Tab::Vocab => ("  Text  ", "[ Vocab ]"),
    };
    format!("{} {}\n{}\n", text, vocab, "-".repeat(40))
}

/// Passage with vocabulary marked, then the translation
fn render_text(state: &AppState, lesson: &Lesson) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Vocab: {}    Translation: {}",
        if state.show_highlights { "Visible" } else { "Hidden" },
        if state.show_translation { "On" } else { "Off" }
    );
    let _ = writeln!(
        out,
        "\nENGLISH STORY  ({})",
        if state.is_playing { "■ Stop" } else { "▶ Listen" }
    );

    let highlights = lesson.highlights();
    for seg in segment(&lesson.story.en, &highlights) {
        if !seg.highlighted {
            out.push_str(&seg.text);
        } else if state.show_highlights {
            let _ = write!(out, "[{}]", seg.text);
        } else {
            out.push_str(&"_".repeat(seg.text.chars().count()));
        }
    }
    out.push('\n');

    if state.show_translation {
        let _ = writeln!(out, "\n日本語訳\n{}", lesson.story.ja);
    }
    out
}

fn render_vocab(state: &AppState, lesson: &Lesson) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} 全選択 ({})    🖨 プリント作成",
        checkbox(state.all_selected(lesson)),
        state.selected_ids.len()
    );

    if state.show_menu {
        let _ = writeln!(out, "  形式を選択");
        for format in PrintFormat::ALL {
            let _ = writeln!(out, "   - {} ({})", format.menu_label(), format.as_str());
        }
    }
    out.push('\n');

    for entry in &lesson.vocabulary {
        out.push_str(&render_card(state, entry));
    }
    out
}

fn render_card(state: &AppState, entry: &VocabEntry) -> String {
    let expanded = state.is_expanded(&entry.id);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {:>3}  {}  {}",
        checkbox(state.is_selected(&entry.id)),
        entry.id,
        entry.word,
        if expanded { "▲" } else { "▼" }
    );
    let _ = writeln!(out, "         {}", entry.meaning);

    if expanded {
        if let Some(sentence) = &entry.sentence {
            let _ = writeln!(out, "         EX  {}", sentence);
            if let Some(translation) = &entry.translation {
                let _ = writeln!(out, "             {}", translation);
            }
        }
        let _ = writeln!(
            out,
            "         Pronunciation: {}",
            render_recorder(state, &entry.id, TargetKind::Word)
        );
        if entry.sentence.is_some() {
            let _ = writeln!(
                out,
                "         Sentence:      {}",
                render_recorder(state, &entry.id, TargetKind::Sentence)
            );
        }
    }
    out.push('\n');
    out
}

/// Recorder widget for one word-or-sentence target
pub fn render_recorder(state: &AppState, id: &str, kind: TargetKind) -> String {
    let Some(attempt) = state.recording.attempt_for(id, kind) else {
        return "🎤 Record".to_string();
    };

    match attempt.state() {
        AttemptState::Capturing => "🎤 Listening...".to_string(),
        AttemptState::Complete | AttemptState::Failed => {
            let score = attempt.display_score().unwrap_or_default();
            format!(
                "You said: \"{}\"  {}  {} SCORE {}  ↺",
                attempt.transcript().unwrap_or_default(),
                attempt.feedback().unwrap_or_default(),
                score_mark(score),
                score
            )
        }
        AttemptState::Idle => "🎤 Record".to_string(),
    }
}

/// Badge mark: passing scores get a check
fn score_mark(score: u8) -> &'static str {
    if score >= PASS_MARK {
        "✔"
    } else {
        "△"
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Message;
    use crate::core::{CaptureEvent, Target};
    use crate::lesson::tests::sample;

    #[test]
    fn test_text_tab_highlights() {
        let lesson = sample();
        let state = AppState::new(&lesson);
        let out = render(&state, &lesson);
        assert!(out.contains("[ Text ]"));
        assert!(out.contains("the tea [plant.]"));
        assert!(out.contains("日本語訳"));

        let (state, _) = state.update(&lesson, Message::ToggleHighlights);
        let (state, _) = state.update(&lesson, Message::ToggleTranslation);
        let out = render(&state, &lesson);
        assert!(out.contains("the tea ______ Both"));
        assert!(!out.contains("日本語訳"));
    }

    #[test]
    fn test_vocab_tab_cards_and_menu() {
        let lesson = sample();
        let state = AppState::new(&lesson);
        let (state, _) = state.update(&lesson, Message::TabSelected(Tab::Vocab));
        let (state, _) = state.update(&lesson, Message::ToggleSelect("3".to_string()));
        let (state, _) = state.update(&lesson, Message::ToggleMenu);

        let out = render(&state, &lesson);
        assert!(out.contains("[ ] 全選択 (2)"));
        assert!(out.contains("[x]   1  variety  ▼"));
        assert!(out.contains("[ ]   3  cultivate  ▼"));
        assert!(out.contains("折りたたみ (foldable)"));
    }

    #[test]
    fn test_recorder_states() {
        let lesson = sample();
        let state = AppState::new(&lesson);
        assert_eq!(render_recorder(&state, "1", TargetKind::Word), "🎤 Record");

        let target = Target::new("1", TargetKind::Word, "variety");
        let (state, _) = state.update(&lesson, Message::RecordRequested(target));
        assert_eq!(render_recorder(&state, "1", TargetKind::Word), "🎤 Listening...");
        assert_eq!(render_recorder(&state, "1", TargetKind::Sentence), "🎤 Record");

        let attempt = state.recording.current().unwrap().id;
        let (state, _) = state.update(
            &lesson,
            Message::Capture(CaptureEvent::error(attempt, "not-allowed")),
        );
        let widget = render_recorder(&state, "1", TargetKind::Word);
        assert!(widget.contains("You said: \"Error: not-allowed\""));
        assert!(widget.contains("Could not hear you. Please try again."));
        assert!(widget.contains("△ SCORE 0"));
    }

    #[test]
    fn test_score_badge_mark() {
        let lesson = sample();
        let target = Target::new("3", TargetKind::Word, "cultivate");
        let (state, _) = AppState::new(&lesson).update(&lesson, Message::RecordRequested(target));
        let attempt = state.recording.current().unwrap().id;

        // "cultivat" is 89: passing
        let (passed, _) = state.clone().update(
            &lesson,
            Message::Capture(CaptureEvent::transcript(attempt, "cultivat")),
        );
        let widget = render_recorder(&passed, "3", TargetKind::Word);
        assert!(widget.contains("✔ SCORE 89"), "{}", widget);

        // "cult" is 44: not passing
        let (missed, _) = state.update(
            &lesson,
            Message::Capture(CaptureEvent::transcript(attempt, "cult")),
        );
        let widget = render_recorder(&missed, "3", TargetKind::Word);
        assert!(widget.contains("△ SCORE 44"), "{}", widget);
    }

    #[test]
    fn test_expanded_card_shows_sentence_recorder() {
        let lesson = sample();
        let state = AppState::new(&lesson);
        let (state, _) = state.update(&lesson, Message::TabSelected(Tab::Vocab));
        let (state, _) = state.update(&lesson, Message::ToggleExpand("2".to_string()));
        let (state, _) = state.update(&lesson, Message::ToggleExpand("3".to_string()));

        let out = render(&state, &lesson);
        assert!(out.contains("EX  Water the plant every day."));
        assert_eq!(out.matches("Sentence:").count(), 1);
        assert_eq!(out.matches("Pronunciation:").count(), 2);
    }

    #[test]
    fn test_print_view() {
        let lesson = sample();
        let state = AppState::new(&lesson);
        let (state, _) = state.update(&lesson, Message::PrintRequested(PrintFormat::TestSpelling));
        let out = render(&state, &lesson);
        assert!(out.contains("スペルテスト"));
        assert!(out.contains("(9 letters)"));
    }
}
