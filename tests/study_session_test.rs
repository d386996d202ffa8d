use std::sync::Arc;
use vocab_coach::app::{AppState, Tab, ViewMode};
use vocab_coach::capture::{SpeechCapture, TypedRelay};
use vocab_coach::core::{AttemptState, CaptureOutcome, FeedbackTier, TargetKind};
use vocab_coach::lesson::Lesson;
use vocab_coach::practice::Practice;
use vocab_coach::study::Study;

mod common;
use common::mock_capture::{MockCapture, Script};
use common::mock_tts::MockTts;

/// Run a typed-capture session over `script`, returning the final state and output
async fn run_typed(lesson: &Lesson, tts: Arc<MockTts>, script: &str) -> (AppState, String) {
    let relay = Arc::new(TypedRelay::new());
    let practice = Practice::new(Arc::clone(&relay) as Arc<dyn SpeechCapture>, tts);
    let study = Study::new(&practice, lesson).with_relay(relay);

    let mut out = Vec::new();
    let input = tokio::io::BufReader::new(script.as_bytes());
    let state = study
        .run(AppState::new(lesson), input, &mut out)
        .await
        .expect("session runs");
    (state, String::from_utf8(out).expect("utf-8 output"))
}

#[tokio::test]
async fn test_scripted_session_with_rerecord() {
    let (_file, lesson) = common::lesson_file();
    let tts = Arc::new(MockTts::new());

    let script = "\
tab
select 2
all
voice Samantha
say 2
expand 3
record 3
record 3
> harvest
record 3
> harvst
";
    let (state, out) = run_typed(&lesson, tts.clone(), script).await;

    assert_eq!(state.tab, Tab::Vocab);
    assert!(state.all_selected(&lesson));
    assert!(state.is_expanded("3"));
    assert_eq!(state.voice.as_deref(), Some("Samantha"));

    // Word playback used the chosen voice and interrupted first
    let spoken = tts.get_spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].text, "climate");
    assert_eq!(spoken[0].voice.as_deref(), Some("Samantha"));
    assert_eq!(tts.cancel_count(), 1);

    // The superseded first attempt's end event never failed the second one
    assert!(!out.contains("no-speech"));
    assert!(out.contains("🎤 Listening..."));
    assert!(out.contains("You said: \"harvest\""));
    assert!(out.contains("✔ SCORE 100"));

    // The re-record replaced the finished result
    let attempt = state.recording.current().unwrap();
    assert_eq!(attempt.target.id, "3");
    assert_eq!(attempt.transcript(), Some("harvst"));
    let result = attempt.result().unwrap();
    assert_eq!(result.score, 86);
    assert_eq!(result.tier, FeedbackTier::Good);
    assert!(out.contains("✔ SCORE 86"));
}

#[tokio::test]
async fn test_print_menu_flow_and_notice() {
    let (_file, lesson) = common::lesson_file();
    let script = "\
tab vocab
all
menu
print cards
ok
select 1
select 4
print cards
back
";
    let (state, out) = run_typed(&lesson, Arc::new(MockTts::new()), script).await;

    // Nothing selected: notice instead of a preview
    assert!(out.contains("⚠ 単語を選択してください"));
    assert!(out.contains("単語カード"));
    assert!(out.contains("| No. 4"));
    assert_eq!(state.view_mode, ViewMode::App);
    assert!(state.notice.is_none());
    assert!(state.is_selected("1") && state.is_selected("4"));
    assert!(!state.is_selected("2"));
}

#[tokio::test]
async fn test_bad_lines_do_not_end_the_session() {
    let (_file, lesson) = common::lesson_file();
    let script = "\
select 9
dance
> nobody asked
help
expand 1
";
    let (state, out) = run_typed(&lesson, Arc::new(MockTts::new()), script).await;

    assert!(out.contains("⚠ Unknown vocabulary entry"));
    assert!(out.contains("⚠ Unknown study command"));
    assert!(out.contains("⚠ Nothing is waiting for a typed answer"));
    assert!(out.contains("record ID [--sentence]"));
    assert!(state.is_expanded("1"));
}

#[tokio::test]
async fn test_input_closed_while_recording() {
    let (_file, lesson) = common::lesson_file();
    let (state, _) = run_typed(&lesson, Arc::new(MockTts::new()), "record 1 --sentence\n").await;

    let attempt = state.recording.current().unwrap();
    assert_eq!(attempt.target.kind, TargetKind::Sentence);
    assert_eq!(attempt.state(), AttemptState::Failed);
    assert_eq!(attempt.transcript(), Some("Error: no-speech"));
}

#[tokio::test]
async fn test_quit_stops_reading() {
    let (_file, lesson) = common::lesson_file();
    let (state, _) = run_typed(&lesson, Arc::new(MockTts::new()), "quit\ntab\n").await;
    assert_eq!(state.tab, Tab::Text);
}

#[tokio::test]
async fn test_late_event_from_superseded_backend_attempt() {
    let (_file, lesson) = common::lesson_file();

    // First attempt hears nothing yet; the second gets the first's late
    // transcript before its own
    let capture = Arc::new(MockCapture::new(vec![Script::Silent]));
    let practice = Practice::new(capture.clone(), Arc::new(MockTts::new()));
    let study = Study::new(&practice, &lesson);
    let mut out = Vec::new();
    let state = study
        .run(
            AppState::new(&lesson),
            tokio::io::BufReader::new("record 2\n".as_bytes()),
            &mut out,
        )
        .await
        .unwrap();
    let first = state.recording.current().unwrap().id;

    let capture = Arc::new(MockCapture::new(vec![Script::StaleThenReply(
        first,
        CaptureOutcome::Transcript("climate".to_string()),
    )]));
    let practice = Practice::new(capture.clone(), Arc::new(MockTts::new()));
    let study = Study::new(&practice, &lesson);
    let state = study
        .run(state, tokio::io::BufReader::new("record 2\n".as_bytes()), &mut out)
        .await
        .unwrap();

    let attempt = state.recording.current().unwrap();
    assert_ne!(attempt.id, first);
    assert_eq!(attempt.transcript(), Some("climate"));
    assert_eq!(attempt.result().unwrap().score, 100);
    assert_eq!(capture.started().len(), 1);
}
