//! Interactive study session
//!
//! Reads one command per line, turns it into a [`Message`] and re-renders
//! the view after every update. Recording does not block the prompt: a new
//! `record` supersedes the attempt in flight, and capture events that
//! arrive for it afterwards are dropped by the session.
//!
//! With the typed backend the loop owns stdin, so the answer to a pending
//! attempt is typed as a line starting with `>`.

use crate::app::{view, AppState, Message, Tab};
use crate::capture::TypedRelay;
use crate::core::{Target, TargetKind};
use crate::error::{CoachError, CoachResult};
use crate::lesson::Lesson;
use crate::practice::Practice;
use crate::print::PrintFormat;
use clap::ValueEnum;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Prefix for a typed answer to the pending recording
pub const ANSWER_PREFIX: char = '>';

pub const HELP: &str = "\
Commands:
  tab [text|vocab]        switch tab
  select ID | all         toggle selection
  expand ID               open or close a card
  highlights              show or hide vocabulary in the passage
  translation             show or hide the translation
  menu                    open or close the print menu
  print FORMAT | back     print preview / back to the study view
  voice [NAME]            choose a voice (none: engine default)
  play                    listen to the passage (again to stop)
  say ID [--sentence]     listen to a word or its sentence
  record ID [--sentence]  record a word or its sentence
  > WHAT YOU SAID         answer the pending recording (typed capture)
  ok                      dismiss the notice
  help | quit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum StudyCommand {
    Message(Message),
    /// Typed answer for the pending recording
    Answer(String),
    Help,
    Quit,
    Blank,
}

/// Parse a command line against the lesson
pub fn parse_command(lesson: &Lesson, state: &AppState, line: &str) -> CoachResult<StudyCommand> {
    let line = line.trim();
    if let Some(answer) = line.strip_prefix(ANSWER_PREFIX) {
        return Ok(StudyCommand::Answer(answer.trim().to_string()));
    }

    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(StudyCommand::Blank);
    };
    let args: Vec<&str> = words.collect();

    let message = match (command, args.as_slice()) {
        ("help" | "?", []) => return Ok(StudyCommand::Help),
        ("quit" | "q" | "exit", []) => return Ok(StudyCommand::Quit),
        ("tab", []) => Message::TabSelected(match state.tab {
            Tab::Text => Tab::Vocab,
            Tab::Vocab => Tab::Text,
        }),
        ("tab", ["text"]) => Message::TabSelected(Tab::Text),
        ("tab", ["vocab"]) => Message::TabSelected(Tab::Vocab),
        ("select", [id]) => Message::ToggleSelect(lesson.require(id)?.id.clone()),
        ("all", []) => Message::ToggleAll,
        ("expand", [id]) => Message::ToggleExpand(lesson.require(id)?.id.clone()),
        ("highlights", []) => Message::ToggleHighlights,
        ("translation", []) => Message::ToggleTranslation,
        ("menu", []) => Message::ToggleMenu,
        ("print", [format]) => Message::PrintRequested(
            PrintFormat::from_str(format, true)
                .map_err(|_| CoachError::Command(format!("unknown print format '{}'", format)))?,
        ),
        ("back", []) => Message::BackToApp,
        ("voice", []) => Message::VoiceSelected(None),
        ("voice", name) => Message::VoiceSelected(Some(name.join(" "))),
        ("play", []) => Message::PlayStory,
        ("say", rest) => Message::PlayText(target_arg(lesson, rest)?.text),
        ("record", rest) => Message::RecordRequested(target_arg(lesson, rest)?),
        ("ok", []) => Message::DismissNotice,
        _ => return Err(CoachError::Command(format!("'{}' (try help)", line))),
    };
    Ok(StudyCommand::Message(message))
}

/// `ID` or `ID --sentence`
fn target_arg(lesson: &Lesson, args: &[&str]) -> CoachResult<Target> {
    match args {
        [id] => lesson.target(id, TargetKind::Word),
        [id, "--sentence"] | ["--sentence", id] => lesson.target(id, TargetKind::Sentence),
        _ => Err(CoachError::Command("expected ID [--sentence]".to_string())),
    }
}

/// Interactive loop over a lesson
pub struct Study<'a> {
    practice: &'a Practice,
    lesson: &'a Lesson,
    relay: Option<Arc<TypedRelay>>,
}

impl<'a> Study<'a> {
    pub fn new(practice: &'a Practice, lesson: &'a Lesson) -> Self {
        Self {
            practice,
            lesson,
            relay: None,
        }
    }

    /// Route `>` answers to this relay (it must also be the practice's capture)
    pub fn with_relay(mut self, relay: Arc<TypedRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Run until `quit` or end of input, returning the final state
    ///
    /// Speech still playing at the end is waited for, and pending capture
    /// events are applied before returning.
    pub async fn run<R, W>(&self, state: AppState, input: R, out: &mut W) -> CoachResult<AppState>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (followup_tx, mut followup_rx) = mpsc::unbounded_channel();
        let mut speaking: Vec<JoinHandle<()>> = Vec::new();
        let mut lines = input.lines();
        let mut state = state;

        info!("📖 Study session started");
        write!(out, "{}", view::render(&state, self.lesson))?;

        loop {
            let message = tokio::select! {
                biased;
                Some(event) = events_rx.recv() => Message::Capture(event),
                Some(message) = followup_rx.recv() => message,
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match parse_command(self.lesson, &state, &line) {
                        Ok(StudyCommand::Message(message)) => message,
                        Ok(StudyCommand::Answer(text)) => {
                            self.answer(&text, out)?;
                            continue;
                        }
                        Ok(StudyCommand::Help) => {
                            writeln!(out, "{}", HELP)?;
                            continue;
                        }
                        Ok(StudyCommand::Quit) => break,
                        Ok(StudyCommand::Blank) => continue,
                        Err(e) => {
                            writeln!(out, "⚠ {}", e)?;
                            continue;
                        }
                    }
                }
            };

            let (next, handle) = self.practice.dispatch_detached(
                state,
                self.lesson,
                message,
                &events_tx,
                &followup_tx,
            );
            state = next;
            speaking.retain(|handle| !handle.is_finished());
            speaking.extend(handle);
            write!(out, "{}", view::render(&state, self.lesson))?;
        }

        if let Some(relay) = &self.relay {
            relay.close();
        }
        for handle in speaking {
            if let Err(e) = handle.await {
                warn!("Speech task failed: {}", e);
            }
        }

        while let Ok(message) = followup_rx.try_recv() {
            state = state.update(self.lesson, message).0;
        }
        while let Ok(event) = events_rx.try_recv() {
            state = state.update(self.lesson, Message::Capture(event)).0;
        }

        info!("👋 Study session ended");
        Ok(state)
    }

    fn answer<W: Write>(&self, text: &str, out: &mut W) -> CoachResult<()> {
        let delivered = match &self.relay {
            Some(relay) => relay.deliver(text),
            None => {
                debug!("Typed answer with a non-typed capture backend");
                false
            }
        };
        if !delivered {
            writeln!(out, "⚠ Nothing is waiting for a typed answer")?;
        }
        Ok(())
    }
}
