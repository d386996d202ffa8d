//! Vocab Coach - vocabulary study in the terminal

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vocab_coach::app::{view, AppState, Message, Tab};
use vocab_coach::capture::{self, SpeechCapture, TypedRelay};
use vocab_coach::config::{config_path, Config};
use vocab_coach::core::{self as scoring, TargetKind};
use vocab_coach::lesson::Lesson;
use vocab_coach::practice::Practice;
use vocab_coach::print::PrintFormat;
use vocab_coach::study::Study;
use vocab_coach::tts::{self, SpeechOutput};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lesson data file (overrides the config)
    #[arg(short, long)]
    lesson: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the study view
    Show {
        /// Open the vocabulary tab instead of the passage
        #[arg(long)]
        vocab: bool,
        /// Mask vocabulary words in the passage
        #[arg(long)]
        hide_vocab: bool,
        /// Hide the Japanese translation
        #[arg(long)]
        no_translation: bool,
        /// Expand these vocabulary cards
        #[arg(long)]
        expand: Vec<String>,
    },
    /// Interactive study session (type `help` at the prompt)
    Study,
    /// Score a transcript against a target phrase
    Score {
        target: String,
        transcript: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Speak the passage, a word, or its example sentence
    Say {
        /// Entry id
        id: Option<String>,
        /// Speak the whole passage
        #[arg(long, conflicts_with = "id")]
        story: bool,
        /// Speak the example sentence instead of the word
        #[arg(long)]
        sentence: bool,
    },
    /// Record and score a word or sentence
    Practice {
        id: String,
        /// Practice the example sentence instead of the word
        #[arg(long)]
        sentence: bool,
        /// Play the model pronunciation first
        #[arg(long)]
        listen_first: bool,
    },
    /// Print a study sheet
    Print {
        #[arg(value_enum)]
        format: PrintFormat,
        /// Only include these entry ids (default: all)
        #[arg(long)]
        only: Vec<String>,
    },
    /// List synthesis voices
    Voices,
    /// Show the effective configuration as JSON
    Config {
        /// Write it to the config file, creating one with defaults if absent
        #[arg(long)]
        save: bool,
    },
}

fn init_logging(verbose: bool, config: &Config) -> Result<()> {
    let default_level = if verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))
}

fn load_lesson(args: &Args, config: &Config) -> Result<Lesson> {
    let path = args
        .lesson
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.lesson_path));
    Lesson::load(&path).with_context(|| format!("Could not load lesson {}", path.display()))
}

fn target_kind(sentence: bool) -> TargetKind {
    if sentence {
        TargetKind::Sentence
    } else {
        TargetKind::Word
    }
}

/// Capture backend for the app, and whether recording is possible at all
fn capture_backend(config: &Config) -> (Arc<dyn SpeechCapture>, bool) {
    match capture::create_capture(config) {
        Ok(capture) => (capture, true),
        Err(e) => {
            warn!("{}", e);
            (Arc::new(capture::TypedCapture::new()), false)
        }
    }
}

async fn initial_state(
    lesson: &Lesson,
    config: &Config,
    speech: &Arc<dyn SpeechOutput>,
    capture_available: bool,
) -> AppState {
    let voice = match speech.voices().await {
        Ok(voices) => tts::pick_voice(&voices, &config.preferred_voice).map(|v| v.name.clone()),
        Err(e) => {
            warn!("Could not list voices: {}", e);
            None
        }
    };
    AppState::new(lesson)
        .with_capture(capture_available)
        .with_voice(voice)
        .with_speech(&config.speech_lang, config.story_rate)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    init_logging(args.verbose, &config)?;
    config.validate()?;

    info!("📚 Vocab Coach v{} starting...", env!("CARGO_PKG_VERSION"));

    match &args.command {
        Command::Score {
            target,
            transcript,
            json,
        } => {
            let result = scoring::score(target, transcript);
            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("SCORE {} ({:?})", result.score, result.tier);
                println!("{}", result.feedback);
            }
        }
        Command::Study => {
            let lesson = load_lesson(&args, &config)?;
            let speech = tts::create_engine(&config).await?;

            // The loop owns stdin, so typed answers go through a relay
            let relay = Arc::new(TypedRelay::new());
            let (capture, available): (Arc<dyn SpeechCapture>, bool) =
                if config.capture_engine == "typed" {
                    (Arc::clone(&relay) as Arc<dyn SpeechCapture>, true)
                } else {
                    capture_backend(&config)
                };
            let state = initial_state(&lesson, &config, &speech, available).await;
            let practice = Practice::new(capture, speech);

            let mut study = Study::new(&practice, &lesson);
            if config.capture_engine == "typed" {
                study = study.with_relay(relay);
            }
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            study.run(state, input, &mut std::io::stdout()).await?;
        }
        Command::Show {
            vocab,
            hide_vocab,
            no_translation,
            expand,
        } => {
            let lesson = load_lesson(&args, &config)?;
            let mut state = AppState::new(&lesson);
            let mut messages = Vec::new();
            if *vocab {
                messages.push(Message::TabSelected(Tab::Vocab));
            }
            if *hide_vocab {
                messages.push(Message::ToggleHighlights);
            }
            if *no_translation {
                messages.push(Message::ToggleTranslation);
            }
            for id in expand {
                lesson.require(id)?;
                messages.push(Message::ToggleExpand(id.clone()));
            }
            for message in messages {
                state = state.update(&lesson, message).0;
            }
            print!("{}", view::render(&state, &lesson));
        }
        Command::Print { format, only } => {
            let lesson = load_lesson(&args, &config)?;
            let mut messages = Vec::new();
            if !only.is_empty() {
                // Everything starts selected: clear, then pick
                messages.push(Message::ToggleAll);
                for id in only {
                    let pick = Message::ToggleSelect(lesson.require(id)?.id.clone());
                    if !messages.contains(&pick) {
                        messages.push(pick);
                    }
                }
            }
            messages.push(Message::PrintRequested(*format));

            let state = messages
                .into_iter()
                .fold(AppState::new(&lesson), |state, message| {
                    state.update(&lesson, message).0
                });
            print!("{}", view::render(&state, &lesson));
        }
        Command::Say {
            id,
            story,
            sentence,
        } => {
            let lesson = load_lesson(&args, &config)?;
            let speech = tts::create_engine(&config).await?;
            let capture: Arc<dyn SpeechCapture> = Arc::new(capture::TypedCapture::new());
            let state = initial_state(&lesson, &config, &speech, false).await;
            let practice = Practice::new(capture, speech);

            let message = match (id, story) {
                (_, true) => Message::PlayStory,
                (Some(id), false) => {
                    Message::PlayText(lesson.target(id, target_kind(*sentence))?.text)
                }
                (None, false) => anyhow::bail!("Give an entry id or --story"),
            };
            practice.dispatch(state, &lesson, message).await;
        }
        Command::Practice {
            id,
            sentence,
            listen_first,
        } => {
            let lesson = load_lesson(&args, &config)?;
            let target = lesson.target(id, target_kind(*sentence))?;
            let speech = tts::create_engine(&config).await?;

            let (capture, available) = capture_backend(&config);
            let mut state = initial_state(&lesson, &config, &speech, available).await;
            let practice = Practice::new(Arc::clone(&capture), speech);

            if *listen_first {
                state = practice
                    .dispatch(state, &lesson, Message::PlayText(target.text.clone()))
                    .await;
            }

            println!("Say: {}", target.text);
            if available && capture.name() == "typed" {
                println!("(type what you said and press Enter)");
            }
            let state = practice.run_attempt(state, &lesson, target.clone()).await;

            if let Some(notice) = &state.notice {
                eprintln!("{}", notice);
                std::process::exit(1);
            }
            println!("{}", view::render_recorder(&state, &target.id, target.kind));
        }
        Command::Voices => {
            let speech = tts::create_engine(&config).await?;
            let voices = speech.voices().await?;
            let picked = tts::pick_voice(&voices, &config.preferred_voice).map(|v| v.name.clone());
            for voice in &voices {
                let marker = if picked.as_deref() == Some(voice.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {} ({})", marker, voice.name, voice.lang);
            }
        }
        Command::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if *save {
                match &args.config {
                    Some(path) => config.save_to(path)?,
                    None => config.save()?,
                }
                let path = args.config.clone().unwrap_or_else(config_path);
                info!("💾 Saved config to {}", path.display());
            }
        }
    }

    Ok(())
}
