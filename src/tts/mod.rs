//! TTS (Text-to-Speech) Module
//!
//! Provides a unified speech output interface for multiple backends, plus
//! voice selection.

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub mod speechd;
pub mod system;

/// A synthesis voice offered by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 style language tag, e.g. `en-US`
    pub lang: String,
}

/// Trait for speech output engines
#[async_trait]
pub trait SpeechOutput: Send + Sync + std::fmt::Debug {
    /// Speak the given text, returning once it has been spoken
    ///
    /// `rate` is relative to the engine's normal speed (1.0).
    async fn speak(&self, text: &str, voice: Option<&str>, rate: f32) -> Result<()>;

    /// Stop anything currently being spoken
    async fn cancel(&self) -> Result<()> {
        Ok(())
    }

    /// Voices the engine can use
    async fn voices(&self) -> Result<Vec<Voice>> {
        Ok(Vec::new())
    }

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Pick a default English voice
///
/// Prefers a voice whose name contains `preferred`, then any `en-US`
/// voice, then any English voice.
pub fn pick_voice<'a>(voices: &'a [Voice], preferred: &str) -> Option<&'a Voice> {
    let lang_starts = move |prefix: &str| {
        voices
            .iter()
            .find(|v| v.lang.to_lowercase().starts_with(&prefix.to_lowercase()))
    };

    voices
        .iter()
        .find(|v| !preferred.is_empty() && v.name.contains(preferred))
        .or_else(|| lang_starts("en-US"))
        .or_else(|| lang_starts("en"))
}

/// Factory to create the configured speech output engine
pub async fn create_engine(config: &Config) -> Result<Arc<dyn SpeechOutput>> {
    info!("🛠️ Creating TTS engine: {}", config.tts_engine);
    let engine: Arc<dyn SpeechOutput> = match config.tts_engine.as_str() {
        "speechd_ng" | "speechd" => {
            info!("  - Using Speechd TTS");
            let client = speechd::SpeechdEngine::connect().await?;
            Arc::new(client)
        }
        "system" => {
            info!("  - Using System TTS");
            Arc::new(system::SystemEngine::new())
        }
        _ => {
            warn!(
                "  - Unknown engine '{}', falling back to System",
                config.tts_engine
            );
            Arc::new(system::SystemEngine::new())
        }
    };
    info!("✅ TTS engine '{}' initialized", engine.name());
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str, lang: &str) -> Voice {
        Voice {
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }

    #[test]
    fn test_pick_preferred_voice() {
        let voices = vec![
            voice("Alex", "en-US"),
            voice("Google US English", "en-US"),
            voice("Kyoko", "ja-JP"),
        ];
        let picked = pick_voice(&voices, "Google US English").unwrap();
        assert_eq!(picked.name, "Google US English");
    }

    #[test]
    fn test_pick_falls_back_to_language() {
        let voices = vec![voice("Daniel", "en-GB"), voice("Samantha", "en-US")];
        assert_eq!(pick_voice(&voices, "Google US English").unwrap().name, "Samantha");

        let voices = vec![voice("Kyoko", "ja-JP"), voice("Daniel", "en-GB")];
        assert_eq!(pick_voice(&voices, "").unwrap().name, "Daniel");
    }

    #[test]
    fn test_pick_none_without_english() {
        let voices = vec![voice("Kyoko", "ja-JP")];
        assert!(pick_voice(&voices, "Google US English").is_none());
        assert!(pick_voice(&[], "Google US English").is_none());
    }

    #[tokio::test]
    async fn test_create_engine_unknown_falls_back_to_system() {
        let config = Config {
            tts_engine: "nonexistent".to_string(),
            ..Config::default()
        };
        let engine = create_engine(&config).await.unwrap();
        assert_eq!(engine.name(), "system");
    }
}
