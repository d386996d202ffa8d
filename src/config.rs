use crate::error::{CoachError, CoachResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Lesson
    pub lesson_path: String,

    // Speech output
    pub tts_engine: String,
    pub preferred_voice: String,
    pub story_rate: f32,

    // Speech capture
    pub capture_engine: String,
    pub speech_lang: String,
    pub vosk_model_path: String,
    pub audio_device: Option<usize>,
    pub capture_timeout_secs: u64,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lesson_path: "data.json".to_string(),
            tts_engine: "system".to_string(),
            preferred_voice: "Google US English".to_string(),
            story_rate: 0.9,
            capture_engine: "typed".to_string(),
            speech_lang: "en-US".to_string(),
            vosk_model_path: dirs::data_dir()
                .unwrap_or_default()
                .join("vocab-coach/models/vosk-model-small-en-us")
                .to_string_lossy()
                .to_string(),
            audio_device: None,
            capture_timeout_secs: 8,
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                // Graceful degradation: log warning and use defaults
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = config_path.with_extension("json.corrupt");
                let _ = std::fs::rename(config_path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Reject values the speech backends cannot use
    pub fn validate(&self) -> CoachResult<()> {
        if !(self.story_rate > 0.0 && self.story_rate <= 4.0) {
            return Err(CoachError::Config(format!(
                "story_rate must be in (0, 4], got {}",
                self.story_rate
            )));
        }
        if self.capture_timeout_secs == 0 {
            return Err(CoachError::Config(
                "capture_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.speech_lang.trim().is_empty() {
            return Err(CoachError::Config("speech_lang is empty".to_string()));
        }
        Ok(())
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-coach")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.lesson_path, "data.json");
        assert_eq!(config.tts_engine, "system");
        assert_eq!(config.capture_engine, "typed");
        assert_eq!(config.speech_lang, "en-US");
        assert!((config.story_rate - 0.9).abs() < f32::EPSILON);
        assert!(config.audio_device.is_none());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.json");

        let mut config = Config::default();
        config.capture_engine = "mic".to_string();
        config.audio_device = Some(2);
        config.save_to(&path).expect("Failed to save");

        let restored = Config::load_from(&path).expect("Failed to load");
        assert_eq!(restored.capture_engine, "mic");
        assert_eq!(restored.audio_device, Some(2));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "lesson_path": "story02/data.json" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.lesson_path, "story02/data.json");
        assert_eq!(config.tts_engine, "system");
    }

    #[test]
    fn test_config_corrupt_json_handling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not valid json").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.capture_engine, "typed");
        assert!(!path.exists());
        assert!(dir.path().join("config.json.corrupt").exists());
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let config = Config {
            story_rate: 0.0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CoachError::Config(_))));

        let config = Config {
            capture_timeout_secs: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CoachError::Config(_))));

        let config = Config {
            speech_lang: "  ".to_string(),
            ..Config::default()
        };
        match config.validate() {
            Err(CoachError::Config(msg)) => assert!(msg.contains("speech_lang")),
            other => panic!("expected Config error, got {:?}", other),
        }

        let config = Config {
            story_rate: 4.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.log_level, "INFO");
    }
}
