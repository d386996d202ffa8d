//! Mock speech output for testing
//!
//! Records all spoken text for verification.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vocab_coach::tts::{SpeechOutput, Voice};

/// One recorded `speak` call
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<String>,
    pub rate: f32,
}

/// Mock speech engine that records spoken text
#[derive(Debug)]
pub struct MockTts {
    /// All text that was "spoken"
    pub spoken: Arc<Mutex<Vec<Utterance>>>,
    /// Number of cancel calls
    pub cancels: Arc<Mutex<usize>>,
    /// Simulate failure on speak
    pub should_fail: Arc<Mutex<bool>>,
    pub voices: Vec<Voice>,
}

impl MockTts {
    pub fn new() -> Self {
        Self {
            spoken: Arc::new(Mutex::new(Vec::new())),
            cancels: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            voices: Vec::new(),
        }
    }

    pub fn failing() -> Self {
        let mock = Self::new();
        *mock.should_fail.lock().unwrap() = true;
        mock
    }

    /// Get all spoken phrases
    pub fn get_spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }

    /// Check if a phrase was spoken
    pub fn was_spoken(&self, text: &str) -> bool {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.text.contains(text))
    }

    pub fn cancel_count(&self) -> usize {
        *self.cancels.lock().unwrap()
    }
}

impl Default for MockTts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechOutput for MockTts {
    async fn speak(&self, text: &str, voice: Option<&str>, rate: f32) -> Result<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock TTS failure"));
        }
        self.spoken.lock().unwrap().push(Utterance {
            text: text.to_string(),
            voice: voice.map(str::to_string),
            rate,
        });
        Ok(())
    }

    async fn cancel(&self) -> Result<()> {
        *self.cancels.lock().unwrap() += 1;
        Ok(())
    }

    async fn voices(&self) -> Result<Vec<Voice>> {
        Ok(self.voices.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_tts_records_speech() {
        let mock = MockTts::new();
        mock.speak("hello", None, 1.0).await.unwrap();
        mock.speak("world", Some("Samantha"), 0.9).await.unwrap();

        assert!(mock.was_spoken("hello"));
        assert!(mock.was_spoken("world"));
        assert_eq!(mock.get_spoken().len(), 2);
        assert_eq!(mock.get_spoken()[1].voice.as_deref(), Some("Samantha"));
    }
}
