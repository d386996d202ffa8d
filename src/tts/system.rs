//! System TTS engine using speech-dispatcher or espeak-ng

use super::{SpeechOutput, Voice};
use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// espeak-ng's default speed in words per minute
const ESPEAK_BASE_WPM: f32 = 175.0;

#[derive(Debug)]
pub struct SystemEngine;

impl Default for SystemEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Map a relative rate onto spd-say's -100..=100 scale
fn spd_rate(rate: f32) -> i32 {
    ((rate - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32
}

fn espeak_wpm(rate: f32) -> u32 {
    (ESPEAK_BASE_WPM * rate).round().max(80.0) as u32
}

/// Parse the table printed by `spd-say -L`
///
/// The first line is a header; each following line ends with the language
/// and variant columns, and the voice name may itself contain spaces.
fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                return None;
            }
            let lang = fields[fields.len() - 2];
            let name = fields[..fields.len() - 2].join(" ");
            Some(Voice {
                name,
                lang: lang.to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl SpeechOutput for SystemEngine {
    async fn speak(&self, text: &str, voice: Option<&str>, rate: f32) -> Result<()> {
        debug!("System speaking: {} (voice {:?}, rate {})", text, voice, rate);

        // Try spd-say (speech-dispatcher) or espeak-ng
        let mut spd = Command::new("spd-say");
        spd.arg("-w").arg("-r").arg(spd_rate(rate).to_string());
        if let Some(voice) = voice {
            spd.arg("-y").arg(voice);
        }
        if let Ok(status) = spd.arg(text).status().await {
            if status.success() {
                return Ok(());
            }
        }

        let mut espeak = Command::new("espeak-ng");
        espeak.arg("-s").arg(espeak_wpm(rate).to_string());
        if let Some(voice) = voice {
            espeak.arg("-v").arg(voice);
        }
        if let Ok(status) = espeak.arg(text).status().await {
            if status.success() {
                return Ok(());
            }
        }

        Err(anyhow::anyhow!(
            "No system TTS command found (tried spd-say, espeak-ng)"
        ))
    }

    async fn cancel(&self) -> Result<()> {
        // Nothing to cancel if speech-dispatcher is missing
        let _ = Command::new("spd-say").arg("-C").status().await;
        Ok(())
    }

    async fn voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new("spd-say").arg("-L").output().await?;
        if !output.status.success() {
            return Err(anyhow::anyhow!("spd-say -L failed with {}", output.status));
        }
        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn name(&self) -> &str {
        "system"
    }
}
