//! Microphone capture backend using cpal and Vosk

use super::{CaptureSender, SpeechCapture};
use crate::config::Config;
use crate::core::{AttemptId, CaptureEvent};
use crate::error::{CoachError, CoachResult};
use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use vosk::{DecodingState, Model, Recognizer};

const SAMPLE_RATE: u32 = 16000;
const CHUNK_SIZE: usize = 1024;

/// Vosk-backed microphone capture
pub struct MicCapture {
    model: Arc<Model>,
    device_index: Option<usize>,
    timeout: Duration,
}

impl MicCapture {
    pub fn new(config: &Config) -> CoachResult<Self> {
        let model_path = PathBuf::from(&config.vosk_model_path);
        if !model_path.exists() {
            return Err(CoachError::CaptureUnavailable(format!(
                "Vosk model not found at {}",
                model_path.display()
            )));
        }

        let model_str = model_path.to_str().ok_or_else(|| {
            CoachError::CaptureUnavailable(format!(
                "Vosk model path is not valid UTF-8: {}",
                model_path.display()
            ))
        })?;

        info!("Loading Vosk model from: {}", model_path.display());
        let model = Model::new(model_str).ok_or_else(|| {
            CoachError::CaptureUnavailable("Failed to load Vosk model".to_string())
        })?;

        Ok(Self {
            model: Arc::new(model),
            device_index: config.audio_device,
            timeout: Duration::from_secs(config.capture_timeout_secs),
        })
    }
}

impl SpeechCapture for MicCapture {
    fn start(&self, lang: &str, attempt: AttemptId, events: CaptureSender) -> CoachResult<()> {
        debug!("Mic capture {} started ({}; language comes from the model)", attempt, lang);
        let model = Arc::clone(&self.model);
        let device_index = self.device_index;
        let timeout = self.timeout;

        thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || {
                let event = match listen(&model, device_index, timeout) {
                    Ok(Some(text)) => CaptureEvent::transcript(attempt, text),
                    Ok(None) => CaptureEvent::ended(attempt),
                    Err(e) => CaptureEvent::error(attempt, format!("{:#}", e)),
                };
                if events.send(event).is_err() {
                    warn!("Capture receiver dropped before attempt {} finished", attempt);
                }
            })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "mic"
    }
}

/// Record until the recognizer finalizes an utterance or time runs out
fn listen(model: &Model, device_index: Option<usize>, timeout: Duration) -> Result<Option<String>> {
    let mut recognizer = Recognizer::new(model, SAMPLE_RATE as f32)
        .context("Failed to create Vosk recognizer")?;

    let (tx, rx): (Sender<Vec<i16>>, Receiver<Vec<i16>>) = mpsc::channel();
    let stream = open_input_stream(device_index, tx)?;
    stream.play()?;

    let deadline = Instant::now() + timeout;
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        let samples = match rx.recv_timeout(remaining) {
            Ok(samples) => samples,
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(anyhow::anyhow!("audio stream closed"));
            }
        };

        match recognizer.accept_waveform(&samples) {
            DecodingState::Finalized => {
                let result = recognizer.final_result();
                if let Some(text) = result.single().and_then(|single| extract_text(single.text)) {
                    return Ok(Some(text));
                }
            }
            DecodingState::Running => {
                debug!("Partial: {}", recognizer.partial_result().partial);
            }
            DecodingState::Failed => {
                debug!("Decoding failed for this chunk");
            }
        }
    }

    drop(stream);
    let result = recognizer.final_result();
    Ok(result.single().and_then(|single| extract_text(single.text)))
}

fn open_input_stream(device_index: Option<usize>, tx: Sender<Vec<i16>>) -> Result<cpal::Stream> {
    let host = cpal::default_host();

    let device = if let Some(idx) = device_index {
        host.input_devices()?
            .nth(idx)
            .context("Device index out of range")?
    } else {
        host.default_input_device()
            .context("No default input device")?
    };

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    debug!("Using audio device: {}", device_name);

    let config = cpal::StreamConfig {
        channels: 1,
        sample_rate: cpal::SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Fixed(CHUNK_SIZE as u32),
    };

    let stream = device.build_input_stream(
        &config,
        move |data: &[i16], _: &cpal::InputCallbackInfo| {
            // Receiver is gone once the attempt is over
            let _ = tx.send(data.to_vec());
        },
        |err| {
            warn!("Audio stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}

/// Extract text from a Vosk result, filtering empty results
fn extract_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
