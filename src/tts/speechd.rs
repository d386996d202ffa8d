//! speechd-ng backend over the session D-Bus
//!
//! The service speaks with its own default voice unless one is named, and
//! has no rate control or stop call.

use super::SpeechOutput;
use crate::error::CoachError;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};
use zbus::{proxy, Connection};

#[proxy(
    interface = "org.speech.Service",
    default_service = "org.speech.Service",
    default_path = "/org/speech/Service"
)]
trait SpeechService {
    fn speak(&self, text: &str) -> zbus::Result<()>;
    fn speak_voice(&self, text: &str, voice: &str) -> zbus::Result<()>;
    fn ping(&self) -> zbus::Result<String>;
    fn get_version(&self) -> zbus::Result<String>;
}

/// Speech output through a running speechd-ng daemon
pub struct SpeechdEngine {
    proxy: SpeechServiceProxy<'static>,
    version: String,
}

impl std::fmt::Debug for SpeechdEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechdEngine")
            .field("version", &self.version)
            .finish()
    }
}

impl SpeechdEngine {
    /// Connect to the daemon, failing if it does not answer a ping
    pub async fn connect() -> Result<Self> {
        let connection = Connection::session().await?;
        let proxy = SpeechServiceProxy::new(&connection).await?;

        if let Err(e) = proxy.ping().await {
            warn!("⚠️ speechd-ng not responding: {}", e);
            return Err(CoachError::Tts(format!("speechd-ng not responding: {}", e)).into());
        }

        let version = proxy
            .get_version()
            .await
            .unwrap_or_else(|_| "unknown".to_string());
        info!("🔊 Connected to speechd-ng {}", version);

        Ok(Self { proxy, version })
    }
}

/// Voice name worth passing to the daemon
fn requested_voice(voice: Option<&str>) -> Option<&str> {
    voice.map(str::trim).filter(|name| !name.is_empty())
}

#[async_trait]
impl SpeechOutput for SpeechdEngine {
    async fn speak(&self, text: &str, voice: Option<&str>, rate: f32) -> Result<()> {
        if (rate - 1.0).abs() > f32::EPSILON {
            debug!("speechd-ng has no rate control, ignoring rate {}", rate);
        }
        match requested_voice(voice) {
            Some(name) => self.proxy.speak_voice(text, name).await?,
            None => self.proxy.speak(text).await?,
        }
        Ok(())
    }

    async fn cancel(&self) -> Result<()> {
        Err(CoachError::Tts("speechd-ng cannot interrupt speech in progress".to_string()).into())
    }

    fn name(&self) -> &str {
        "speechd_ng"
    }
}
