//! Typed capture backend
//!
//! Stands in for a recognizer on machines without a microphone: the learner
//! types what they said and the line is used as the transcript.
//!
//! [`TypedCapture`] reads the line itself. [`TypedRelay`] is for callers
//! that already own stdin: they pass the typed line in with
//! [`TypedRelay::deliver`].

use super::{CaptureSender, SpeechCapture};
use crate::core::{AttemptId, CaptureEvent};
use crate::error::CoachResult;
use std::io::{BufRead, BufReader};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use tracing::{debug, warn};

type SharedReader = Arc<Mutex<Box<dyn BufRead + Send>>>;

/// Reads one line per attempt from stdin (or any reader)
pub struct TypedCapture {
    reader: SharedReader,
}

impl Default for TypedCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedCapture {
    pub fn new() -> Self {
        Self::with_reader(BufReader::new(std::io::stdin()))
    }

    pub fn with_reader(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            reader: Arc::new(Mutex::new(Box::new(reader))),
        }
    }
}

/// Read one line and turn it into the capture outcome
fn read_attempt(reader: &SharedReader, attempt: AttemptId) -> CaptureEvent {
    let mut guard = match reader.lock() {
        Ok(guard) => guard,
        Err(e) => return CaptureEvent::error(attempt, format!("reader poisoned: {}", e)),
    };

    let mut line = String::new();
    match guard.read_line(&mut line) {
        Ok(0) => CaptureEvent::ended(attempt),
        Ok(_) => CaptureEvent::transcript(attempt, line.trim_end_matches(['\r', '\n'])),
        Err(e) => CaptureEvent::error(attempt, e.to_string()),
    }
}

impl SpeechCapture for TypedCapture {
    fn start(&self, lang: &str, attempt: AttemptId, events: CaptureSender) -> CoachResult<()> {
        debug!("Typed capture {} started ({})", attempt, lang);
        let reader = Arc::clone(&self.reader);

        thread::Builder::new()
            .name("typed-capture".to_string())
            .spawn(move || {
                send(&events, read_attempt(&reader, attempt));
            })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "typed"
    }
}

/// Typed capture fed by the caller
#[derive(Default)]
pub struct TypedRelay {
    pending: Mutex<Option<(AttemptId, CaptureSender)>>,
}

impl TypedRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt waiting for a typed answer
    pub fn pending(&self) -> Option<AttemptId> {
        self.lock().as_ref().map(|(attempt, _)| *attempt)
    }

    /// Answer the pending attempt with `text`
    ///
    /// Returns `false` when nothing is waiting.
    pub fn deliver(&self, text: &str) -> bool {
        let Some((attempt, events)) = self.lock().take() else {
            return false;
        };
        debug!("Typed answer for attempt {}", attempt);
        send(&events, CaptureEvent::transcript(attempt, text))
    }

    /// End the pending attempt without an answer (input closed)
    pub fn close(&self) -> bool {
        let Some((attempt, events)) = self.lock().take() else {
            return false;
        };
        send(&events, CaptureEvent::ended(attempt))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(AttemptId, CaptureSender)>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn send(events: &CaptureSender, event: CaptureEvent) -> bool {
    let attempt = event.attempt;
    if events.send(event).is_err() {
        warn!("Capture receiver dropped before attempt {} finished", attempt);
        return false;
    }
    true
}

impl SpeechCapture for TypedRelay {
    fn start(&self, lang: &str, attempt: AttemptId, events: CaptureSender) -> CoachResult<()> {
        debug!("Typed relay {} waiting for an answer ({})", attempt, lang);
        let previous = self.lock().replace((attempt, events));

        // The superseded attempt still gets its end-of-capture event
        if let Some((old, old_events)) = previous {
            debug!("Attempt {} superseded before an answer was typed", old);
            send(&old_events, CaptureEvent::ended(old));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "typed"
    }
}
