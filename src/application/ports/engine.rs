//! Recording engine port interface

use std::path::Path;

use tokio::sync::mpsc;

use crate::domain::settings::EncoderSettings;
use crate::domain::state::{RecorderErrorKind, RecorderState};

/// Notifications pushed by an engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Recorded length so far, in milliseconds
    DurationChanged(u64),
    /// Engine entered a new state
    StateChanged(RecorderState),
    /// Engine hit an error
    Error(RecorderErrorKind, String),
}

/// Receiving side of an engine's notification channel
pub type EngineEvents = mpsc::UnboundedReceiver<EngineEvent>;

/// Sending side of an engine's notification channel
pub type EngineEventSender = mpsc::UnboundedSender<EngineEvent>;

/// Create a notification channel for an engine
pub fn engine_channel() -> (EngineEventSender, EngineEvents) {
    mpsc::unbounded_channel()
}

/// Port for a platform audio-recording engine.
///
/// Commands return immediately. Their outcome (state changes, errors,
/// duration updates) arrives later on the channel returned by
/// [`RecordingEngine::subscribe`]. Engines never block the caller waiting
/// for capture to begin or end.
pub trait RecordingEngine: Send {
    /// Register for notifications.
    ///
    /// Replaces any previous subscription; only the latest receiver gets
    /// events.
    fn subscribe(&mut self) -> EngineEvents;

    /// Encoder configuration for the next recording
    fn set_encoder_settings(&mut self, settings: &EncoderSettings);

    /// Container format for the next recording (empty for engine default)
    fn set_container_format(&mut self, container: &str);

    /// Input gain, 1.0 being unity
    fn set_volume(&mut self, gain: f64);

    /// File the next recording is written to
    fn set_output_location(&mut self, location: &Path);

    /// Begin recording, or resume a paused recording
    fn record(&mut self);

    fn stop(&mut self);

    fn pause(&mut self);

    /// All codec names this engine can encode
    fn supported_codecs(&self) -> Vec<String>;

    fn duration_ms(&self) -> u64;

    fn state(&self) -> RecorderState;

    fn error(&self) -> RecorderErrorKind;

    fn error_string(&self) -> String;
}

/// Boxed engines forward to the inner engine
impl RecordingEngine for Box<dyn RecordingEngine> {
    fn subscribe(&mut self) -> EngineEvents {
        self.as_mut().subscribe()
    }

    fn set_encoder_settings(&mut self, settings: &EncoderSettings) {
        self.as_mut().set_encoder_settings(settings)
    }

    fn set_container_format(&mut self, container: &str) {
        self.as_mut().set_container_format(container)
    }

    fn set_volume(&mut self, gain: f64) {
        self.as_mut().set_volume(gain)
    }

    fn set_output_location(&mut self, location: &Path) {
        self.as_mut().set_output_location(location)
    }

    fn record(&mut self) {
        self.as_mut().record()
    }

    fn stop(&mut self) {
        self.as_mut().stop()
    }

    fn pause(&mut self) {
        self.as_mut().pause()
    }

    fn supported_codecs(&self) -> Vec<String> {
        self.as_ref().supported_codecs()
    }

    fn duration_ms(&self) -> u64 {
        self.as_ref().duration_ms()
    }

    fn state(&self) -> RecorderState {
        self.as_ref().state()
    }

    fn error(&self) -> RecorderErrorKind {
        self.as_ref().error()
    }

    fn error_string(&self) -> String {
        self.as_ref().error_string()
    }
}
