//! Recorder facade
//!
//! Owns one recording engine, holds the caller's configuration, forwards
//! lifecycle commands and relays engine notifications to subscribed
//! listeners as [`RecorderEvent`]s.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{EngineEvent, EngineEvents, RecordingEngine};
use crate::domain::codec::{container_for_codec, filter_supported_codecs, DEFAULT_CODEC};
use crate::domain::error::SettingsError;
use crate::domain::output::{default_output_base, resolve_output_path};
use crate::domain::quality::DEFAULT_QUALITY;
use crate::domain::settings::EncoderSettings;
use crate::domain::state::{LifecycleEvent, RecorderErrorKind, RecorderState, RecorderStatus};
use crate::domain::volume::{VolumePolicy, DEFAULT_VOLUME};

/// Change notifications emitted by the recorder.
///
/// Each event carries the new value, so listeners never need to read the
/// recorder back while it is dispatching.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    OutputPathChanged(String),
    CodecChanged(String),
    QualityChanged(i32),
    VolumeChanged(f64),
    DurationChanged(u64),
    StateChanged(RecorderState),
    ErrorChanged {
        error: RecorderErrorKind,
        message: String,
    },
    RecordingStarted,
    Stopped,
    Paused,
    Resumed,
}

impl From<LifecycleEvent> for RecorderEvent {
    fn from(event: LifecycleEvent) -> Self {
        match event {
            LifecycleEvent::RecordingStarted => Self::RecordingStarted,
            LifecycleEvent::Stopped => Self::Stopped,
            LifecycleEvent::Paused => Self::Paused,
            LifecycleEvent::Resumed => Self::Resumed,
        }
    }
}

/// Listener callback for recorder events
pub type EventListener = Arc<dyn Fn(&RecorderEvent) + Send + Sync>;

/// Handle returned by [`Recorder::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Recorder construction options
#[derive(Debug, Clone)]
pub struct RecorderOptions {
    pub volume_policy: VolumePolicy,
    /// Used when the output path is left empty
    pub default_output_base: PathBuf,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            volume_policy: VolumePolicy::default(),
            default_output_base: default_output_base(),
        }
    }
}

/// Audio recorder facade over a [`RecordingEngine`].
///
/// Configuration setters fire one change event when the value actually
/// changes. Status (state, duration, error) is only ever updated from
/// engine notifications, applied through [`Recorder::dispatch`],
/// [`Recorder::process_pending`] or [`Recorder::next_event`].
pub struct Recorder<E: RecordingEngine> {
    engine: E,
    events: EngineEvents,
    listeners: Vec<(SubscriptionId, EventListener)>,
    next_subscription: u64,
    options: RecorderOptions,

    output_path: String,
    codec: String,
    quality: i32,
    volume: f64,

    status: RecorderStatus,
    file_path: Option<PathBuf>,
}

impl<E: RecordingEngine> Recorder<E> {
    /// Create a recorder with default options
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, RecorderOptions::default())
    }

    /// Create a recorder, taking ownership of the engine and subscribing to it
    pub fn with_options(mut engine: E, options: RecorderOptions) -> Self {
        let events = engine.subscribe();

        Self {
            engine,
            events,
            listeners: Vec::new(),
            next_subscription: 0,
            options,
            output_path: String::new(),
            codec: DEFAULT_CODEC.to_string(),
            quality: DEFAULT_QUALITY,
            volume: DEFAULT_VOLUME,
            status: RecorderStatus::default(),
            file_path: None,
        }
    }

    /// Borrow the owned engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    pub fn set_output_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        if self.output_path == path {
            return;
        }
        self.output_path = path;
        self.emit(RecorderEvent::OutputPathChanged(self.output_path.clone()));
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    /// Set the codec by name. Unknown names are accepted as-is.
    pub fn set_codec(&mut self, codec: impl Into<String>) {
        let codec = codec.into();
        if self.codec == codec {
            return;
        }
        self.codec = codec;
        self.emit(RecorderEvent::CodecChanged(self.codec.clone()));
    }

    pub fn quality(&self) -> i32 {
        self.quality
    }

    /// Set the quality level. Not range-checked.
    pub fn set_quality(&mut self, quality: i32) {
        if self.quality == quality {
            return;
        }
        self.quality = quality;
        self.emit(RecorderEvent::QualityChanged(quality));
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Set the volume.
    ///
    /// Only rejected when the volume policy validates; the default policy
    /// passes every value through.
    pub fn set_volume(&mut self, volume: f64) -> Result<(), SettingsError> {
        self.options.volume_policy.check(volume)?;
        if self.volume == volume {
            return Ok(());
        }
        self.volume = volume;
        self.emit(RecorderEvent::VolumeChanged(volume));
        Ok(())
    }

    pub fn volume_policy(&self) -> VolumePolicy {
        self.options.volume_policy
    }

    pub fn duration_ms(&self) -> u64 {
        self.status.duration_ms
    }

    pub fn state(&self) -> RecorderState {
        self.status.state
    }

    pub fn error(&self) -> RecorderErrorKind {
        self.status.error
    }

    pub fn error_string(&self) -> &str {
        &self.status.error_string
    }

    /// Snapshot of the last engine-reported status
    pub fn status(&self) -> &RecorderStatus {
        &self.status
    }

    /// Last resolved output location, `None` before the first start
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Codecs the engine supports that this recorder knows how to map
    pub fn supported_codecs(&self) -> Vec<String> {
        filter_supported_codecs(self.engine.supported_codecs())
    }

    /// Start a new recording.
    ///
    /// Does nothing unless the engine is stopped. Returns whether the
    /// engine was told to record.
    pub fn start(&mut self) -> bool {
        if self.engine.state() != RecorderState::Stopped {
            log::debug!("start ignored, engine is {}", self.engine.state());
            return false;
        }

        let settings = EncoderSettings::for_recording(&self.codec, self.quality);
        self.engine.set_encoder_settings(&settings);
        self.engine
            .set_container_format(container_for_codec(&self.codec));
        self.engine
            .set_volume(self.options.volume_policy.gain(self.volume));

        let location = resolve_output_path(
            &self.output_path,
            &self.codec,
            &self.options.default_output_base,
        );
        self.engine.set_output_location(&location);

        log::info!(
            "Starting recording: codec={} quality={} sample_rate={:?} -> {}",
            settings.codec,
            self.quality,
            settings.sample_rate,
            location.display()
        );
        self.file_path = Some(location);

        self.engine.record();
        true
    }

    /// Stop a recording or paused recording
    pub fn stop(&mut self) -> bool {
        match self.engine.state() {
            RecorderState::Recording | RecorderState::Paused => {
                log::debug!("stopping recording");
                self.engine.stop();
                true
            }
            RecorderState::Stopped => false,
        }
    }

    /// Pause an active recording
    pub fn pause(&mut self) -> bool {
        if self.engine.state() != RecorderState::Recording {
            return false;
        }
        log::debug!("pausing recording");
        self.engine.pause();
        true
    }

    /// Resume a paused recording
    pub fn resume(&mut self) -> bool {
        if self.engine.state() != RecorderState::Paused {
            return false;
        }
        log::debug!("resuming recording");
        self.engine.record();
        true
    }

    /// Register a listener for every subsequent event
    pub fn subscribe(&mut self, listener: EventListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Apply one engine notification.
    ///
    /// Cached status is always updated before any listener runs.
    pub fn dispatch(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::DurationChanged(ms) => {
                self.status.duration_ms = ms;
                self.emit(RecorderEvent::DurationChanged(ms));
            }
            EngineEvent::StateChanged(state) => {
                let old = self.status.state;
                if old == state {
                    return;
                }
                self.status.state = state;
                log::info!("Recorder state: {} -> {}", old, state);

                if let Some(lifecycle) = LifecycleEvent::for_transition(old, state) {
                    self.emit(lifecycle.into());
                }
                self.emit(RecorderEvent::StateChanged(state));
            }
            EngineEvent::Error(error, message) => {
                log::warn!("Recorder error ({}): {}", error, message);
                self.status.error = error;
                self.status.error_string = message;
                self.emit(RecorderEvent::ErrorChanged {
                    error,
                    message: self.status.error_string.clone(),
                });
            }
        }
    }

    /// Apply every queued engine notification without waiting.
    /// Returns the number applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.dispatch(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next engine notification and apply it.
    /// Returns false once the engine has dropped its sender.
    pub async fn next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    fn emit(&self, event: RecorderEvent) {
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }
}

impl<E: RecordingEngine> fmt::Debug for Recorder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("output_path", &self.output_path)
            .field("codec", &self.codec)
            .field("quality", &self.quality)
            .field("volume", &self.volume)
            .field("status", &self.status)
            .field("file_path", &self.file_path)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
