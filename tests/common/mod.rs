//! Fake recording engine shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use speech_recorder::application::ports::{
    engine_channel, EngineEvent, EngineEventSender, EngineEvents, RecordingEngine,
};
use speech_recorder::application::{Recorder, RecorderEvent, RecorderOptions};
use speech_recorder::domain::settings::EncoderSettings;
use speech_recorder::domain::state::{RecorderErrorKind, RecorderState};

/// Command the fake engine received
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    EncoderSettings(EncoderSettings),
    ContainerFormat(String),
    Volume(f64),
    OutputLocation(PathBuf),
    Record,
    Stop,
    Pause,
}

#[derive(Default)]
struct FakeState {
    state: RecorderState,
    error: Option<(RecorderErrorKind, String)>,
    duration_ms: u64,
    sender: Option<EngineEventSender>,
    reject_record: Option<(RecorderErrorKind, String)>,
}

/// Engine that switches state synchronously on each command and reports
/// the change on its channel
pub struct FakeEngine {
    commands: Arc<Mutex<Vec<EngineCommand>>>,
    inner: Arc<Mutex<FakeState>>,
    codecs: Vec<String>,
}

/// Test-side handle onto a [`FakeEngine`] owned by a recorder
#[derive(Clone)]
pub struct FakeHandle {
    commands: Arc<Mutex<Vec<EngineCommand>>>,
    inner: Arc<Mutex<FakeState>>,
}

impl FakeEngine {
    pub fn new() -> (Self, FakeHandle) {
        Self::with_codecs(&["audio/PCM", "audio/FLAC"])
    }

    pub fn with_codecs(codecs: &[&str]) -> (Self, FakeHandle) {
        let commands = Arc::new(Mutex::new(Vec::new()));
        let inner = Arc::new(Mutex::new(FakeState::default()));
        let handle = FakeHandle {
            commands: Arc::clone(&commands),
            inner: Arc::clone(&inner),
        };
        let engine = Self {
            commands,
            inner,
            codecs: codecs.iter().map(|c| c.to_string()).collect(),
        };
        (engine, handle)
    }

    fn log(&self, command: EngineCommand) {
        self.commands.lock().unwrap().push(command);
    }

    fn transition(&self, to: RecorderState) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state == to {
            return;
        }
        inner.state = to;
        if let Some(tx) = &inner.sender {
            let _ = tx.send(EngineEvent::StateChanged(to));
        }
    }
}

impl FakeHandle {
    /// Commands received so far
    pub fn commands(&self) -> Vec<EngineCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn clear_commands(&self) {
        self.commands.lock().unwrap().clear();
    }

    /// Make the next `record` from Stopped fail without changing state
    pub fn reject_record(&self, kind: RecorderErrorKind, message: &str) {
        self.inner.lock().unwrap().reject_record = Some((kind, message.to_string()));
    }

    /// Push an event as if the engine produced it
    pub fn send(&self, event: EngineEvent) {
        let mut inner = self.inner.lock().unwrap();
        match &event {
            EngineEvent::DurationChanged(ms) => inner.duration_ms = *ms,
            EngineEvent::StateChanged(state) => inner.state = *state,
            EngineEvent::Error(kind, message) => inner.error = Some((*kind, message.clone())),
        }
        if let Some(tx) = &inner.sender {
            let _ = tx.send(event);
        }
    }
}

impl RecordingEngine for FakeEngine {
    fn subscribe(&mut self) -> EngineEvents {
        let (tx, rx) = engine_channel();
        self.inner.lock().unwrap().sender = Some(tx);
        rx
    }

    fn set_encoder_settings(&mut self, settings: &EncoderSettings) {
        self.log(EngineCommand::EncoderSettings(settings.clone()));
    }

    fn set_container_format(&mut self, container: &str) {
        self.log(EngineCommand::ContainerFormat(container.to_string()));
    }

    fn set_volume(&mut self, gain: f64) {
        self.log(EngineCommand::Volume(gain));
    }

    fn set_output_location(&mut self, location: &Path) {
        self.log(EngineCommand::OutputLocation(location.to_path_buf()));
    }

    fn record(&mut self) {
        self.log(EngineCommand::Record);
        let rejected = {
            let mut inner = self.inner.lock().unwrap();
            match (inner.state, inner.reject_record.take()) {
                (RecorderState::Stopped, Some((kind, message))) => {
                    inner.error = Some((kind, message.clone()));
                    if let Some(tx) = &inner.sender {
                        let _ = tx.send(EngineEvent::Error(kind, message));
                    }
                    true
                }
                _ => false,
            }
        };
        if !rejected {
            self.transition(RecorderState::Recording);
        }
    }

    fn stop(&mut self) {
        self.log(EngineCommand::Stop);
        self.transition(RecorderState::Stopped);
    }

    fn pause(&mut self) {
        self.log(EngineCommand::Pause);
        self.transition(RecorderState::Paused);
    }

    fn supported_codecs(&self) -> Vec<String> {
        self.codecs.clone()
    }

    fn duration_ms(&self) -> u64 {
        self.inner.lock().unwrap().duration_ms
    }

    fn state(&self) -> RecorderState {
        self.inner.lock().unwrap().state
    }

    fn error(&self) -> RecorderErrorKind {
        self.inner
            .lock()
            .unwrap()
            .error
            .as_ref()
            .map_or(RecorderErrorKind::None, |(kind, _)| *kind)
    }

    fn error_string(&self) -> String {
        self.inner
            .lock()
            .unwrap()
            .error
            .as_ref()
            .map(|(_, message)| message.clone())
            .unwrap_or_default()
    }
}

/// Shared record of delivered recorder events
pub type EventLog = Arc<Mutex<Vec<RecorderEvent>>>;

/// Recorder over a fake engine with a listener capturing every event
pub fn recorder_with_options(
    options: RecorderOptions,
) -> (Recorder<FakeEngine>, FakeHandle, EventLog) {
    let (engine, handle) = FakeEngine::new();
    let mut recorder = Recorder::with_options(engine, options);
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    recorder.subscribe(Arc::new(move |event: &RecorderEvent| {
        sink.lock().unwrap().push(event.clone())
    }));
    (recorder, handle, events)
}

pub fn recorder() -> (Recorder<FakeEngine>, FakeHandle, EventLog) {
    recorder_with_options(RecorderOptions::default())
}

/// Take and clear the captured events
pub fn drain(events: &EventLog) -> Vec<RecorderEvent> {
    std::mem::take(&mut *events.lock().unwrap())
}
