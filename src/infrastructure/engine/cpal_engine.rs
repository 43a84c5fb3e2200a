//! Recording engine on the default input device, using cpal
//!
//! Capture runs on a dedicated thread that owns the `cpal::Stream`
//! (streams are not `Send`). Samples are mixed down to mono i16 and scaled
//! by the input gain. When the recording stops the same thread resamples to
//! the requested rate, encodes, writes the file and only then reports
//! `Stopped`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration as StdDuration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use thiserror::Error;

use super::encoder::{write_recording, EncodingError};
use crate::application::ports::{
    engine_channel, EngineEvent, EngineEventSender, EngineEvents, RecordingEngine,
};
use crate::domain::codec::AudioCodec;
use crate::domain::settings::EncoderSettings;
use crate::domain::state::{RecorderErrorKind, RecorderState};

/// Codecs this engine can write
pub const SUPPORTED_CODECS: [AudioCodec; 2] = [AudioCodec::Pcm, AudioCodec::Flac];

/// Interval between duration updates
const TICK: StdDuration = StdDuration::from_millis(100);

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No audio input device available")]
    NoInputDevice,

    #[error("No suitable input configuration: {0}")]
    NoSuitableConfig(String),

    #[error("Audio stream failed: {0}")]
    Stream(String),

    #[error("Unsupported codec: \"{0}\"")]
    UnsupportedCodec(String),

    #[error("Container \"{container}\" cannot hold {codec}")]
    ContainerMismatch { codec: String, container: String },

    #[error("No output location set")]
    NoOutputLocation,

    #[error("No audio data captured")]
    NoAudioCaptured,

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl EngineError {
    /// Error kind reported to subscribers
    pub fn kind(&self) -> RecorderErrorKind {
        match self {
            Self::UnsupportedCodec(_) | Self::ContainerMismatch { .. } => {
                RecorderErrorKind::FormatError
            }
            Self::Encoding(e) => e.kind(),
            _ => RecorderErrorKind::ResourceError,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the engine handle, the capture thread and the
/// stream callbacks
struct Shared {
    state: Mutex<RecorderState>,
    error: Mutex<(RecorderErrorKind, String)>,
    sender: Mutex<Option<EngineEventSender>>,
    /// Captured samples (mono, i16, at device sample rate)
    buffer: Mutex<Vec<i16>>,
    /// Capture thread keeps running while set
    capturing: AtomicBool,
    paused: AtomicBool,
    /// Input gain as f64 bits
    gain: AtomicU64,
    duration_ms: AtomicU64,
    device_sample_rate: AtomicU32,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: Mutex::new(RecorderState::Stopped),
            error: Mutex::new((RecorderErrorKind::None, String::new())),
            sender: Mutex::new(None),
            buffer: Mutex::new(Vec::new()),
            capturing: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            gain: AtomicU64::new(1.0f64.to_bits()),
            duration_ms: AtomicU64::new(0),
            device_sample_rate: AtomicU32::new(0),
        }
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(tx) = lock(&self.sender).as_ref() {
            // Receiver gone means nobody is listening; that is fine
            let _ = tx.send(event);
        }
    }

    fn state(&self) -> RecorderState {
        *lock(&self.state)
    }

    /// Stop requested, worker still finalizing the file
    fn stopping(&self) -> bool {
        self.state() != RecorderState::Stopped && !self.capturing.load(Ordering::SeqCst)
    }

    fn set_state(&self, new: RecorderState) {
        let mut state = lock(&self.state);
        if *state == new {
            return;
        }
        *state = new;
        // Emit under the lock so events leave in the order states change
        self.emit(EngineEvent::StateChanged(new));
    }

    fn fail(&self, err: &EngineError) {
        let kind = err.kind();
        let message = err.to_string();
        log::error!("Recording engine error ({}): {}", kind, message);
        *lock(&self.error) = (kind, message.clone());
        self.emit(EngineEvent::Error(kind, message));
    }

    fn gain(&self) -> f64 {
        f64::from_bits(self.gain.load(Ordering::SeqCst))
    }

    fn set_duration(&self, ms: u64) {
        self.duration_ms.store(ms, Ordering::SeqCst);
        self.emit(EngineEvent::DurationChanged(ms));
    }

    /// Append an interleaved block from the stream callback
    fn push_samples(&self, data: &[i16], channels: u16) {
        if !self.capturing.load(Ordering::SeqCst) || self.paused.load(Ordering::SeqCst) {
            return;
        }
        let gain = self.gain();
        let mono = stereo_to_mono(data, channels);
        let mut buffer = lock(&self.buffer);
        buffer.extend(mono.into_iter().map(|s| apply_gain(s, gain)));
    }
}

/// What a capture thread needs to finish a recording on its own
struct Session {
    codec: AudioCodec,
    sample_rate: Option<u32>,
    output: PathBuf,
}

/// Recording engine backed by the host's default input device.
pub struct CpalEngine {
    shared: Arc<Shared>,
    settings: EncoderSettings,
    container: String,
    output: Option<PathBuf>,
    worker: Option<JoinHandle<()>>,
}

impl CpalEngine {
    /// Create an idle engine. No device is opened until `record`.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            settings: EncoderSettings::default(),
            container: String::new(),
            output: None,
            worker: None,
        }
    }

    /// Device sample rate of the last recording (0 before the first)
    pub fn device_sample_rate(&self) -> u32 {
        self.shared.device_sample_rate.load(Ordering::SeqCst)
    }

    /// Validate the pending configuration and start a capture thread
    fn begin(&mut self) -> Result<(), EngineError> {
        let codec = AudioCodec::from_name(&self.settings.codec)
            .filter(|c| SUPPORTED_CODECS.contains(c))
            .ok_or_else(|| EngineError::UnsupportedCodec(self.settings.codec.clone()))?;

        if !self.container.is_empty() && self.container != codec.container() {
            return Err(EngineError::ContainerMismatch {
                codec: codec.name().to_string(),
                container: self.container.clone(),
            });
        }

        let output = self.output.clone().ok_or(EngineError::NoOutputLocation)?;

        // The previous session already reported Stopped, so this returns quickly
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        lock(&self.shared.buffer).clear();
        self.shared.paused.store(false, Ordering::SeqCst);
        self.shared.capturing.store(true, Ordering::SeqCst);
        self.shared.set_duration(0);
        self.shared.set_state(RecorderState::Recording);

        let session = Session {
            codec,
            sample_rate: self.settings.sample_rate,
            output,
        };
        let shared = Arc::clone(&self.shared);
        self.worker = Some(thread::spawn(move || run_session(shared, session)));

        Ok(())
    }
}

impl Default for CpalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CpalEngine {
    fn drop(&mut self) {
        self.shared.capturing.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl RecordingEngine for CpalEngine {
    fn subscribe(&mut self) -> EngineEvents {
        let (tx, rx) = engine_channel();
        *lock(&self.shared.sender) = Some(tx);
        rx
    }

    fn set_encoder_settings(&mut self, settings: &EncoderSettings) {
        self.settings = settings.clone();
    }

    fn set_container_format(&mut self, container: &str) {
        self.container = container.to_string();
    }

    fn set_volume(&mut self, gain: f64) {
        self.shared.gain.store(gain.to_bits(), Ordering::SeqCst);
    }

    fn set_output_location(&mut self, location: &Path) {
        self.output = Some(location.to_path_buf());
    }

    fn record(&mut self) {
        if self.shared.stopping() {
            log::debug!("Ignoring record while the take is being finalized");
            return;
        }
        match self.shared.state() {
            RecorderState::Recording => {}
            RecorderState::Paused => {
                self.shared.paused.store(false, Ordering::SeqCst);
                self.shared.set_state(RecorderState::Recording);
            }
            RecorderState::Stopped => {
                if let Err(e) = self.begin() {
                    self.shared.fail(&e);
                }
            }
        }
    }

    fn stop(&mut self) {
        if self.shared.state() != RecorderState::Stopped {
            // The capture thread finalizes the file and reports Stopped
            self.shared.capturing.store(false, Ordering::SeqCst);
        }
    }

    fn pause(&mut self) {
        if self.shared.state() == RecorderState::Recording && !self.shared.stopping() {
            self.shared.paused.store(true, Ordering::SeqCst);
            self.shared.set_state(RecorderState::Paused);
        }
    }

    fn supported_codecs(&self) -> Vec<String> {
        SUPPORTED_CODECS.iter().map(|c| c.name().to_string()).collect()
    }

    fn duration_ms(&self) -> u64 {
        self.shared.duration_ms.load(Ordering::SeqCst)
    }

    fn state(&self) -> RecorderState {
        self.shared.state()
    }

    fn error(&self) -> RecorderErrorKind {
        lock(&self.shared.error).0
    }

    fn error_string(&self) -> String {
        lock(&self.shared.error).1.clone()
    }
}

/// Capture thread body: record until stopped, then write the file
fn run_session(shared: Arc<Shared>, session: Session) {
    let result = capture(&shared, session.sample_rate)
        .and_then(|device_rate| finish(&shared, &session, device_rate));

    if let Err(e) = result {
        shared.fail(&e);
    }
    shared.capturing.store(false, Ordering::SeqCst);
    shared.set_state(RecorderState::Stopped);
}

/// Run the input stream until `capturing` clears. Returns the device rate.
fn capture(shared: &Arc<Shared>, preferred_rate: Option<u32>) -> Result<u32, EngineError> {
    let device = input_device()?;
    let (config, sample_format) = input_config(&device, preferred_rate)?;
    let sample_rate = config.sample_rate.0;
    shared.device_sample_rate.store(sample_rate, Ordering::SeqCst);

    let stream = build_stream(&device, &config, sample_format, Arc::clone(shared))?;
    stream
        .play()
        .map_err(|e| EngineError::Stream(e.to_string()))?;

    log::info!(
        "Capturing from {:?}: {} Hz, {} channel(s), {:?}",
        device.name().unwrap_or_default(),
        sample_rate,
        config.channels,
        sample_format
    );

    let mut elapsed_ms = 0u64;
    let mut last_tick = Instant::now();
    while shared.capturing.load(Ordering::SeqCst) {
        thread::sleep(TICK);
        let now = Instant::now();
        if !shared.paused.load(Ordering::SeqCst) {
            elapsed_ms += now.duration_since(last_tick).as_millis() as u64;
            shared.set_duration(elapsed_ms);
        }
        last_tick = now;
    }

    drop(stream);
    Ok(sample_rate)
}

/// Resample and write the captured audio
fn finish(shared: &Shared, session: &Session, device_rate: u32) -> Result<(), EngineError> {
    let samples = std::mem::take(&mut *lock(&shared.buffer));
    if samples.is_empty() {
        return Err(EngineError::NoAudioCaptured);
    }

    let target_rate = session.sample_rate.unwrap_or(device_rate);
    let samples = resample(&samples, device_rate, target_rate)?;

    write_recording(&session.output, session.codec, &samples, target_rate)?;

    log::info!(
        "Recording written to {} ({} samples at {} Hz)",
        session.output.display(),
        samples.len(),
        target_rate
    );
    Ok(())
}

fn input_device() -> Result<cpal::Device, EngineError> {
    let host = cpal::default_host();
    host.default_input_device()
        .ok_or(EngineError::NoInputDevice)
}

/// Pick an input configuration, preferring one that can run at `preferred_rate`
fn input_config(
    device: &cpal::Device,
    preferred_rate: Option<u32>,
) -> Result<(StreamConfig, SampleFormat), EngineError> {
    let Some(target) = preferred_rate else {
        let default = device
            .default_input_config()
            .map_err(|e| EngineError::NoSuitableConfig(e.to_string()))?;
        return Ok((default.config(), default.sample_format()));
    };

    let supported_configs = device
        .supported_input_configs()
        .map_err(|e| EngineError::NoSuitableConfig(e.to_string()))?;

    let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

    for config in supported_configs {
        if config.sample_format() != SampleFormat::I16
            && config.sample_format() != SampleFormat::F32
        {
            continue;
        }

        let includes_target =
            config.min_sample_rate().0 <= target && config.max_sample_rate().0 >= target;

        let is_better = match &best_config {
            None => true,
            Some(current) => {
                let current_includes = current.min_sample_rate().0 <= target
                    && current.max_sample_rate().0 >= target;
                (includes_target && !current_includes)
                    || (includes_target == current_includes
                        && config.channels() < current.channels())
            }
        };
        if is_better {
            best_config = Some(config);
        }
    }

    let config_range = best_config
        .ok_or_else(|| EngineError::NoSuitableConfig("no i16 or f32 input format".into()))?;

    let sample_rate = if config_range.min_sample_rate().0 <= target
        && config_range.max_sample_rate().0 >= target
    {
        SampleRate(target)
    } else {
        config_range.max_sample_rate()
    };

    let sample_format = config_range.sample_format();
    let config = StreamConfig {
        channels: config_range.channels(),
        sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };

    Ok((config, sample_format))
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    shared: Arc<Shared>,
) -> Result<cpal::Stream, EngineError> {
    let channels = config.channels;

    let on_error = {
        let shared = Arc::clone(&shared);
        move |err: cpal::StreamError| {
            shared.fail(&EngineError::Stream(err.to_string()));
            shared.capturing.store(false, Ordering::SeqCst);
        }
    };

    let stream = match sample_format {
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                shared.push_samples(data, channels);
            },
            on_error,
            None,
        ),
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let i16_data: Vec<i16> = data.iter().map(|&s| (s * 32767.0) as i16).collect();
                shared.push_samples(&i16_data, channels);
            },
            on_error,
            None,
        ),
        other => {
            return Err(EngineError::NoSuitableConfig(format!(
                "unsupported sample format {:?}",
                other
            )))
        }
    };

    stream.map_err(|e| EngineError::Stream(e.to_string()))
}

/// Mix interleaved frames down to mono
fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|chunk| {
            let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
            (sum / chunk.len() as i32) as i16
        })
        .collect()
}

/// Scale a sample by `gain`, saturating at the i16 range
fn apply_gain(sample: i16, gain: f64) -> i16 {
    (sample as f64 * gain).round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Resample mono audio from `source_rate` to `target_rate`
fn resample(samples: &[i16], source_rate: u32, target_rate: u32) -> Result<Vec<i16>, EngineError> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if source_rate == 0 || target_rate == 0 {
        return Err(EngineError::Resample(format!(
            "invalid rates {} -> {}",
            source_rate, target_rate
        )));
    }

    let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        1024, // Chunk size
        2,    // Sub-chunks
        1,    // Mono
    )
    .map_err(|e| EngineError::Resample(e.to_string()))?;

    let mut output = Vec::with_capacity(output_len);
    let mut input_pos = 0;

    while input_pos < samples_f32.len() {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(samples_f32.len());

        let mut chunk = samples_f32[input_pos..end_pos].to_vec();
        chunk.resize(frames_needed, 0.0);

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| EngineError::Resample(e.to_string()))?;

        output.extend(
            resampled[0]
                .iter()
                .map(|&s| (s * 32767.0).clamp(i16::MIN as f32, i16::MAX as f32) as i16),
        );
        input_pos = end_pos;
    }

    output.truncate(output_len);
    Ok(output)
}
