//! App runners for the record and codecs subcommands

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::ports::{ConfigStore, RecordingEngine};
use crate::application::{Recorder, RecorderEvent, RecorderOptions};
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::domain::state::RecorderState;
use crate::infrastructure::{create_engine, XdgConfigStore};

use super::args::RecordOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the output base path
pub const OUTPUT_ENV: &str = "SPEECH_RECORDER_OUTPUT";

/// How often the record loop drains engine events
const TICK: std::time::Duration = std::time::Duration::from_millis(100);

/// Record one take with the default engine
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let recorder_options = RecorderOptions {
        volume_policy: options.volume_policy,
        ..Default::default()
    };
    let mut recorder = Recorder::with_options(create_engine(), recorder_options);

    recorder.set_output_path(options.output.clone());
    recorder.set_codec(options.codec.clone());
    recorder.set_quality(options.quality);
    if let Err(e) = recorder.set_volume(options.volume) {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    match record_session(&mut recorder, options.duration, &shutdown, &mut presenter).await {
        Ok(path) => {
            presenter.success(&format!("Saved {}", path.display()));
            presenter.output(&path.to_string_lossy());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Drive a configured recorder from start until the engine reports Stopped.
///
/// Stops the recording when `duration` elapses or `shutdown` is raised.
/// Returns the written file on success.
pub async fn record_session<E: RecordingEngine>(
    recorder: &mut Recorder<E>,
    duration: Option<Duration>,
    shutdown: &ShutdownSignal,
    presenter: &mut Presenter,
) -> Result<PathBuf, String> {
    let finished = Arc::new(AtomicBool::new(false));
    // Errors reported during this session only; the recorder keeps older ones
    let failure: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

    let flag = Arc::clone(&finished);
    let sink = Arc::clone(&failure);
    let subscription = recorder.subscribe(Arc::new(move |event: &RecorderEvent| match event {
        RecorderEvent::RecordingStarted => log::debug!("recording started"),
        RecorderEvent::Stopped => flag.store(true, Ordering::SeqCst),
        RecorderEvent::ErrorChanged { error, message } if error.is_error() => {
            *lock(&sink) = Some(format!("{}: {}", error, message));
        }
        _ => {}
    }));

    if !recorder.start() {
        recorder.unsubscribe(subscription);
        return Err(format!("Recorder is busy ({})", recorder.engine().state()));
    }
    presenter.show_recording_progress("Recording...");

    let mut ticker = tokio::time::interval(TICK);
    let mut stop_requested = false;

    loop {
        ticker.tick().await;
        recorder.process_pending();

        if finished.load(Ordering::SeqCst) {
            break;
        }
        // Rejected before capture began: no Stopped transition will follow
        if lock(&failure).is_some() && recorder.engine().state() == RecorderState::Stopped {
            break;
        }
        if stop_requested {
            continue;
        }

        let elapsed = recorder.duration_ms();
        match duration {
            Some(total) => presenter.update_recording_progress(elapsed, total.as_millis()),
            None => presenter.update_spinner(&format!(
                "Recording... {}s (Ctrl+C to stop)",
                elapsed / 1000
            )),
        }

        let elapsed_out = duration.is_some_and(|d| d.has_elapsed(elapsed));
        if shutdown.is_shutdown() || elapsed_out {
            recorder.stop();
            stop_requested = true;
            presenter.update_spinner("Finishing...");
        }
    }

    recorder.unsubscribe(subscription);

    if let Some(message) = lock(&failure).take() {
        presenter.spinner_fail("Recording failed");
        return Err(message);
    }

    presenter.spinner_success(&format!(
        "Recording complete ({:.1}s)",
        recorder.duration_ms() as f64 / 1000.0
    ));
    recorder
        .file_path()
        .map(PathBuf::from)
        .ok_or_else(|| "Recorder has no output file".to_string())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Print the codecs the default engine can record
pub fn run_codecs() -> ExitCode {
    let presenter = Presenter::new();
    let recorder = Recorder::new(create_engine());

    let codecs = recorder.supported_codecs();
    if codecs.is_empty() {
        presenter.info("The recording engine supports no known codecs");
    }
    for codec in codecs {
        presenter.output(&codec);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config file: {}", e);
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        output: env::var(OUTPUT_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
