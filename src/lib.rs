//! SpeechRecorder - audio recording facade and CLI
//!
//! This crate wraps a platform audio-recording engine behind a small
//! recorder object: pick a codec, quality level, volume and output path,
//! then start, pause, resume and stop while state, duration and errors are
//! relayed back as events.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Codec and quality tables, recorder state, volume policy, config
//! - **Application**: The `Recorder` facade and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal engine, XDG config store)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
