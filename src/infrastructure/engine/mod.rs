//! Recording engine adapters
//!
//! Provides a cross-platform engine on the default input device using cpal.
//! PCM recordings are written as WAV, FLAC recordings via flacenc.

mod cpal_engine;
mod encoder;

pub use cpal_engine::{CpalEngine, EngineError, SUPPORTED_CODECS};
pub use encoder::{encode_to_flac, write_recording, write_wav, EncodingError};

/// Create the default engine for the current platform
pub fn create_engine() -> CpalEngine {
    CpalEngine::new()
}
