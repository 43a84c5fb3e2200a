//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected <number> followed by h, m or s (e.g., 30s, 1m, 2m30s, 1h)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown codec name is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid codec: \"{input}\". Valid codecs are: audio/PCM, audio/FLAC, audio/vorbis, audio/AMR, audio/mpeg")]
pub struct InvalidCodecError {
    pub input: String,
}

/// Error when an unknown volume scale is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid volume scale: \"{input}\". Valid scales are: percent, unit")]
pub struct InvalidVolumeScaleError {
    pub input: String,
}

/// Error when a recorder property is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Volume {value} is out of range ({min}..={max})")]
    VolumeOutOfRange { value: f64, min: f64, max: f64 },
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
