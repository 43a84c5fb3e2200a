//! CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::codec::AudioCodec;
use crate::domain::recording::Duration;
use crate::domain::volume::VolumePolicy;

/// SpeechRecorder - record audio from the default input device
#[derive(Parser, Debug)]
#[command(name = "speech-recorder")]
#[command(version)]
#[command(about = "Record audio to WAV or FLAC with selectable quality")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record until the duration elapses or Ctrl+C
    Record(RecordArgs),
    /// List the codecs the recording engine supports
    Codecs,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for the record subcommand
#[derive(Args, Debug, Default)]
pub struct RecordArgs {
    /// Output path without extension (the codec's extension is appended)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<String>,

    /// Codec to record with
    #[arg(short = 'c', long, value_name = "CODEC")]
    pub codec: Option<CodecArg>,

    /// Quality level: 0 (very low) to 4 (very high)
    #[arg(short = 'q', long, value_name = "LEVEL")]
    pub quality: Option<i32>,

    /// Input volume
    #[arg(short = 'v', long, value_name = "VOLUME", allow_negative_numbers = true)]
    pub volume: Option<f64>,

    /// Recording duration (e.g., 10s, 1m, 2m30s); records until Ctrl+C if omitted
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Codec argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CodecArg {
    Pcm,
    Flac,
    Vorbis,
    Amr,
    Mpeg,
}

impl From<CodecArg> for AudioCodec {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::Pcm => AudioCodec::Pcm,
            CodecArg::Flac => AudioCodec::Flac,
            CodecArg::Vorbis => AudioCodec::Vorbis,
            CodecArg::Amr => AudioCodec::Amr,
            CodecArg::Mpeg => AudioCodec::Mpeg,
        }
    }
}

/// Resolved options for a recording run
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub output: String,
    pub codec: String,
    pub quality: i32,
    pub volume: f64,
    pub duration: Option<Duration>,
    pub volume_policy: VolumePolicy,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "output",
    "codec",
    "quality",
    "volume",
    "duration",
    "volume_policy.scale",
    "volume_policy.validate",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
