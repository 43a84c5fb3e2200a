//! Domain layer - Core recorder logic
//!
//! Contains the codec and quality tables, recorder state, volume policy
//! and output path rules. This layer has no dependencies on external systems.

pub mod codec;
pub mod config;
pub mod error;
pub mod output;
pub mod quality;
pub mod recording;
pub mod settings;
pub mod state;
pub mod volume;

// Re-export common types
pub use codec::{AudioCodec, DEFAULT_CODEC};
pub use config::AppConfig;
pub use error::*;
pub use quality::{EncodingMode, EncodingQuality};
pub use recording::Duration;
pub use settings::EncoderSettings;
pub use state::{LifecycleEvent, RecorderErrorKind, RecorderState, RecorderStatus};
pub use volume::{VolumePolicy, VolumeScale};
