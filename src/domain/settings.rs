//! Encoder settings handed to the recording engine

use crate::domain::codec::AudioCodec;
use crate::domain::quality::{EncodingMode, EncodingQuality};

/// Encoder configuration for one recording session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncoderSettings {
    /// Codec name as configured by the caller (may be unknown to us)
    pub codec: String,
    pub mode: EncodingMode,
    /// `None` when the configured level is outside 0..=4
    pub quality: Option<EncodingQuality>,
    /// `None` lets the engine pick its default rate
    pub sample_rate: Option<u32>,
}

impl EncoderSettings {
    /// Build the settings for a recording from the caller's codec and quality.
    ///
    /// Encoding is always constant-quality. The sample rate follows the
    /// quality table for PCM and FLAC only; every other codec keeps the
    /// engine default.
    pub fn for_recording(codec: &str, quality_level: i32) -> Self {
        let quality = EncodingQuality::from_level(quality_level);

        let sample_rate = match AudioCodec::from_name(codec) {
            Some(c) if c.is_lossless() => quality.map(|q| q.sample_rate()),
            _ => None,
        };

        Self {
            codec: codec.to_string(),
            mode: EncodingMode::ConstantQuality,
            quality,
            sample_rate,
        }
    }
}
