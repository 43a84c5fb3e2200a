//! Encoding quality levels and the sample-rate table

use std::fmt;

/// Quality level used when the caller never picks one
pub const DEFAULT_QUALITY: i32 = 0;

/// Encoding quality, from 0 (very low) to 4 (very high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EncodingQuality {
    VeryLow = 0,
    Low = 1,
    Normal = 2,
    High = 3,
    VeryHigh = 4,
}

impl EncodingQuality {
    /// Map a numeric level onto a quality; `None` outside 0..=4
    pub const fn from_level(level: i32) -> Option<Self> {
        match level {
            0 => Some(Self::VeryLow),
            1 => Some(Self::Low),
            2 => Some(Self::Normal),
            3 => Some(Self::High),
            4 => Some(Self::VeryHigh),
            _ => None,
        }
    }

    pub const fn level(&self) -> i32 {
        *self as i32
    }

    /// Sample rate in Hz for lossless codecs at this quality
    pub const fn sample_rate(&self) -> u32 {
        match self {
            Self::VeryLow => 8000,
            Self::Low => 16000,
            Self::Normal => 22050,
            Self::High => 44100,
            Self::VeryHigh => 88200,
        }
    }
}

impl fmt::Display for EncodingQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VeryLow => "very-low",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::VeryHigh => "very-high",
        };
        write!(f, "{}", s)
    }
}

/// How the engine trades bitrate against quality.
///
/// Recordings are always constant-quality; the quality level picks the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingMode {
    #[default]
    ConstantQuality,
}
