//! Audio codec value object and codec lookup tables

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidCodecError;

/// Codec name used when the caller never picks one
pub const DEFAULT_CODEC: &str = "audio/FLAC";

/// Codecs the recorder knows how to map to a container and file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCodec {
    Pcm,
    Flac,
    Vorbis,
    Amr,
    Mpeg,
}

impl AudioCodec {
    /// All known codecs, in lookup order
    pub const ALL: [AudioCodec; 5] = [
        AudioCodec::Mpeg,
        AudioCodec::Vorbis,
        AudioCodec::Flac,
        AudioCodec::Pcm,
        AudioCodec::Amr,
    ];

    /// Get the mime-style codec name (e.g. "audio/FLAC")
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pcm => "audio/PCM",
            Self::Flac => "audio/FLAC",
            Self::Vorbis => "audio/vorbis",
            Self::Amr => "audio/AMR",
            Self::Mpeg => "audio/mpeg",
        }
    }

    /// Container format the engine should wrap this codec in
    pub const fn container(&self) -> &'static str {
        match self {
            Self::Vorbis => "ogg",
            Self::Pcm => "wav",
            Self::Flac => "raw",
            Self::Amr => "amr",
            Self::Mpeg => "raw",
        }
    }

    /// File extension (with leading dot) for recordings in this codec
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Vorbis => ".ogg",
            Self::Pcm => ".wav",
            Self::Flac => ".flac",
            Self::Amr => ".amr",
            Self::Mpeg => ".mp3",
        }
    }

    /// Whether the quality level also selects the sample rate
    pub const fn is_lossless(&self) -> bool {
        matches!(self, Self::Pcm | Self::Flac)
    }

    /// Look up a codec by its exact mime name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|codec| codec.name() == name)
    }
}

impl FromStr for AudioCodec {
    type Err = InvalidCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| InvalidCodecError {
            input: s.to_string(),
        })
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Container for a codec name; empty for unknown codecs
pub fn container_for_codec(codec: &str) -> &'static str {
    AudioCodec::from_name(codec).map_or("", |c| c.container())
}

/// File extension for a codec name; empty for unknown codecs
pub fn extension_for_codec(codec: &str) -> &'static str {
    AudioCodec::from_name(codec).map_or("", |c| c.extension())
}

/// Keep only engine codecs that mention one of the known codec names.
///
/// Matching is a case-insensitive substring test and the engine's
/// ordering is preserved.
pub fn filter_supported_codecs<I, S>(engine_codecs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let needles: Vec<String> = AudioCodec::ALL
        .iter()
        .map(|c| c.name().to_lowercase())
        .collect();

    engine_codecs
        .into_iter()
        .map(Into::into)
        .filter(|codec| {
            let lower = codec.to_lowercase();
            needles.iter().any(|needle| lower.contains(needle.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_table() {
        assert_eq!(container_for_codec("audio/vorbis"), "ogg");
        assert_eq!(container_for_codec("audio/PCM"), "wav");
        assert_eq!(container_for_codec("audio/FLAC"), "raw");
        assert_eq!(container_for_codec("audio/AMR"), "amr");
        assert_eq!(container_for_codec("audio/mpeg"), "raw");
    }

    #[test]
    fn extension_table() {
        assert_eq!(extension_for_codec("audio/vorbis"), ".ogg");
        assert_eq!(extension_for_codec("audio/PCM"), ".wav");
        assert_eq!(extension_for_codec("audio/FLAC"), ".flac");
        assert_eq!(extension_for_codec("audio/AMR"), ".amr");
        assert_eq!(extension_for_codec("audio/mpeg"), ".mp3");
    }

    #[test]
    fn unknown_codec_maps_to_empty() {
        assert_eq!(container_for_codec("audio/opus"), "");
        assert_eq!(extension_for_codec("audio/opus"), "");
        assert_eq!(container_for_codec(""), "");
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(AudioCodec::from_name("audio/FLAC"), Some(AudioCodec::Flac));
        assert_eq!(AudioCodec::from_name("audio/flac"), None);
        assert_eq!(AudioCodec::from_name("FLAC"), None);
    }

    #[test]
    fn parse_codec() {
        let codec: AudioCodec = " audio/PCM ".parse().unwrap();
        assert_eq!(codec, AudioCodec::Pcm);
        assert!("audio/opus".parse::<AudioCodec>().is_err());
    }

    #[test]
    fn lossless_codecs() {
        assert!(AudioCodec::Pcm.is_lossless());
        assert!(AudioCodec::Flac.is_lossless());
        assert!(!AudioCodec::Vorbis.is_lossless());
        assert!(!AudioCodec::Amr.is_lossless());
        assert!(!AudioCodec::Mpeg.is_lossless());
    }

    #[test]
    fn filter_keeps_known_codecs_in_order() {
        let engine = vec![
            "audio/x-raw",
            "audio/FLAC",
            "audio/AMR",
            "audio/speex",
            "audio/PCM",
            "audio/mpeg, mpegversion=(int)1",
        ];
        let filtered = filter_supported_codecs(engine);
        assert_eq!(
            filtered,
            vec![
                "audio/FLAC",
                "audio/AMR",
                "audio/PCM",
                "audio/mpeg, mpegversion=(int)1"
            ]
        );
    }

    #[test]
    fn filter_is_case_insensitive() {
        let filtered = filter_supported_codecs(vec!["AUDIO/VORBIS", "audio/flac", "video/h264"]);
        assert_eq!(filtered, vec!["AUDIO/VORBIS", "audio/flac"]);
    }

    #[test]
    fn filter_keeps_multi_match_once() {
        let filtered = filter_supported_codecs(vec!["audio/FLAC+audio/PCM"]);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn default_codec_is_flac() {
        assert_eq!(AudioCodec::from_name(DEFAULT_CODEC), Some(AudioCodec::Flac));
    }
}
