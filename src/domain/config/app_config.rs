//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::codec::DEFAULT_CODEC;
use crate::domain::output::default_output_base;
use crate::domain::quality::DEFAULT_QUALITY;
use crate::domain::recording::Duration;
use crate::domain::volume::{VolumePolicy, VolumeScale, DEFAULT_VOLUME};

/// Volume policy section (`[volume_policy]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumePolicyConfig {
    pub scale: Option<String>,
    pub validate: Option<bool>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub output: Option<String>,
    pub codec: Option<String>,
    pub quality: Option<i32>,
    pub volume: Option<f64>,
    pub duration: Option<String>,
    pub volume_policy: Option<VolumePolicyConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            output: None,
            codec: Some(DEFAULT_CODEC.to_string()),
            quality: Some(DEFAULT_QUALITY),
            volume: Some(DEFAULT_VOLUME),
            duration: None,
            volume_policy: Some(VolumePolicyConfig {
                scale: Some(VolumeScale::Percent.to_string()),
                validate: Some(false),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            output: other.output.or(self.output),
            codec: other.codec.or(self.codec),
            quality: other.quality.or(self.quality),
            volume: other.volume.or(self.volume),
            duration: other.duration.or(self.duration),
            volume_policy: Self::merge_volume_policy(self.volume_policy, other.volume_policy),
        }
    }

    fn merge_volume_policy(
        base: Option<VolumePolicyConfig>,
        other: Option<VolumePolicyConfig>,
    ) -> Option<VolumePolicyConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(VolumePolicyConfig {
                scale: o.scale.or(b.scale),
                validate: o.validate.or(b.validate),
            }),
        }
    }

    /// Output base path, or the data-dir default if not set
    pub fn output_or_default(&self) -> PathBuf {
        self.output
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_output_base)
    }

    /// Codec name, or "audio/FLAC" if not set
    pub fn codec_or_default(&self) -> &str {
        self.codec.as_deref().unwrap_or(DEFAULT_CODEC)
    }

    /// Quality level, or 0 if not set
    pub fn quality_or_default(&self) -> i32 {
        self.quality.unwrap_or(DEFAULT_QUALITY)
    }

    /// Volume, or 100 if not set
    pub fn volume_or_default(&self) -> f64 {
        self.volume.unwrap_or(DEFAULT_VOLUME)
    }

    /// Recording length; `None` records until interrupted
    pub fn duration_or_none(&self) -> Option<Duration> {
        self.duration.as_ref().and_then(|s| s.parse().ok())
    }

    /// Volume policy, falling back to the pass-through percent policy
    pub fn volume_policy_or_default(&self) -> VolumePolicy {
        let section = self.volume_policy.as_ref();
        let scale = section
            .and_then(|p| p.scale.as_deref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let validate = section.and_then(|p| p.validate).unwrap_or(false);
        VolumePolicy::new(scale, validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.output.is_none());
        assert_eq!(config.codec, Some("audio/FLAC".to_string()));
        assert_eq!(config.quality, Some(0));
        assert_eq!(config.volume, Some(100.0));
        assert!(config.duration.is_none());
        let policy = config.volume_policy.as_ref().unwrap();
        assert_eq!(policy.scale, Some("percent".to_string()));
        assert_eq!(policy.validate, Some(false));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.output.is_none());
        assert!(config.codec.is_none());
        assert!(config.quality.is_none());
        assert!(config.volume.is_none());
        assert!(config.volume_policy.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            output: Some("/base".to_string()),
            codec: Some("audio/FLAC".to_string()),
            quality: Some(1),
            ..Default::default()
        };

        let other = AppConfig {
            output: Some("/other".to_string()),
            codec: None,
            quality: Some(4),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.output, Some("/other".to_string()));
        assert_eq!(merged.codec, Some("audio/FLAC".to_string()));
        assert_eq!(merged.quality, Some(4));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            volume: Some(40.0),
            duration: Some("30s".to_string()),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.volume, Some(40.0));
        assert_eq!(merged.duration, Some("30s".to_string()));
    }

    #[test]
    fn merge_volume_policy_fields() {
        let base = AppConfig {
            volume_policy: Some(VolumePolicyConfig {
                scale: Some("unit".to_string()),
                validate: Some(false),
            }),
            ..Default::default()
        };
        let other = AppConfig {
            volume_policy: Some(VolumePolicyConfig {
                scale: None,
                validate: Some(true),
            }),
            ..Default::default()
        };
        let policy = base.merge(other).volume_policy_or_default();
        assert_eq!(policy, VolumePolicy::new(VolumeScale::Unit, true));
    }

    #[test]
    fn accessors_fall_back_to_defaults() {
        let config = AppConfig::empty();
        assert_eq!(config.codec_or_default(), "audio/FLAC");
        assert_eq!(config.quality_or_default(), 0);
        assert_eq!(config.volume_or_default(), 100.0);
        assert!(config.duration_or_none().is_none());
        assert_eq!(config.volume_policy_or_default(), VolumePolicy::default());
        assert!(config
            .output_or_default()
            .to_string_lossy()
            .contains("speech-recorder"));
    }

    #[test]
    fn duration_parses_when_valid() {
        let config = AppConfig {
            duration: Some("1m".to_string()),
            ..Default::default()
        };
        assert_eq!(config.duration_or_none().unwrap().as_secs(), 60);

        let invalid = AppConfig {
            duration: Some("forever".to_string()),
            ..Default::default()
        };
        assert!(invalid.duration_or_none().is_none());
    }

    #[test]
    fn invalid_scale_falls_back_to_percent() {
        let config = AppConfig {
            volume_policy: Some(VolumePolicyConfig {
                scale: Some("decibel".to_string()),
                validate: None,
            }),
            ..Default::default()
        };
        assert_eq!(config.volume_policy_or_default().scale, VolumeScale::Percent);
    }

    #[test]
    fn empty_output_uses_default_base() {
        let config = AppConfig {
            output: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.output_or_default(), default_output_base());
    }
}
