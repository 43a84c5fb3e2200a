//! Volume scale and validation policy
//!
//! Callers have used both a 0..100 percent scale and a 0..1 unit scale for
//! the recording volume. The policy fixes which one applies and whether
//! out-of-range values are rejected or passed through to the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{InvalidVolumeScaleError, SettingsError};

/// Volume used when the caller never picks one
pub const DEFAULT_VOLUME: f64 = 100.0;

/// Range the caller-facing volume value lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeScale {
    /// 0..=100, 100 is unity gain
    #[default]
    Percent,
    /// 0..=1, 1 is unity gain
    Unit,
}

impl VolumeScale {
    pub const fn max(&self) -> f64 {
        match self {
            Self::Percent => 100.0,
            Self::Unit => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Unit => "unit",
        }
    }
}

impl FromStr for VolumeScale {
    type Err = InvalidVolumeScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percent" => Ok(Self::Percent),
            "unit" => Ok(Self::Unit),
            _ => Err(InvalidVolumeScaleError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for VolumeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the recorder treats volume values.
///
/// The default passes any value through unchanged on the percent scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VolumePolicy {
    pub scale: VolumeScale,
    pub validate: bool,
}

impl VolumePolicy {
    pub const fn new(scale: VolumeScale, validate: bool) -> Self {
        Self { scale, validate }
    }

    /// Check a volume against the policy
    pub fn check(&self, volume: f64) -> Result<(), SettingsError> {
        if !self.validate {
            return Ok(());
        }

        let max = self.scale.max();
        if volume.is_nan() || !(0.0..=max).contains(&volume) {
            return Err(SettingsError::VolumeOutOfRange {
                value: volume,
                min: 0.0,
                max,
            });
        }
        Ok(())
    }

    /// Linear gain for the engine (1.0 is unity)
    pub fn gain(&self, volume: f64) -> f64 {
        volume / self.scale.max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_passes_everything_through() {
        let policy = VolumePolicy::default();
        assert!(policy.check(-5.0).is_ok());
        assert!(policy.check(250.0).is_ok());
        assert_eq!(policy.gain(250.0), 2.5);
    }

    #[test]
    fn percent_validation() {
        let policy = VolumePolicy::new(VolumeScale::Percent, true);
        assert!(policy.check(0.0).is_ok());
        assert!(policy.check(100.0).is_ok());
        assert!(policy.check(100.5).is_err());
        assert!(policy.check(-0.1).is_err());
        assert!(policy.check(f64::NAN).is_err());
    }

    #[test]
    fn unit_validation() {
        let policy = VolumePolicy::new(VolumeScale::Unit, true);
        assert!(policy.check(0.5).is_ok());
        assert!(policy.check(50.0).is_err());
        assert_eq!(policy.gain(0.5), 0.5);
    }

    #[test]
    fn percent_gain() {
        let policy = VolumePolicy::default();
        assert_eq!(policy.gain(DEFAULT_VOLUME), 1.0);
        assert_eq!(policy.gain(50.0), 0.5);
    }

    #[test]
    fn parse_scale() {
        assert_eq!("percent".parse::<VolumeScale>().unwrap(), VolumeScale::Percent);
        assert_eq!(" Unit ".parse::<VolumeScale>().unwrap(), VolumeScale::Unit);
        assert!("decibel".parse::<VolumeScale>().is_err());
    }

    #[test]
    fn out_of_range_error_message() {
        let err = VolumePolicy::new(VolumeScale::Unit, true)
            .check(2.0)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains('2'));
        assert!(msg.contains('1'));
    }
}
