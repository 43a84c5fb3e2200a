//! Recording length value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DurationParseError;

/// How long a recording runs before the CLI stops it.
/// Always non-zero once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Whether a recording of `elapsed_ms` has reached this length
    pub const fn has_elapsed(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.milliseconds
    }
}

/// Seconds per unit suffix
fn unit_secs(unit: char) -> Option<u64> {
    match unit {
        'h' => Some(3600),
        'm' => Some(60),
        's' => Some(1),
        _ => None,
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse "30s", "1m", "2m30s" or "1h5m". Units must appear largest first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationParseError {
            input: s.to_string(),
        };

        let input = s.trim().to_ascii_lowercase();
        let mut rest = input.as_str();
        let mut total_secs: u64 = 0;
        let mut last_unit = u64::MAX;

        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
            if digits == 0 {
                return Err(invalid());
            }
            let value: u64 = rest[..digits].parse().map_err(|_| invalid())?;

            let unit = rest[digits..].chars().next().ok_or_else(invalid)?;
            let secs = unit_secs(unit).ok_or_else(invalid)?;
            if secs >= last_unit {
                return Err(invalid());
            }
            last_unit = secs;

            total_secs = value
                .checked_mul(secs)
                .and_then(|v| total_secs.checked_add(v))
                .ok_or_else(invalid)?;
            rest = &rest[digits + unit.len_utf8()..];
        }

        if total_secs == 0 {
            return Err(invalid());
        }
        total_secs
            .checked_mul(1000)
            .map(Self::from_millis)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.as_secs();
        let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);

        if h > 0 {
            write!(f, "{}h", h)?;
        }
        if m > 0 {
            write!(f, "{}m", m)?;
        }
        if s > 0 || secs == 0 {
            write!(f, "{}s", s)?;
        }
        Ok(())
    }
}
