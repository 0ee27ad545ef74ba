//! Activity duration parsing
//!
//! Durations travel as display strings such as `"5 minutes"` or `"10 min"`.
//! The leading integer is the authoritative timer length in minutes.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest activity we accept; the countdown display has no hour component.
pub const MAX_ACTIVITY_MINUTES: u32 = 59;

/// Why a duration string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("duration '{0}' has no leading number of minutes")]
    MissingMinutes(String),

    #[error("duration '{0}' uses an unsupported unit")]
    UnsupportedUnit(String),

    #[error("duration '{value}' must be between 1 and {max} minutes")]
    OutOfRange { value: String, max: u32 },
}

/// A validated activity length in whole minutes (1..=59)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityDuration(u32);

impl ActivityDuration {
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (1..=MAX_ACTIVITY_MINUTES)
            .contains(&minutes)
            .then_some(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn seconds(&self) -> u64 {
        u64::from(self.0) * 60
    }
}

impl FromStr for ActivityDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());

        let digits = &trimmed[..digits_end];
        if digits.is_empty() {
            return Err(DurationError::MissingMinutes(s.to_string()));
        }

        let unit = trimmed[digits_end..].trim().to_ascii_lowercase();
        if !unit.is_empty() && !unit.starts_with("min") {
            return Err(DurationError::UnsupportedUnit(s.to_string()));
        }

        let out_of_range = || DurationError::OutOfRange {
            value: s.to_string(),
            max: MAX_ACTIVITY_MINUTES,
        };

        let minutes: u32 = digits.parse().map_err(|_| out_of_range())?;
        Self::from_minutes(minutes).ok_or_else(out_of_range)
    }
}

impl fmt::Display for ActivityDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1 {
            write!(f, "1 minute")
        } else {
            write!(f, "{} minutes", self.0)
        }
    }
}
