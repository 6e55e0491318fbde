//! Animation duration scaling
//!
//! The generated animation covers `iterations` tile lengths, so the
//! configured per-tile duration is multiplied to keep the drift speed.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The one user input error that aborts a whole invocation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Duration is not a number followed by `s` or `ms`
    #[error("invalid duration '{0}': expected a number followed by 's' or 'ms'")]
    InvalidDuration(String),
    /// Duration is negative or too large to represent once scaled
    #[error("duration '{0}' out of range: expected a finite, non-negative time")]
    DurationOutOfRange(String),
}

/// A CSS `<time>` value, keeping the unit exactly as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssDuration {
    /// Numeric magnitude
    pub magnitude: f64,
    /// `s` or `ms`, as written
    pub unit: String,
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*((?i:ms|s))$")
            .expect("duration pattern is valid")
    })
}

impl CssDuration {
    /// Parse a duration such as `10s`, `250ms` or `1.5S`.
    pub fn parse(value: &str) -> Result<Self, ConfigurationError> {
        let trimmed = value.trim();
        let caps = duration_pattern()
            .captures(trimmed)
            .ok_or_else(|| ConfigurationError::InvalidDuration(value.to_string()))?;

        let magnitude = caps[1]
            .parse::<f64>()
            .map_err(|_| ConfigurationError::InvalidDuration(value.to_string()))?;

        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(ConfigurationError::DurationOutOfRange(value.to_string()));
        }

        Ok(Self { magnitude, unit: caps[2].to_string() })
    }

    /// Multiply the magnitude, keeping the unit.
    pub fn scaled(&self, factor: u32) -> Self {
        Self { magnitude: self.magnitude * f64::from(factor), unit: self.unit.clone() }
    }
}

impl fmt::Display for CssDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.magnitude), self.unit)
    }
}

/// Scale a duration token by the number of iterations an animation covers.
///
/// # Example
///
/// ```
/// use everlax::duration::scale_duration;
///
/// assert_eq!(scale_duration("10s", 4).unwrap(), "40s");
/// assert_eq!(scale_duration("250ms", 2).unwrap(), "500ms");
/// assert!(scale_duration("bogus", 3).is_err());
/// ```
pub fn scale_duration(duration: &str, iterations: u32) -> Result<String, ConfigurationError> {
    let scaled = CssDuration::parse(duration)?.scaled(iterations);
    if !scaled.magnitude.is_finite() {
        return Err(ConfigurationError::DurationOutOfRange(duration.to_string()));
    }
    Ok(scaled.to_string())
}

/// Format a number without a trailing `.0` for whole values.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
