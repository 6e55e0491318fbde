//! Background unit resolution
//!
//! Converts a single CSS length token (`10px`, `50%`, `left`, `center`, ...)
//! into a whole pixel value for one axis.

use tracing::debug;

/// A parsed background unit token.
///
/// Only the units backgrounds are animated with are recognised: pixels,
/// percentages, the edge keywords and `auto`. Anything else is `Unknown`
/// and resolves to zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    /// Absolute pixels (`10px`)
    Px(f64),
    /// Percentage of the container length (`50%`)
    Percent(f64),
    /// `left` or `top`
    Start,
    /// `right` or `bottom`
    End,
    /// `center`
    Center,
    /// `auto`
    Auto,
    /// Anything unparseable
    Unknown(String),
}

impl Unit {
    /// Parse a single unit token. Never fails: malformed input becomes
    /// [`Unit::Unknown`].
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let lower = token.to_lowercase();

        match lower.as_str() {
            "left" | "top" => return Unit::Start,
            "right" | "bottom" => return Unit::End,
            "center" => return Unit::Center,
            "auto" => return Unit::Auto,
            _ => {}
        }

        if let Some(num) = lower.strip_suffix("px") {
            return match parse_leading_number(num) {
                Some(v) => Unit::Px(v),
                None => Unit::Unknown(token.to_string()),
            };
        }

        if let Some(num) = lower.strip_suffix('%') {
            return match parse_leading_number(num) {
                Some(v) => Unit::Percent(v),
                None => Unit::Unknown(token.to_string()),
            };
        }

        // A bare zero is the one unitless length CSS allows
        match parse_leading_number(&lower) {
            Some(v) if v == 0.0 => Unit::Px(0.0),
            _ => Unit::Unknown(token.to_string()),
        }
    }

    /// Check whether this token is `auto`
    pub fn is_auto(&self) -> bool {
        matches!(self, Unit::Auto)
    }

    /// Resolve to whole pixels.
    ///
    /// `content_length` is the length of the thing being placed (the tile),
    /// `container_length` the length it is placed within. `auto` has no
    /// meaning without caller context and resolves to zero here.
    pub fn resolve(&self, content_length: f64, container_length: f64) -> i64 {
        let value = match self {
            Unit::Px(v) => *v,
            Unit::Percent(p) => container_length * (p / 100.0),
            Unit::Start => 0.0,
            Unit::End => container_length - content_length,
            Unit::Center => container_length / 2.0 - content_length / 2.0,
            Unit::Auto => 0.0,
            Unit::Unknown(token) => {
                debug!(token = %token, "unrecognised background unit, using 0");
                0.0
            }
        };

        floor_px(value)
    }
}

/// Resolve a unit token to whole pixels.
///
/// # Example
///
/// ```
/// use everlax::units::resolve_unit;
///
/// assert_eq!(resolve_unit("50%", 0.0, 200.0), 100);
/// assert_eq!(resolve_unit("10px", 0.0, 200.0), 10);
/// assert_eq!(resolve_unit("center", 50.0, 200.0), 75);
/// ```
pub fn resolve_unit(token: &str, content_length: f64, container_length: f64) -> i64 {
    Unit::parse(token).resolve(content_length, container_length)
}

/// Largest pixel magnitude a resolved length is clamped to.
pub const MAX_PX: i64 = 1 << 40;

/// Floor a length to a whole pixel within `-MAX_PX..=MAX_PX`, mapping
/// non-finite values to zero.
pub(crate) fn floor_px(value: f64) -> i64 {
    if value.is_finite() {
        (value.floor() as i64).clamp(-MAX_PX, MAX_PX)
    } else {
        0
    }
}

/// Parse the numeric prefix of a string (`"12.5abc"` → 12.5).
///
/// Returns `None` when the string does not start with a number.
pub(crate) fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end = frac_start;
        }
    }

    if !has_digits {
        return None;
    }

    // Optional exponent, only consumed when complete
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
