//! Travel direction vectors
//!
//! Turns a compass angle into a per-axis travel fraction. One axis always
//! travels a full tile per iteration; the other travels a fraction, and the
//! iteration count is how many tiles the major axis must cross before the
//! minor axis has also crossed (roughly) a whole tile.
//!
//! Because both axes are measured in tiles, a non-square tile drifts at a
//! slightly different apparent angle than the one requested.

use serde::{Deserialize, Serialize};

/// Normalized travel direction shared by every layer of one animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    /// Horizontal tiles travelled per iteration, in `[-1, 1]`
    pub x: f64,
    /// Vertical tiles travelled per iteration, in `[-1, 1]`
    pub y: f64,
    /// Number of tile lengths the animation covers, at least 1
    pub iterations: u32,
}

impl Direction {
    /// Compute the direction for an angle in degrees.
    ///
    /// 0° drifts right, 90° drifts down (screen coordinates), 180° left,
    /// 270° up.
    ///
    /// # Example
    ///
    /// ```
    /// use everlax::direction::Direction;
    ///
    /// let d = Direction::from_degrees(45.0);
    /// assert_eq!((d.x, d.y, d.iterations), (1.0, 1.0, 1));
    ///
    /// let d = Direction::from_degrees(90.0);
    /// assert_eq!((d.x, d.y, d.iterations), (0.0, 1.0, 1));
    /// ```
    pub fn from_degrees(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        let mut x = round4(radians.cos());
        let mut y = round4(radians.sin());

        // Push the minor axis out so the major axis sits exactly on +-1
        let adjust = (1.0 - x.abs()).min(1.0 - y.abs());
        x = round4(x + signed_like(adjust, x));
        y = round4(y + signed_like(adjust, y));

        let minor = x.abs().min(y.abs());
        let iterations = (1.0 / minor).floor();
        let iterations = if iterations.is_finite() && iterations >= 1.0 {
            iterations as u32
        } else {
            1
        };

        Self { x, y, iterations }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::from_degrees(0.0)
    }
}

/// Round to 4 decimal places, clearing trig noise at axis-aligned angles.
fn round4(value: f64) -> f64 {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    // Normalize -0.0 so formatting and sign checks stay stable
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Give `magnitude` the sign of `sign_of`; zero counts as positive.
fn signed_like(magnitude: f64, sign_of: f64) -> f64 {
    if sign_of < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}
