//! Layer geometry: rendered size, start offset and seamless end offset
//!
//! All lengths are whole pixels. Given a layer's size/position tokens, the
//! natural size of its image and the rendered size of the element, these
//! functions work out where the layer starts and where it must end so the
//! final keyframe lands exactly on a repeat of the tile.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::layers::AxisPair;
use crate::units::{floor_px, Unit};

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

impl Size {
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

/// A pixel offset, formatted the way `background-position` expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}px", self.x, self.y)
    }
}

/// Work out the rendered size of a layer's image.
///
/// - `auto auto` keeps the natural size.
/// - One `auto` axis scales with the explicit axis, preserving the aspect
///   ratio.
/// - Two explicit axes resolve independently against the container.
pub fn resolve_size(size: &AxisPair, natural: Size, container: Size) -> Size {
    let width = Unit::parse(&size.x);
    let height = Unit::parse(&size.y);

    match (width.is_auto(), height.is_auto()) {
        (true, true) => natural,
        (true, false) => {
            let h = height.resolve(natural.height as f64, container.height as f64);
            Size::new(scale_axis(natural.width, h, natural.height), h)
        }
        (false, true) => {
            let w = width.resolve(natural.width as f64, container.width as f64);
            Size::new(w, scale_axis(natural.height, w, natural.width))
        }
        (false, false) => Size::new(
            width.resolve(natural.width as f64, container.width as f64),
            height.resolve(natural.height as f64, container.height as f64),
        ),
    }
}

/// Scale `length` by `resolved / natural`, guarding against empty images.
fn scale_axis(length: i64, resolved: i64, natural: i64) -> i64 {
    if natural == 0 {
        return 0;
    }
    floor_px(length as f64 * (resolved as f64 / natural as f64))
}

/// Work out the start offset of a layer.
///
/// Percentages and keywords place the tile within the space left over once
/// the tile itself is accounted for (`50%` centers the tile, `100%` puts
/// its far edge on the container's far edge).
pub fn resolve_position(position: &AxisPair, size: Size, container: Size) -> Point {
    Point::new(
        position_axis(&position.x, size.width, container.width),
        position_axis(&position.y, size.height, container.height),
    )
}

fn position_axis(token: &str, tile: i64, container: i64) -> i64 {
    let remaining = container.saturating_sub(tile) as f64;
    Unit::parse(token).resolve(0.0, remaining)
}

/// The signed distance from `raw` to the next multiple of `tile`, moving
/// away from zero. A value already on a multiple needs no correction.
///
/// # Example
///
/// ```
/// use everlax::geometry::nearest_multiple_correction;
///
/// assert_eq!(nearest_multiple_correction(150, 100), 50);
/// assert_eq!(nearest_multiple_correction(-150, 100), -50);
/// assert_eq!(nearest_multiple_correction(200, 100), 0);
/// ```
pub fn nearest_multiple_correction(raw: i64, tile: i64) -> i64 {
    let tile = tile.saturating_abs();
    if tile == 0 {
        return 0;
    }

    let delta = tile - raw.saturating_abs() % tile;
    if delta == tile {
        0
    } else if raw < 0 {
        -delta
    } else {
        delta
    }
}

/// Work out where a layer ends so that the loop is seamless.
///
/// Each axis travels `direction * tile * iterations` pixels, then snaps out
/// to the next whole tile. A zero-length tile axis stays where it started.
pub fn resolve_destination(direction: &Direction, size: Size, start: Point) -> Point {
    let iterations = f64::from(direction.iterations);
    Point::new(
        destination_axis(direction.x, size.width, start.x, iterations),
        destination_axis(direction.y, size.height, start.y, iterations),
    )
}

fn destination_axis(fraction: f64, tile: i64, start: i64, iterations: f64) -> i64 {
    if tile == 0 {
        return start;
    }
    let raw = floor_px(fraction * tile as f64 * iterations);
    raw.saturating_add(nearest_multiple_correction(raw, tile)).saturating_add(start)
}
