//! Elements and per-element options
//!
//! The [`Element`] trait is the narrow view of a styled element needed to
//! animate it: its background style strings, its attributes, its rendered
//! size, and a way to attach a class.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::Size;
use crate::units::parse_leading_number;

/// Default travel angle in degrees (drift right)
pub const DEFAULT_DIRECTION: i32 = 0;

/// Default duration of one tile of travel
pub const DEFAULT_DURATION: &str = "10s";

/// Default prefix of per-element option attributes
pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "data-everlax-";

/// A styled element that can be animated.
pub trait Element {
    /// Computed value of a style property (e.g. `background-image`)
    fn style(&self, property: &str) -> Option<String>;
    /// Value of an attribute
    fn attribute(&self, name: &str) -> Option<String>;
    /// Rendered content size in pixels
    fn rendered_size(&self) -> Size;
    /// Attach a class name
    fn add_class(&mut self, class: &str);
}

/// An element described entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticElement {
    styles: HashMap<String, String>,
    attributes: HashMap<String, String>,
    size: Size,
    classes: Vec<String>,
}

impl StaticElement {
    /// An element rendered at `width` x `height`
    pub fn new(width: i64, height: i64) -> Self {
        Self { size: Size::new(width, height), ..Default::default() }
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Classes added so far, in order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl Element for StaticElement {
    fn style(&self, property: &str) -> Option<String> {
        self.styles.get(property).cloned()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn rendered_size(&self) -> Size {
        self.size
    }

    fn add_class(&mut self, class: &str) {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
    }
}

/// Options passed to one invocation. Unset options fall back to the
/// element's attributes, then to [`OptionDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationOptions {
    /// Travel angle in degrees
    pub direction: Option<i32>,
    /// Duration of one tile of travel (`<number>s` or `<number>ms`)
    pub duration: Option<String>,
}

impl AnimationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(mut self, degrees: i32) -> Self {
        self.direction = Some(degrees);
        self
    }

    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }
}

/// Fallback option values and the attribute names they are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDefaults {
    pub direction: i32,
    pub duration: String,
    pub attribute_prefix: String,
}

impl Default for OptionDefaults {
    fn default() -> Self {
        Self {
            direction: DEFAULT_DIRECTION,
            duration: DEFAULT_DURATION.to_string(),
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_string(),
        }
    }
}

/// Options after fallback resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub direction: i32,
    pub duration: String,
}

/// Resolve options for one element: call options, then
/// `{prefix}direction` / `{prefix}duration` attributes, then defaults.
pub fn resolve_options<E: Element + ?Sized>(
    options: &AnimationOptions,
    element: &E,
    defaults: &OptionDefaults,
) -> ResolvedOptions {
    let direction = options.direction.unwrap_or_else(|| {
        element
            .attribute(&format!("{}direction", defaults.attribute_prefix))
            .map(|text| parse_direction(&text))
            .unwrap_or(defaults.direction)
    });

    let duration = options
        .duration
        .clone()
        .or_else(|| element.attribute(&format!("{}duration", defaults.attribute_prefix)))
        .unwrap_or_else(|| defaults.duration.clone());

    ResolvedOptions { direction, duration: duration.trim().to_string() }
}

/// Parse a direction attribute like `45`, `-90` or `45deg`.
///
/// Only the leading integer is read; text without one falls back to 0.
pub fn parse_direction(text: &str) -> i32 {
    match parse_leading_number(text) {
        Some(v) if v.is_finite() => v.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32,
        _ => {
            warn!(value = %text, "unparseable direction, using 0");
            0
        }
    }
}
