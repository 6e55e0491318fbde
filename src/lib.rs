//! Everlax - seamless drifting background animations
//!
//! This library provides functionality to:
//! - Parse an element's multi-layer background (`url()` images, sizes, positions)
//! - Resolve each layer's size, start offset and travel destination
//! - Emit uniquely named, vendor prefixed `@keyframes` rules that loop seamlessly
//! - Load defaults from an optional `everlax.toml`

pub mod animate;
pub mod barrier;
pub mod cli;
pub mod config;
pub mod css;
pub mod direction;
pub mod duration;
pub mod element;
pub mod emitter;
pub mod geometry;
pub mod layers;
pub mod plan;
pub mod probe;
pub mod units;

pub use animate::{AnimateError, Everlax};
pub use element::{AnimationOptions, Element, StaticElement};
pub use emitter::{CssStyleSheet, EmittedRule, RuleCounter, StyleSheet};
pub use probe::{FileProbe, ImageProbe, StaticProbe};
