//! Per-element animation
//!
//! Ties the pieces together for one element: parse its background layers,
//! resolve options, probe every layer's image, and once all probes have
//! settled emit the keyframes and tag the element with the rule's class.

use tracing::debug;

use crate::barrier::LoadJoinBarrier;
use crate::config::EverlaxConfig;
use crate::direction::Direction;
use crate::duration::{scale_duration, ConfigurationError};
use crate::element::{resolve_options, AnimationOptions, Element, OptionDefaults};
use crate::emitter::{AnimationEmitter, EmittedRule, RuleCounter, StyleSheet};
use crate::layers::parse_layers;
use crate::probe::ImageProbe;

/// Errors that abort an invocation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum AnimateError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Animates element backgrounds.
#[derive(Debug, Clone)]
pub struct Everlax<'c> {
    emitter: AnimationEmitter<'c>,
    defaults: OptionDefaults,
}

impl Everlax<'static> {
    /// Default settings, naming rules from the process-wide counter
    pub fn new() -> Self {
        Self { emitter: AnimationEmitter::global(), defaults: OptionDefaults::default() }
    }
}

impl Default for Everlax<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> Everlax<'c> {
    /// Build from a loaded configuration, naming rules from `counter`
    pub fn from_config(config: &EverlaxConfig, counter: &'c RuleCounter) -> Self {
        Self {
            emitter: AnimationEmitter::new(counter)
                .with_rule_prefix(config.output.rule_prefix.clone())
                .with_vendor_prefixes(config.output.vendor_prefixes.clone()),
            defaults: OptionDefaults {
                direction: config.defaults.direction,
                duration: config.defaults.duration.clone(),
                attribute_prefix: config.output.attribute_prefix.clone(),
            },
        }
    }

    /// Use a specific emitter
    pub fn with_emitter(mut self, emitter: AnimationEmitter<'c>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Use specific fallback options
    pub fn with_defaults(mut self, defaults: OptionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Animate one element.
    ///
    /// Returns `Ok(None)` when the element has no `url()` background layers.
    /// An unparseable duration fails before any image is probed. Layers whose
    /// image fails to load stay still; the rest still animate.
    pub async fn animate<E, P, S>(
        &self,
        element: &mut E,
        options: &AnimationOptions,
        probe: &P,
        sheet: &mut S,
    ) -> Result<Option<EmittedRule>, AnimateError>
    where
        E: Element + ?Sized,
        P: ImageProbe + ?Sized,
        S: StyleSheet + ?Sized,
    {
        let style = |property: &str| element.style(property).unwrap_or_default();
        let Some(layers) = parse_layers(
            &style("background-image"),
            &style("background-size"),
            &style("background-position"),
        ) else {
            debug!("no background image layers, nothing to animate");
            return Ok(None);
        };

        let resolved = resolve_options(options, &*element, &self.defaults);
        let direction = Direction::from_degrees(f64::from(resolved.direction));
        let duration = scale_duration(&resolved.duration, direction.iterations)?;
        debug!(
            layers = layers.len(),
            degrees = resolved.direction,
            iterations = direction.iterations,
            duration = %duration,
            "probing background layers"
        );

        let barrier = LoadJoinBarrier::new(&layers, direction, element.rendered_size(), duration);
        let Some(frames) = barrier.run(probe).await else {
            return Ok(None);
        };

        let emitted = self.emitter.emit(sheet, &frames);
        element.add_class(&emitted.name);
        Ok(Some(emitted))
    }
}
