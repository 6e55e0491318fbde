//! Load join barrier
//!
//! Probes every layer's image at once and settles each layer as its probe
//! completes, in whatever order that happens. The finished frames are
//! released exactly once, when the last layer settles.

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::{trace, warn};

use crate::direction::Direction;
use crate::geometry::{resolve_destination, resolve_position, resolve_size, Point, Size};
use crate::layers::LayerSpec;
use crate::plan::{AnimationPlan, KeyframeFrames};
use crate::probe::{ImageProbe, ProbeError};

/// Resolve the start and end offsets of one layer whose image measured
/// `natural` pixels.
pub fn resolve_layer(
    layer: &LayerSpec,
    natural: Size,
    container: Size,
    direction: &Direction,
) -> (Point, Point) {
    let size = resolve_size(&layer.size, natural, container);
    let start = resolve_position(&layer.position, size, container);
    let destination = resolve_destination(direction, size, start);
    trace!(
        source = %layer.image_source,
        ?natural,
        ?size,
        %start,
        %destination,
        "resolved layer"
    );
    (start, destination)
}

/// Join point for the image probes of one element.
#[derive(Debug)]
pub struct LoadJoinBarrier<'a> {
    layers: &'a [LayerSpec],
    direction: Direction,
    container: Size,
    plan: AnimationPlan,
    released: bool,
    settlements: usize,
}

impl<'a> LoadJoinBarrier<'a> {
    pub fn new(
        layers: &'a [LayerSpec],
        direction: Direction,
        container: Size,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            layers,
            direction,
            container,
            plan: AnimationPlan::new(layers, duration),
            released: false,
            settlements: 0,
        }
    }

    /// The plan as accumulated so far
    pub fn plan(&self) -> &AnimationPlan {
        &self.plan
    }

    /// Number of probe outcomes recorded
    pub fn settlements(&self) -> usize {
        self.settlements
    }

    /// Record the probe outcome for layer `index`.
    ///
    /// Returns the finished frames the first time every layer has settled,
    /// `None` otherwise (including on every later call).
    pub fn settle(
        &mut self,
        index: usize,
        outcome: Result<Size, ProbeError>,
    ) -> Option<KeyframeFrames> {
        let Some(layer) = self.layers.get(index) else {
            warn!(layer = index, "probe outcome for unknown layer");
            return None;
        };

        let written = match outcome {
            Ok(natural) => {
                let (start, destination) =
                    resolve_layer(layer, natural, self.container, &self.direction);
                self.plan.settle(index, start.to_string(), destination.to_string())
            }
            Err(e) => {
                warn!(
                    layer = index,
                    source = %layer.image_source,
                    error = %e,
                    "layer image failed to load, layer will not move"
                );
                self.plan.settle_failed(index)
            }
        };

        if written.is_err() {
            return None;
        }
        self.settlements += 1;

        if self.released || !self.plan.is_complete() {
            return None;
        }
        self.released = true;
        self.plan.frames()
    }

    /// Dispatch one probe per layer and settle layers as probes complete.
    ///
    /// Resolves to the finished frames once every probe has settled. A probe
    /// that never completes keeps this future pending forever.
    pub async fn run<P: ImageProbe + ?Sized>(mut self, probe: &P) -> Option<KeyframeFrames> {
        let layers = self.layers;
        let mut pending: FuturesUnordered<_> = layers
            .iter()
            .enumerate()
            .map(|(index, layer)| probe.probe(&layer.image_source).map(move |r| (index, r)))
            .collect();

        let mut released = None;
        while let Some((index, outcome)) = pending.next().await {
            if let Some(frames) = self.settle(index, outcome) {
                released = Some(frames);
            }
        }

        released
    }
}
