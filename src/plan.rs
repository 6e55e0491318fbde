//! Keyframe plan accumulation
//!
//! An [`AnimationPlan`] collects the start and end `background-position` of
//! every layer as image probes settle. Each layer slot is written at most
//! once; the plan is complete when every destination is filled.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layers::LayerSpec;

/// Destination written for layers whose image could not be probed
pub const FALLBACK_DESTINATION: &str = "0px 0px";

/// Error when writing a layer slot
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PlanError {
    /// Slot index is past the last layer
    #[error("layer {index} out of range (plan has {len} layers)")]
    OutOfRange { index: usize, len: usize },
    /// Slot was already settled
    #[error("layer {0} already settled")]
    AlreadySettled(usize),
}

/// Finished keyframe data for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyframeFrames {
    /// `background-position` at 0%, one entry per layer
    pub start_points: Vec<String>,
    /// `background-position` at 100%, one entry per layer
    pub destinations: Vec<String>,
    /// Scaled animation duration (e.g. `40s`)
    pub duration: String,
}

impl KeyframeFrames {
    /// Comma-joined start positions
    pub fn start_list(&self) -> String {
        self.start_points.join(",")
    }

    /// Comma-joined end positions
    pub fn destination_list(&self) -> String {
        self.destinations.join(",")
    }
}

/// Per-invocation accumulator of layer start/end positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationPlan {
    start_points: Vec<String>,
    destinations: Vec<Option<String>>,
    duration: String,
}

impl AnimationPlan {
    /// Create a plan for `layers`, seeding each start point with the
    /// layer's parsed position.
    pub fn new(layers: &[LayerSpec], duration: impl Into<String>) -> Self {
        Self {
            start_points: layers.iter().map(|l| l.position.to_string()).collect(),
            destinations: vec![None; layers.len()],
            duration: duration.into(),
        }
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    /// Check if the plan has no layers
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Scaled duration
    pub fn duration(&self) -> &str {
        &self.duration
    }

    /// Start points in layer order
    pub fn start_points(&self) -> &[String] {
        &self.start_points
    }

    /// Destination of layer `index`, if settled
    pub fn destination(&self, index: usize) -> Option<&str> {
        self.destinations.get(index).and_then(|d| d.as_deref())
    }

    /// Check whether layer `index` has settled
    pub fn is_settled(&self, index: usize) -> bool {
        self.destination(index).is_some()
    }

    /// Check whether every layer has settled
    pub fn is_complete(&self) -> bool {
        self.destinations.iter().all(Option::is_some)
    }

    /// Record a successfully resolved layer.
    pub fn settle(
        &mut self,
        index: usize,
        start: impl Into<String>,
        destination: impl Into<String>,
    ) -> Result<(), PlanError> {
        self.check_open(index)?;
        self.start_points[index] = start.into();
        self.destinations[index] = Some(destination.into());
        Ok(())
    }

    /// Record a layer whose image failed to load. Its start point keeps the
    /// parsed position and it does not travel.
    pub fn settle_failed(&mut self, index: usize) -> Result<(), PlanError> {
        self.check_open(index)?;
        self.destinations[index] = Some(FALLBACK_DESTINATION.to_string());
        Ok(())
    }

    fn check_open(&self, index: usize) -> Result<(), PlanError> {
        match self.destinations.get(index) {
            None => Err(PlanError::OutOfRange { index, len: self.len() }),
            Some(Some(_)) => {
                warn!(layer = index, "ignoring second settlement");
                Err(PlanError::AlreadySettled(index))
            }
            Some(None) => Ok(()),
        }
    }

    /// The finished frames, once every layer has settled.
    pub fn frames(&self) -> Option<KeyframeFrames> {
        if !self.is_complete() {
            return None;
        }
        Some(KeyframeFrames {
            start_points: self.start_points.clone(),
            destinations: self.destinations.iter().flatten().cloned().collect(),
            duration: self.duration.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::parse_layers;

    fn two_layers() -> Vec<LayerSpec> {
        parse_layers("url(a.png), url(b.png)", "auto", "center top, 5px 6px").unwrap()
    }

    #[test]
    fn test_new_plan_seeds_start_points() {
        let plan = AnimationPlan::new(&two_layers(), "10s");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.start_points(), &["center top".to_string(), "5px 6px".to_string()]);
        assert!(!plan.is_complete());
        assert!(plan.frames().is_none());
    }

    #[test]
    fn test_complete_after_every_slot() {
        let mut plan = AnimationPlan::new(&two_layers(), "10s");
        plan.settle(1, "5px 6px", "105px 6px").unwrap();
        assert!(!plan.is_complete());
        plan.settle_failed(0).unwrap();
        assert!(plan.is_complete());

        let frames = plan.frames().unwrap();
        assert_eq!(frames.start_list(), "center top,5px 6px");
        assert_eq!(frames.destination_list(), "0px 0px,105px 6px");
        assert_eq!(frames.duration, "10s");
    }

    #[test]
    fn test_slot_written_once() {
        let mut plan = AnimationPlan::new(&two_layers(), "10s");
        plan.settle(0, "1px 1px", "2px 2px").unwrap();
        assert_eq!(plan.settle(0, "9px 9px", "9px 9px"), Err(PlanError::AlreadySettled(0)));
        assert_eq!(plan.settle_failed(0), Err(PlanError::AlreadySettled(0)));
        assert_eq!(plan.destination(0), Some("2px 2px"));
        assert_eq!(plan.start_points()[0], "1px 1px");
    }

    #[test]
    fn test_out_of_range() {
        let mut plan = AnimationPlan::new(&two_layers(), "10s");
        assert_eq!(plan.settle_failed(5), Err(PlanError::OutOfRange { index: 5, len: 2 }));
    }

    #[test]
    fn test_failed_layer_keeps_parsed_start() {
        let mut plan = AnimationPlan::new(&two_layers(), "10s");
        plan.settle_failed(0).unwrap();
        assert!(plan.is_settled(0));
        assert!(!plan.is_settled(1));
        assert_eq!(plan.start_points()[0], "center top");
        assert_eq!(plan.destination(0), Some(FALLBACK_DESTINATION));
    }
}
