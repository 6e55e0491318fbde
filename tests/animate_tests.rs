//! Integration tests for animating element backgrounds end to end.
//!
//! Drives `Everlax::animate` with in-memory elements, stylesheets and probes,
//! including probes that complete out of dispatch order.

use std::collections::HashMap;

use everlax::emitter::AnimationEmitter;
use everlax::geometry::Size;
use everlax::probe::ProbeError;
use everlax::{
    AnimationOptions, CssStyleSheet, Everlax, ImageProbe, RuleCounter, StaticElement, StaticProbe,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use serial_test::serial;

/// Image source whose answer arrives after a number of scheduler yields.
struct DelayedProbe {
    images: HashMap<String, (Option<Size>, usize)>,
}

impl DelayedProbe {
    fn new() -> Self {
        Self { images: HashMap::new() }
    }

    fn with_image(mut self, source: &str, width: i64, height: i64, yields: usize) -> Self {
        self.images.insert(source.to_string(), (Some(Size::new(width, height)), yields));
        self
    }

    fn with_missing(mut self, source: &str, yields: usize) -> Self {
        self.images.insert(source.to_string(), (None, yields));
        self
    }
}

impl ImageProbe for DelayedProbe {
    fn probe<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<Size, ProbeError>> {
        async move {
            let (size, yields) = self.images.get(source).copied().unwrap_or((None, 1));
            for _ in 0..yields {
                tokio::task::yield_now().await;
            }
            size.ok_or_else(|| ProbeError::NotFound(source.to_string()))
        }
        .boxed()
    }
}

fn two_layer_element() -> StaticElement {
    StaticElement::new(300, 300)
        .with_style("background-image", "url(a.png), url(b.png)")
        .with_style("background-size", "auto, auto")
        .with_style("background-position", "10px 20px, 0px 0px")
}

#[tokio::test]
async fn test_single_failed_layer_stays_still() {
    let counter = RuleCounter::new(1);
    let everlax = Everlax::new().with_emitter(AnimationEmitter::new(&counter));
    let mut element =
        StaticElement::new(200, 200).with_style("background-image", "url(missing.png)");
    let mut sheet = CssStyleSheet::new();

    let emitted = everlax
        .animate(&mut element, &AnimationOptions::new(), &StaticProbe::new(), &mut sheet)
        .await
        .expect("duration is valid")
        .expect("layer present");

    assert_eq!(emitted.frames.start_points, vec!["0px 0px"]);
    assert_eq!(emitted.frames.destinations, vec!["0px 0px"]);
    assert_eq!(emitted.frames.duration, "10s");
    assert_eq!(element.classes(), &["everlax1".to_string()]);
}

#[tokio::test]
async fn test_layer_order_independent_of_completion_order() {
    let options = AnimationOptions::new().direction(90);
    let mut outcomes = Vec::new();

    // First layer slow, then second layer slow
    for (yields_a, yields_b) in [(8, 0), (0, 8)] {
        let counter = RuleCounter::new(1);
        let everlax = Everlax::new().with_emitter(AnimationEmitter::new(&counter));
        let probe = DelayedProbe::new()
            .with_image("a.png", 100, 50, yields_a)
            .with_image("b.png", 40, 40, yields_b);
        let mut element = two_layer_element();
        let mut sheet = CssStyleSheet::new();

        let emitted = everlax
            .animate(&mut element, &options, &probe, &mut sheet)
            .await
            .unwrap()
            .expect("animation emitted");
        outcomes.push(emitted.frames);
    }

    assert_eq!(outcomes[0], outcomes[1]);
    assert_eq!(outcomes[0].start_points, vec!["10px 20px", "0px 0px"]);
    assert_eq!(outcomes[0].destinations, vec!["10px 70px", "0px 40px"]);
}

#[tokio::test]
async fn test_partial_failure_keeps_other_layers_moving() {
    let options = AnimationOptions::new().direction(90);

    // Loaded layer settles last, then first
    for (yields_loaded, yields_missing) in [(8, 0), (0, 8)] {
        let counter = RuleCounter::new(1);
        let everlax = Everlax::new().with_emitter(AnimationEmitter::new(&counter));
        let probe = DelayedProbe::new()
            .with_image("a.png", 100, 100, yields_loaded)
            .with_missing("b.png", yields_missing);
        let mut element = two_layer_element();
        let mut sheet = CssStyleSheet::new();

        let emitted = everlax
            .animate(&mut element, &options, &probe, &mut sheet)
            .await
            .unwrap()
            .expect("animation emitted once both layers settle");

        assert_eq!(emitted.frames.start_points, vec!["10px 20px", "0px 0px"]);
        // Straight down by exactly one 100px tile
        assert_eq!(emitted.frames.destinations, vec!["10px 120px", "0px 0px"]);
        assert_eq!(sheet.rules().len(), 7);
        assert_eq!(counter.peek(), 2);
    }
}

#[tokio::test]
async fn test_oblique_direction_scales_duration() {
    let counter = RuleCounter::new(1);
    let everlax = Everlax::new().with_emitter(AnimationEmitter::new(&counter));
    let probe = StaticProbe::new().with_image("tile.png", 100, 100);
    let mut element = StaticElement::new(400, 400)
        .with_style("background-image", "url(tile.png)")
        .with_attribute("data-everlax-direction", "10")
        .with_attribute("data-everlax-duration", " 2s ");
    let mut sheet = CssStyleSheet::new();

    let emitted = everlax
        .animate(&mut element, &AnimationOptions::new(), &probe, &mut sheet)
        .await
        .unwrap()
        .expect("animation emitted");

    // 10 degrees travels 5 tiles across and one tile down
    assert_eq!(emitted.frames.duration, "10s");
    assert_eq!(emitted.frames.destinations, vec!["500px 100px"]);
    assert!(sheet.to_css().contains("animation: everlax1 10s infinite linear;"));
}

#[tokio::test]
async fn test_call_options_override_attributes() {
    let counter = RuleCounter::new(1);
    let everlax = Everlax::new().with_emitter(AnimationEmitter::new(&counter));
    let probe = StaticProbe::new().with_image("tile.png", 64, 32);
    let mut element = StaticElement::new(128, 128)
        .with_style("background-image", "url(tile.png)")
        .with_attribute("data-everlax-direction", "90")
        .with_attribute("data-everlax-duration", "4s");
    let mut sheet = CssStyleSheet::new();
    let options = AnimationOptions::new().direction(180).duration("500ms");

    let emitted =
        everlax.animate(&mut element, &options, &probe, &mut sheet).await.unwrap().unwrap();

    assert_eq!(emitted.frames.duration, "500ms");
    assert_eq!(emitted.frames.destinations, vec!["-64px 0px"]);
}

#[tokio::test]
async fn test_rejected_vendor_variants_do_not_block_emission() {
    let counter = RuleCounter::new(1);
    let everlax = Everlax::new().with_emitter(AnimationEmitter::new(&counter));
    let probe = StaticProbe::new().with_image("tile.png", 50, 50);
    let mut element = StaticElement::new(100, 100).with_style("background-image", "url(tile.png)");
    let mut sheet = CssStyleSheet::accepting(&["-moz-"]);

    let emitted = everlax
        .animate(&mut element, &AnimationOptions::new(), &probe, &mut sheet)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(emitted.accepted_prefixes, vec!["-moz-".to_string()]);
    // One keyframes variant plus the class rule
    assert_eq!(sheet.rules().len(), 2);
    assert_eq!(element.classes(), &["everlax1".to_string()]);
}

#[tokio::test]
#[serial]
async fn test_global_counter_names_every_invocation() {
    RuleCounter::global().reset(1);
    let everlax = Everlax::new();
    let probe = StaticProbe::new().with_image("tile.png", 10, 10);
    let mut element = StaticElement::new(100, 100).with_style("background-image", "url(tile.png)");
    let mut sheet = CssStyleSheet::new();

    let first = everlax
        .animate(&mut element, &AnimationOptions::new(), &probe, &mut sheet)
        .await
        .unwrap()
        .unwrap();
    let second = everlax
        .animate(&mut element, &AnimationOptions::new(), &probe, &mut sheet)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.name, "everlax1");
    assert_eq!(second.name, "everlax2");
    assert_eq!(element.classes(), &["everlax1".to_string(), "everlax2".to_string()]);
    assert_eq!(RuleCounter::global().peek(), 3);
}

#[tokio::test]
#[serial]
async fn test_no_layers_leaves_global_counter_untouched() {
    RuleCounter::global().reset(1);
    let everlax = Everlax::new();
    let mut element = StaticElement::new(100, 100)
        .with_style("background-image", "linear-gradient(red, blue)");
    let mut sheet = CssStyleSheet::new();

    let result = everlax
        .animate(&mut element, &AnimationOptions::new(), &StaticProbe::new(), &mut sheet)
        .await;

    assert_eq!(result, Ok(None));
    assert_eq!(RuleCounter::global().peek(), 1);
    assert!(sheet.rules().is_empty());
}
