//! Keyframe rule emission
//!
//! Turns finished [`KeyframeFrames`] into a uniquely named `@keyframes` rule
//! plus a class binding it, and inserts them into a [`StyleSheet`].
//!
//! Every vendor prefixed variant is inserted on its own: a stylesheet that
//! rejects `@-khtml-keyframes` still receives `@-webkit-keyframes` and the
//! unprefixed rule.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::plan::KeyframeFrames;

/// Vendor prefixes each rule is declared with, unprefixed last
pub const VENDOR_PREFIXES: [&str; 6] = ["-webkit-", "-khtml-", "-moz-", "-ms-", "-o-", ""];

/// Default stem for generated rule and class names
pub const DEFAULT_RULE_PREFIX: &str = "everlax";

static GLOBAL_COUNTER: RuleCounter = RuleCounter::new(1);

/// Monotonic source of rule name suffixes.
///
/// [`RuleCounter::global`] lives for the whole process; tests and embedders
/// can construct their own or reset it.
#[derive(Debug)]
pub struct RuleCounter {
    next: AtomicU64,
}

impl RuleCounter {
    pub const fn new(start: u64) -> Self {
        Self { next: AtomicU64::new(start) }
    }

    /// The process-wide counter
    pub fn global() -> &'static RuleCounter {
        &GLOBAL_COUNTER
    }

    /// Take the next value
    pub fn next_value(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The value the next call to [`RuleCounter::next_value`] returns
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }

    /// Restart the sequence at `start`
    pub fn reset(&self, start: u64) {
        self.next.store(start, Ordering::Relaxed);
    }
}

impl Default for RuleCounter {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Stylesheet rejected a rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StyleSheetError {
    #[error("rule rejected ({reason}): {rule}")]
    Rejected { rule: String, reason: String },
}

/// Destination for generated rules.
pub trait StyleSheet {
    fn insert_rule(&mut self, rule: &str) -> Result<(), StyleSheetError>;
}

/// In-memory stylesheet.
///
/// Rules are kept most recent first, the order `insertRule(rule, 0)`
/// produces. An accept list of vendor prefixes makes it reject any
/// `@<prefix>keyframes` rule whose prefix is not listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CssStyleSheet {
    rules: Vec<String>,
    accepted_prefixes: Option<Vec<String>>,
}

impl CssStyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stylesheet that only understands the given keyframes prefixes
    pub fn accepting(prefixes: &[&str]) -> Self {
        Self {
            rules: Vec::new(),
            accepted_prefixes: Some(prefixes.iter().map(|p| p.to_string()).collect()),
        }
    }

    /// Rules in stylesheet order
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Render every rule, one per line
    pub fn to_css(&self) -> String {
        let mut css = self.rules.join("\n");
        if !css.is_empty() {
            css.push('\n');
        }
        css
    }
}

impl StyleSheet for CssStyleSheet {
    fn insert_rule(&mut self, rule: &str) -> Result<(), StyleSheetError> {
        if let (Some(accepted), Some(prefix)) = (&self.accepted_prefixes, keyframes_prefix(rule)) {
            if !accepted.iter().any(|a| a == prefix) {
                return Err(StyleSheetError::Rejected {
                    rule: rule.to_string(),
                    reason: format!("unsupported at-rule prefix '{}'", prefix),
                });
            }
        }
        self.rules.insert(0, rule.to_string());
        Ok(())
    }
}

/// The vendor prefix of an `@...keyframes` rule, if `rule` is one.
fn keyframes_prefix(rule: &str) -> Option<&str> {
    let at_rule = rule.trim_start().strip_prefix('@')?;
    let name_end = at_rule.find(char::is_whitespace).unwrap_or(at_rule.len());
    at_rule[..name_end].strip_suffix("keyframes")
}

/// Build the `@keyframes` rule for one vendor prefix.
pub fn keyframes_rule(vendor: &str, name: &str, frames: &KeyframeFrames) -> String {
    format!(
        "@{}keyframes {} {{ 0% {{ background-position: {}; }} 100% {{ background-position: {}; }} }}",
        vendor,
        name,
        frames.start_list(),
        frames.destination_list()
    )
}

/// Build the class rule applying animation `name` with every vendor prefix.
pub fn class_rule(name: &str, duration: &str, vendors: &[String]) -> String {
    let declarations: Vec<String> = vendors
        .iter()
        .map(|vendor| format!("{}animation: {} {} infinite linear;", vendor, name, duration))
        .collect();
    format!(".{} {{ {} }}", name, declarations.join(" "))
}

/// Result of emitting one animation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedRule {
    /// Rule and class name, e.g. `everlax3`
    pub name: String,
    /// Vendor prefixes whose keyframes rule the stylesheet accepted
    pub accepted_prefixes: Vec<String>,
    /// The frames the rule animates between
    pub frames: KeyframeFrames,
}

/// Writes keyframe rules for finished frames.
#[derive(Debug, Clone)]
pub struct AnimationEmitter<'c> {
    counter: &'c RuleCounter,
    rule_prefix: String,
    vendor_prefixes: Vec<String>,
}

impl AnimationEmitter<'static> {
    /// Emitter drawing names from the process-wide counter
    pub fn global() -> Self {
        Self::new(RuleCounter::global())
    }
}

impl<'c> AnimationEmitter<'c> {
    pub fn new(counter: &'c RuleCounter) -> Self {
        Self {
            counter,
            rule_prefix: DEFAULT_RULE_PREFIX.to_string(),
            vendor_prefixes: VENDOR_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Use `prefix` as the stem of generated names
    pub fn with_rule_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rule_prefix = prefix.into();
        self
    }

    /// Declare rules with these vendor prefixes instead of [`VENDOR_PREFIXES`]
    pub fn with_vendor_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.vendor_prefixes = prefixes;
        self
    }

    /// Allocate a fresh rule name
    pub fn next_name(&self) -> String {
        format!("{}{}", self.rule_prefix, self.counter.next_value())
    }

    /// Insert the keyframes (once per vendor prefix) and the class rule.
    pub fn emit<S: StyleSheet + ?Sized>(
        &self,
        sheet: &mut S,
        frames: &KeyframeFrames,
    ) -> EmittedRule {
        let name = self.next_name();
        let mut accepted_prefixes = Vec::new();

        for vendor in &self.vendor_prefixes {
            match sheet.insert_rule(&keyframes_rule(vendor, &name, frames)) {
                Ok(()) => accepted_prefixes.push(vendor.clone()),
                Err(e) => debug!(vendor = %vendor, error = %e, "keyframes variant not accepted"),
            }
        }

        let class = class_rule(&name, &frames.duration, &self.vendor_prefixes);
        if let Err(e) = sheet.insert_rule(&class) {
            warn!(rule = %name, error = %e, "class rule not accepted");
        }

        info!(
            rule = %name,
            layers = frames.start_points.len(),
            duration = %frames.duration,
            "emitted animation"
        );
        EmittedRule { name, accepted_prefixes, frames: frames.clone() }
    }
}
