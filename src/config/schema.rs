//! Configuration schema types for `everlax.toml`
//!
//! Defines the structure and validation rules for everlax configuration.

use serde::{Deserialize, Serialize};

use crate::duration::CssDuration;
use crate::element::{DEFAULT_ATTRIBUTE_PREFIX, DEFAULT_DIRECTION, DEFAULT_DURATION};
use crate::emitter::{DEFAULT_RULE_PREFIX, VENDOR_PREFIXES};

/// Fallback animation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Travel angle in degrees
    #[serde(default = "default_direction")]
    pub direction: i32,
    /// Duration of one tile of travel
    #[serde(default = "default_duration")]
    pub duration: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { direction: default_direction(), duration: default_duration() }
    }
}

fn default_direction() -> i32 {
    DEFAULT_DIRECTION
}

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

/// Generated rule settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Stem of generated rule/class names
    #[serde(default = "default_rule_prefix")]
    pub rule_prefix: String,
    /// Vendor prefixes each rule is declared with
    #[serde(default = "default_vendor_prefixes")]
    pub vendor_prefixes: Vec<String>,
    /// Prefix of per-element option attributes
    #[serde(default = "default_attribute_prefix")]
    pub attribute_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            rule_prefix: default_rule_prefix(),
            vendor_prefixes: default_vendor_prefixes(),
            attribute_prefix: default_attribute_prefix(),
        }
    }
}

fn default_rule_prefix() -> String {
    DEFAULT_RULE_PREFIX.to_string()
}

fn default_vendor_prefixes() -> Vec<String> {
    VENDOR_PREFIXES.iter().map(|p| p.to_string()).collect()
}

fn default_attribute_prefix() -> String {
    DEFAULT_ATTRIBUTE_PREFIX.to_string()
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EverlaxConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// A configuration problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl EverlaxConfig {
    /// Check the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Err(e) = CssDuration::parse(&self.defaults.duration) {
            issues.push(ConfigIssue {
                field: "defaults.duration".to_string(),
                message: e.to_string(),
            });
        }

        if self.output.rule_prefix.is_empty() {
            issues.push(ConfigIssue {
                field: "output.rule_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        } else if !is_css_identifier(&self.output.rule_prefix) {
            issues.push(ConfigIssue {
                field: "output.rule_prefix".to_string(),
                message: format!("'{}' is not a valid CSS identifier", self.output.rule_prefix),
            });
        }

        if self.output.vendor_prefixes.is_empty() {
            issues.push(ConfigIssue {
                field: "output.vendor_prefixes".to_string(),
                message: "at least one prefix is required (use \"\" for unprefixed)".to_string(),
            });
        }

        if self.output.attribute_prefix.trim().is_empty() {
            issues.push(ConfigIssue {
                field: "output.attribute_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        issues
    }
}

/// Check that `name` can start a CSS class/keyframes name: a letter,
/// underscore or hyphen first, then letters, digits, `_` or `-`.
fn is_css_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
