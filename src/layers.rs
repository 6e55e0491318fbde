//! Background layer parsing
//!
//! Splits the comma separated `background-image`, `background-size` and
//! `background-position` values into one [`LayerSpec`] per image layer.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Size used when a layer has no (or a blank) `background-size` entry
pub const DEFAULT_SIZE: &str = "auto";

/// Position used when a layer has no (or a blank) `background-position` entry
pub const DEFAULT_POSITION: &str = "0px 0px";

/// A pair of per-axis tokens, horizontal first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisPair {
    pub x: String,
    pub y: String,
}

impl AxisPair {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self { x: x.into(), y: y.into() }
    }
}

impl fmt::Display for AxisPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// One background layer: its image plus normalized size and position tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Image source as written inside `url(...)`
    pub image_source: String,
    /// `background-size` tokens
    pub size: AxisPair,
    /// `background-position` tokens, keyword order already normalized
    pub position: AxisPair,
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).expect("url pattern is valid")
    })
}

/// Extract every well-formed `url(...)` source from a `background-image` value.
///
/// Gradients and other non-url images are skipped.
pub fn extract_image_urls(background_image: &str) -> Vec<String> {
    url_pattern()
        .captures_iter(background_image)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split a CSS list on commas that are not nested inside parentheses.
pub fn split_top_level(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);

    parts
}

/// Parse one `background-size` entry. A single token sizes the width and
/// leaves the height `auto` so the image keeps its aspect ratio.
pub fn parse_size_entry(entry: &str) -> AxisPair {
    let mut tokens = entry.split_whitespace();
    let x = tokens.next().unwrap_or(DEFAULT_SIZE);
    let y = tokens.next().unwrap_or(DEFAULT_SIZE);
    AxisPair::new(x, y)
}

/// Parse one `background-position` entry.
///
/// Keyword positions may be written vertical-first (`top left`); such pairs
/// are transposed so the horizontal token always comes first. A single token
/// centers the other axis, as CSS does.
pub fn parse_position_entry(entry: &str) -> AxisPair {
    let mut tokens = entry.split_whitespace();
    let first = tokens.next().unwrap_or("0px");
    let second = tokens.next().unwrap_or("center");

    let first_is_vertical = matches!(first.to_lowercase().as_str(), "top" | "bottom");
    let second_is_horizontal = matches!(second.to_lowercase().as_str(), "left" | "right");

    if first_is_vertical || second_is_horizontal {
        AxisPair::new(second, first)
    } else {
        AxisPair::new(first, second)
    }
}

/// Parse the three background properties into per-layer specs.
///
/// The layer count is the number of image urls found. Size and position
/// lists are padded (or blank entries replaced) with [`DEFAULT_SIZE`] and
/// [`DEFAULT_POSITION`]. Extra size/position entries are ignored.
///
/// Returns `None` when there are no image layers at all.
///
/// # Example
///
/// ```
/// use everlax::layers::parse_layers;
///
/// let layers = parse_layers("url(a.png), url(b.png)", "50% auto", "top left").unwrap();
/// assert_eq!(layers.len(), 2);
/// assert_eq!(layers[0].position.to_string(), "left top");
/// assert_eq!(layers[1].position.to_string(), "0px 0px");
/// ```
pub fn parse_layers(
    background_image: &str,
    background_size: &str,
    background_position: &str,
) -> Option<Vec<LayerSpec>> {
    let images = extract_image_urls(background_image);
    if images.is_empty() {
        return None;
    }

    let sizes = split_top_level(background_size);
    let positions = split_top_level(background_position);

    let layers = images
        .into_iter()
        .enumerate()
        .map(|(i, image_source)| {
            let size = entry_or_default(&sizes, i, DEFAULT_SIZE);
            let position = entry_or_default(&positions, i, DEFAULT_POSITION);
            LayerSpec {
                image_source,
                size: parse_size_entry(size),
                position: parse_position_entry(position),
            }
        })
        .collect();

    Some(layers)
}

fn entry_or_default<'a>(entries: &[&'a str], index: usize, default: &'a str) -> &'a str {
    match entries.get(index).map(|e| e.trim()) {
        Some(e) if !e.is_empty() => e,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_url() {
        assert_eq!(extract_image_urls("url(stars.png)"), vec!["stars.png"]);
    }

    #[test]
    fn test_extract_quoted_urls() {
        let urls = extract_image_urls(r#"url("a.png"), url('b.png'), URL( c.png )"#);
        assert_eq!(urls, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_extract_skips_gradients() {
        let urls = extract_image_urls("linear-gradient(red, blue), url(clouds.png)");
        assert_eq!(urls, vec!["clouds.png"]);
    }

    #[test]
    fn test_extract_none() {
        assert!(extract_image_urls("none").is_empty());
        assert!(extract_image_urls("").is_empty());
        assert!(extract_image_urls("url()").is_empty());
    }

    #[test]
    fn test_split_top_level_respects_parens() {
        let parts = split_top_level("calc(1px, 2px) 0px, 5px 5px");
        assert_eq!(parts, vec!["calc(1px, 2px) 0px", " 5px 5px"]);
    }

    #[test]
    fn test_parse_layers_no_images() {
        assert!(parse_layers("none", "auto", "0px 0px").is_none());
        assert!(parse_layers("", "", "").is_none());
    }

    #[test]
    fn test_parse_layers_pads_short_lists() {
        let layers =
            parse_layers("url(a.png), url(b.png), url(c.png)", "100px 50px", "10px 20px").unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].size, AxisPair::new("100px", "50px"));
        assert_eq!(layers[0].position, AxisPair::new("10px", "20px"));
        for layer in &layers[1..] {
            assert_eq!(layer.size, AxisPair::new("auto", "auto"));
            assert_eq!(layer.position, AxisPair::new("0px", "0px"));
        }
        assert_eq!(layers[2].image_source, "c.png");
    }

    #[test]
    fn test_parse_layers_blank_entries_default() {
        let layers = parse_layers("url(a.png), url(b.png)", " , 20px", "  ,").unwrap();
        assert_eq!(layers[0].size, AxisPair::new("auto", "auto"));
        assert_eq!(layers[1].size, AxisPair::new("20px", "auto"));
        assert_eq!(layers[0].position.to_string(), DEFAULT_POSITION);
        assert_eq!(layers[1].position.to_string(), DEFAULT_POSITION);
    }

    #[test]
    fn test_parse_layers_ignores_extra_entries() {
        let layers = parse_layers("url(a.png)", "10px, 20px, 30px", "1px 1px, 2px 2px").unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].size.x, "10px");
    }

    #[test]
    fn test_size_single_token_defaults_height_auto() {
        assert_eq!(parse_size_entry("50%"), AxisPair::new("50%", "auto"));
        assert_eq!(parse_size_entry("auto"), AxisPair::new("auto", "auto"));
    }

    #[test]
    fn test_position_keyword_swap() {
        assert_eq!(parse_position_entry("top left"), AxisPair::new("left", "top"));
        assert_eq!(parse_position_entry("bottom right"), AxisPair::new("right", "bottom"));
        assert_eq!(parse_position_entry("top 10px"), AxisPair::new("10px", "top"));
        assert_eq!(parse_position_entry("10px left"), AxisPair::new("left", "10px"));
    }

    #[test]
    fn test_position_no_swap() {
        assert_eq!(parse_position_entry("left top"), AxisPair::new("left", "top"));
        assert_eq!(parse_position_entry("center bottom"), AxisPair::new("center", "bottom"));
        assert_eq!(parse_position_entry("5px 6px"), AxisPair::new("5px", "6px"));
    }

    #[test]
    fn test_position_single_token_centers_other_axis() {
        assert_eq!(parse_position_entry("right"), AxisPair::new("right", "center"));
        assert_eq!(parse_position_entry("top"), AxisPair::new("center", "top"));
    }
}
