//! Stylesheet post-processing
//!
//! Re-parses generated CSS with lightningcss, which both checks that the
//! rules are well formed and produces a minified copy.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use thiserror::Error;

/// Error from parsing or printing a stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssError {
    #[error("CSS parse error: {0}")]
    Parse(String),
    #[error("CSS print error: {0}")]
    Print(String),
}

/// Parse `css` and print it back minified.
///
/// # Example
///
/// ```
/// use everlax::css::minify_css;
///
/// let css = minify_css(".a { animation: a 10s infinite linear; }").unwrap();
/// assert!(css.starts_with(".a{"));
/// ```
pub fn minify_css(css: &str) -> Result<String, CssError> {
    let sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| CssError::Parse(e.to_string()))?;
    let printed = sheet
        .to_css(PrinterOptions { minify: true, ..PrinterOptions::default() })
        .map_err(|e| CssError::Print(e.to_string()))?;
    Ok(printed.code)
}

/// Check that `css` parses as a stylesheet.
pub fn validate_css(css: &str) -> Result<(), CssError> {
    StyleSheet::parse(css, ParserOptions::default())
        .map(|_| ())
        .map_err(|e| CssError::Parse(e.to_string()))
}
