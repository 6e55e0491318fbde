//! Generate command implementation

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use crate::animate::Everlax;
use crate::config::{load_config, merge_cli_overrides, CliOverrides};
use crate::css::{minify_css, validate_css};
use crate::element::{AnimationOptions, StaticElement};
use crate::emitter::{CssStyleSheet, EmittedRule, RuleCounter};
use crate::probe::FileProbe;

use super::{OutputFormat, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Computed `background-image` value, e.g. "url(stars.png), url(dust.png)"
    #[arg(long)]
    pub image: String,

    /// Computed `background-size` value
    #[arg(long, default_value = "")]
    pub size: String,

    /// Computed `background-position` value
    #[arg(long, default_value = "")]
    pub position: String,

    /// Rendered element width in pixels
    #[arg(long)]
    pub width: i64,

    /// Rendered element height in pixels
    #[arg(long)]
    pub height: i64,

    /// Travel angle in degrees for this element
    #[arg(long, allow_negative_numbers = true)]
    pub direction: Option<i32>,

    /// Duration of one tile of travel for this element (e.g. "10s", "500ms")
    #[arg(long)]
    pub duration: Option<String>,

    /// Element attribute as NAME=VALUE (repeatable)
    #[arg(long = "attribute", value_name = "NAME=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,

    /// Fallback direction when neither option nor attribute sets one
    #[arg(long, allow_negative_numbers = true)]
    pub default_direction: Option<i32>,

    /// Fallback duration when neither option nor attribute sets one
    #[arg(long)]
    pub default_duration: Option<String>,

    /// Stem for generated rule and class names
    #[arg(long)]
    pub rule_prefix: Option<String>,

    /// Vendor prefix to declare rules with (repeatable, "" for unprefixed)
    #[arg(long = "vendor-prefix", allow_hyphen_values = true)]
    pub vendor_prefixes: Vec<String>,

    /// Directory relative image sources resolve against
    #[arg(long, default_value = ".")]
    pub base_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Css)]
    pub format: OutputFormat,

    /// Minify the generated stylesheet
    #[arg(long)]
    pub minify: bool,

    /// Path to everlax.toml (discovered from the current directory if omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

/// JSON output document
#[derive(Debug, Serialize)]
struct GenerateOutput<'a> {
    #[serde(flatten)]
    rule: &'a EmittedRule,
    rules: &'a [String],
}

/// Execute the generate command
pub fn run_generate(args: &GenerateArgs) -> ExitCode {
    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let overrides = CliOverrides {
        direction: args.default_direction,
        duration: args.default_duration.clone(),
        rule_prefix: args.rule_prefix.clone(),
        vendor_prefixes: if args.vendor_prefixes.is_empty() {
            None
        } else {
            Some(args.vendor_prefixes.clone())
        },
    };
    if let Err(e) = merge_cli_overrides(&mut config, &overrides) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let mut element = StaticElement::new(args.width, args.height)
        .with_style("background-image", args.image.as_str())
        .with_style("background-size", args.size.as_str())
        .with_style("background-position", args.position.as_str());
    for (name, value) in &args.attributes {
        element = element.with_attribute(name.as_str(), value.as_str());
    }

    let mut options = AnimationOptions::new();
    options.direction = args.direction;
    options.duration = args.duration.clone();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let everlax = Everlax::from_config(&config, RuleCounter::global());
    let probe = FileProbe::new(args.base_dir.clone());
    let mut sheet = CssStyleSheet::new();

    let emitted =
        match runtime.block_on(everlax.animate(&mut element, &options, &probe, &mut sheet)) {
            Ok(Some(rule)) => rule,
            Ok(None) => {
                warn!("no url() layers in --image, nothing generated");
                return ExitCode::from(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
    eprintln!("Generated class: {}", emitted.name);

    let output = match args.format {
        OutputFormat::Css if args.minify => match minify_css(&sheet.to_css()) {
            Ok(css) => css,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        },
        OutputFormat::Css => {
            let css = sheet.to_css();
            if let Err(e) = validate_css(&css) {
                eprintln!("Error: generated stylesheet is invalid: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
            css
        }
        OutputFormat::Json => {
            let document = GenerateOutput { rule: &emitted, rules: sheet.rules() };
            match serde_json::to_string_pretty(&document) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("Error: failed to serialize output: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        }
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    ExitCode::from(EXIT_SUCCESS)
}
