//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod direction;
mod generate;

use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

pub use generate::GenerateArgs;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Everlax - generate seamless drifting background animations
#[derive(Parser)]
#[command(name = "everlax")]
#[command(about = "Everlax - generate seamless drifting background keyframes")]
#[command(version)]
pub struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the keyframes and class rule for one element's background
    Generate(GenerateArgs),

    /// Show the travel vector and iteration count for an angle
    Direction {
        /// Angle in degrees (0 = right, 90 = down)
        #[arg(allow_negative_numbers = true)]
        angle: f64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Output format for generated rules
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Stylesheet text
    #[default]
    Css,
    /// Rule name, frames and stylesheet rules as JSON
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `level`.
fn init_logging(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .to_string()
                .parse()
                .unwrap_or_else(|_| tracing::level_filters::LevelFilter::WARN.into()),
        )
        .from_env_lossy();

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // A subscriber may already be installed when embedded; keep it
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.compact().try_init(),
    };
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format);

    match cli.command {
        Commands::Generate(args) => generate::run_generate(&args),
        Commands::Direction { angle, json } => direction::run_direction(angle, json),
    }
}
