//! Configuration loading and discovery for `everlax.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::EverlaxConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "everlax.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse everlax.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override default direction
    pub direction: Option<i32>,
    /// Override default duration
    pub duration: Option<String>,
    /// Override rule name stem
    pub rule_prefix: Option<String>,
    /// Override vendor prefixes
    pub vendor_prefixes: Option<Vec<String>>,
}

/// Find everlax.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find everlax.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an everlax.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("site/everlax.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<EverlaxConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(EverlaxConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<EverlaxConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: EverlaxConfig = toml::from_str(&contents)?;
    check(&config)?;
    Ok(config)
}

fn check(config: &EverlaxConfig) -> Result<(), ConfigError> {
    let issues = config.validate();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(issues.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Merge CLI overrides into a configuration, then re-validate it.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(
    config: &mut EverlaxConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(direction) = overrides.direction {
        config.defaults.direction = direction;
    }

    if let Some(ref duration) = overrides.duration {
        config.defaults.duration = duration.clone();
    }

    if let Some(ref prefix) = overrides.rule_prefix {
        config.output.rule_prefix = prefix.clone();
    }

    if let Some(ref prefixes) = overrides.vendor_prefixes {
        config.output.vendor_prefixes = prefixes.clone();
    }

    check(config)
}
