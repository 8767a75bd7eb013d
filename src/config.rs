//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.forminsight.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE: &str = ".forminsight.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Insight generation settings.
    #[serde(default)]
    pub insights: InsightsConfig,

    /// Share view settings.
    #[serde(default)]
    pub share: ShareConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding the form store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Public origin that share links point at.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            base_url: default_base_url(),
            verbose: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".forminsight")
}

fn default_base_url() -> String {
    "http://localhost:5173".to_string()
}

/// Insight generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Pause before insights are shown, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

impl InsightsConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_delay_ms() -> u64 {
    2000
}

/// QR code rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Minimum SVG size in pixels.
    #[serde(default = "default_svg_size")]
    pub svg_size: u32,

    /// Draw the quiet zone around codes.
    #[serde(default = "default_true")]
    pub quiet_zone: bool,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            svg_size: default_svg_size(),
            quiet_zone: true,
        }
    }
}

fn default_svg_size() -> u32 {
    256
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data_dir) = args.data_dir {
            self.general.data_dir = data_dir.clone();
        }
        if let Some(ref base_url) = args.base_url {
            self.general.base_url = base_url.clone();
        }
        if let Some(delay_ms) = args.delay_ms {
            self.insights.delay_ms = delay_ms;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level after merging: quiet wins over verbose from either source.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
