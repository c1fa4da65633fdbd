//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use pns3_domain::render::DEFAULT_PRECISION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Most decimal places an `f64` can meaningfully show.
const MAX_PRECISION: usize = 17;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Decimal places for printed probabilities
    #[serde(default = "default_precision")]
    pub precision: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text report
    Text,
    /// JSON format
    Json,
    /// Table format
    Table,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".pns3").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults when absent.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        config.settings.validate()?;
        Ok(config)
    }
}

impl Settings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(CliError::Config(format!(
                "precision must be at most {}, got {}",
                MAX_PRECISION, self.precision
            )));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
            precision: DEFAULT_PRECISION,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}
