//! Tool configuration for packwright.
//!
//! Two configuration file locations are supported:
//! - Global: `~/.packwright/config.toml` - User-wide defaults
//! - Project: `.packwright/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. These files tune
//! how packwright runs; the release itself is described in
//! `packwright.toml`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs::read_to_string;

/// packwright configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Validation settings
    pub validate: ValidateConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Validation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Validate (distribution, packager) pairs in parallel (None = yes)
    pub parallel: Option<bool>,

    /// Worker threads for parallel validation (None = one per core)
    pub jobs: Option<usize>,

    /// Treat warnings as errors
    #[serde(default)]
    pub strict: bool,
}

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an invalid output format.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid output format '{0}', valid values: human, json")]
pub struct OutputFormatParseError(pub String);

impl FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default report format
    pub format: Option<OutputFormat>,

    /// Colored terminal output (None = yes)
    pub color: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Validate settings
        if other.validate.parallel.is_some() {
            self.validate.parallel = other.validate.parallel;
        }
        if other.validate.jobs.is_some() {
            self.validate.jobs = other.validate.jobs;
        }
        if other.validate.strict {
            self.validate.strict = true;
        }

        // Output settings
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        if other.output.color.is_some() {
            self.output.color = other.output.color;
        }
    }

    pub fn parallel(&self) -> bool {
        self.validate.parallel.unwrap_or(true)
    }

    pub fn color(&self) -> bool {
        self.output.color.unwrap_or(true)
    }

    pub fn format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.packwright/config.toml)
/// 2. Global config (~/.packwright/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global packwright config directory (~/.packwright).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".packwright"))
}

/// Get the global config path (~/.packwright/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.packwright/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".packwright").join("config.toml")
}
