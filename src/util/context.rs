//! Global context for packwright operations.
//!
//! Provides centralized access to the working directory, the model file
//! and the merged tool configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::model::{find_model, MODEL_FILE};
use crate::util::config::{global_config_path, load_config, project_config_path, Config};
use crate::util::diagnostic::suggestions;

/// Global context for packwright operations.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Explicit model file (`--config`)
    model_override: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            model_override: None,
            verbose: false,
            color: true,
        }
    }

    /// Use an explicit model file instead of searching for one.
    pub fn with_model(mut self, path: Option<PathBuf>) -> Self {
        self.model_override = path.map(|p| if p.is_absolute() { p } else { self.cwd.join(p) });
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Locate the model file: `--config`, else the nearest `packwright.toml`.
    pub fn model_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.model_override {
            if !path.exists() {
                bail!("model file not found: {}", path.display());
            }
            return Ok(path.clone());
        }

        match find_model(&self.cwd) {
            Some(path) => Ok(path),
            None => bail!(
                "could not find `{}` in `{}` or any parent directory\n\n{}",
                MODEL_FILE,
                self.cwd.display(),
                suggestions::NO_CONFIG
            ),
        }
    }

    /// Directory holding the model file, or the working directory.
    pub fn project_root(&self) -> PathBuf {
        self.model_path()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Merged global and project tool configuration.
    pub fn config(&self) -> Config {
        let project = project_config_path(&self.project_root());
        match global_config_path() {
            Some(global) => load_config(&global, &project),
            None => Config::load_or_default(&project),
        }
    }
}
