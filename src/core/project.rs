//! Project context used to evaluate activation settings.

use std::sync::LazyLock;

use regex::Regex;

/// Default pattern identifying snapshot versions.
pub const DEFAULT_SNAPSHOT_PATTERN: &str = ".*-SNAPSHOT";

static DEFAULT_SNAPSHOT: LazyLock<Regex> = LazyLock::new(|| {
    full_match(DEFAULT_SNAPSHOT_PATTERN).expect("default snapshot pattern is valid")
});

fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// The project being released.
#[derive(Debug, Clone)]
pub struct Project {
    /// Project name
    pub name: String,

    /// Project version as declared
    pub version: String,

    snapshot_pattern: Regex,

    prerelease_enabled: Option<bool>,

    prerelease_pattern: Option<Regex>,
}

impl Project {
    /// Create a project with the default snapshot pattern.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            version: version.into(),
            snapshot_pattern: DEFAULT_SNAPSHOT.clone(),
            prerelease_enabled: None,
            prerelease_pattern: None,
        }
    }

    /// Replace the snapshot pattern. The pattern must match the whole version.
    pub fn with_snapshot_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.snapshot_pattern = full_match(pattern)?;
        Ok(self)
    }

    /// Force prerelease detection on or off.
    pub fn with_prerelease(mut self, enabled: bool) -> Self {
        self.prerelease_enabled = Some(enabled);
        self
    }

    /// Detect prereleases with a pattern instead of semver identifiers.
    pub fn with_prerelease_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.prerelease_pattern = Some(full_match(pattern)?);
        Ok(self)
    }

    /// Whether the version is a snapshot.
    pub fn is_snapshot(&self) -> bool {
        self.snapshot_pattern.is_match(&self.version)
    }

    /// Whether the version is a release (anything that is not a snapshot).
    pub fn is_release(&self) -> bool {
        !self.is_snapshot()
    }

    /// Whether the version is a prerelease.
    ///
    /// An explicit flag wins, then the prerelease pattern, then semver
    /// pre-release identifiers. Snapshots are never prereleases.
    pub fn is_prerelease(&self) -> bool {
        if self.is_snapshot() {
            return false;
        }
        if let Some(enabled) = self.prerelease_enabled {
            return enabled;
        }
        if let Some(ref pattern) = self.prerelease_pattern {
            return pattern.is_match(&self.version);
        }
        semver::Version::parse(self.version.trim_start_matches('v'))
            .map(|v| !v.pre.is_empty())
            .unwrap_or(false)
    }
}
