//! Activation settings.
//!
//! Every packager, repository and artifact carries an optional `Active`
//! value. An unset value inherits from its parent; once resolved it is
//! evaluated against the project to decide whether the owner runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::project::Project;

/// When a packager (or repository, or artifact) is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Active {
    /// Always active
    #[serde(alias = "ALWAYS")]
    Always,
    /// Never active
    #[serde(alias = "NEVER")]
    Never,
    /// Active for non-snapshot versions
    #[serde(alias = "RELEASE")]
    Release,
    /// Active for prerelease versions
    #[serde(alias = "PRERELEASE")]
    Prerelease,
    /// Active for either releases or prereleases
    #[serde(alias = "RELEASE_PRERELEASE", alias = "release_prerelease")]
    ReleasePrerelease,
    /// Active for snapshot versions only
    #[serde(alias = "SNAPSHOT")]
    Snapshot,
}

impl Active {
    pub fn as_str(&self) -> &'static str {
        match self {
            Active::Always => "always",
            Active::Never => "never",
            Active::Release => "release",
            Active::Prerelease => "prerelease",
            Active::ReleasePrerelease => "release-prerelease",
            Active::Snapshot => "snapshot",
        }
    }

    /// Evaluate this setting against the project version.
    pub fn check(&self, project: &Project) -> bool {
        match self {
            Active::Always => true,
            Active::Never => false,
            Active::Release => project.is_release(),
            Active::Prerelease => project.is_prerelease(),
            Active::ReleasePrerelease => project.is_release() || project.is_prerelease(),
            Active::Snapshot => project.is_snapshot(),
        }
    }
}

impl fmt::Display for Active {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an invalid activation value.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid active value '{0}', valid values: always, never, release, prerelease, release-prerelease, snapshot")]
pub struct ActiveParseError(pub String);

impl FromStr for Active {
    type Err = ActiveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "always" => Ok(Active::Always),
            "never" => Ok(Active::Never),
            "release" => Ok(Active::Release),
            "prerelease" => Ok(Active::Prerelease),
            "release-prerelease" => Ok(Active::ReleasePrerelease),
            "snapshot" => Ok(Active::Snapshot),
            _ => Err(ActiveParseError(s.to_string())),
        }
    }
}

/// Child value if set, otherwise the parent's.
pub fn inherit_active(child: Option<Active>, parent: Option<Active>) -> Option<Active> {
    child.or(parent)
}
