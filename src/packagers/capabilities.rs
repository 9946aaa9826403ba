//! Packager capability types - fixed facts about each backend.
//!
//! A `BackendSpec` is the per-backend strategy record the validation
//! pipeline consults: which distributions and files it can package, which
//! platforms it targets, which extra checksum it needs and what the
//! hard-coded fallbacks are. User configuration never changes these.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::distribution::{Artifact, DistributionType};
use crate::core::project::Project;
use crate::util::hash::Algorithm;

/// Unique identifier for a packager backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagerKind {
    /// MacPorts portfiles
    Macports,
    /// Homebrew formulae
    Brew,
    /// Scoop manifests
    Scoop,
    /// RPM spec files
    Spec,
}

impl PackagerKind {
    /// Every backend, in the order they are validated.
    pub const ALL: [PackagerKind; 4] = [
        PackagerKind::Brew,
        PackagerKind::Macports,
        PackagerKind::Scoop,
        PackagerKind::Spec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackagerKind::Macports => "macports",
            PackagerKind::Brew => "brew",
            PackagerKind::Scoop => "scoop",
            PackagerKind::Spec => "spec",
        }
    }
}

impl fmt::Display for PackagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an invalid packager name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid packager '{0}', valid values: brew, macports, scoop, spec")]
pub struct PackagerKindParseError(pub String);

impl FromStr for PackagerKind {
    type Err = PackagerKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macports" => Ok(PackagerKind::Macports),
            "brew" | "homebrew" => Ok(PackagerKind::Brew),
            "scoop" => Ok(PackagerKind::Scoop),
            "spec" | "rpm" => Ok(PackagerKind::Spec),
            _ => Err(PackagerKindParseError(s.to_string())),
        }
    }
}

/// Distribution type paired with the file suffixes a backend accepts for it.
pub type TypeSupport = (DistributionType, &'static [&'static str]);

/// Strategy record for one backend.
#[derive(Debug, Clone, Copy)]
pub struct BackendSpec {
    /// Backend identifier
    pub kind: PackagerKind,

    /// One-line description for `packwright packagers`
    pub description: &'static str,

    /// Supported distribution types and their accepted file suffixes
    pub distribution_types: &'static [TypeSupport],

    /// Platform prefixes this backend targets (`osx` matches `osx-aarch_64`)
    pub platforms: &'static [&'static str],

    /// Checksum the generated metadata needs beyond the model defaults
    pub checksum: Option<Algorithm>,

    /// Revision used when neither packager nor parent sets one
    pub default_revision: u32,

    /// Categories used when neither packager nor parent sets any
    pub default_categories: &'static [&'static str],

    /// Extra-property key defaulted to `<distribution>.app` for native packages
    pub app_name_key: Option<&'static str>,

    /// Repository name used when no repository name is configured
    pub repository_name: &'static str,

    /// Whether an invalid repository disables the packager
    pub repository_required: bool,

    /// Whether the packager publishes through the release host
    pub requires_release: bool,
}

impl BackendSpec {
    /// Check if the backend can package this distribution type.
    pub fn supports_distribution(&self, distribution_type: DistributionType) -> bool {
        self.distribution_types
            .iter()
            .any(|(t, _)| *t == distribution_type)
    }

    /// Accepted file suffixes for a distribution type.
    pub fn extensions_for(&self, distribution_type: DistributionType) -> &'static [&'static str] {
        self.distribution_types
            .iter()
            .find(|(t, _)| *t == distribution_type)
            .map(|(_, exts)| *exts)
            .unwrap_or(&[])
    }

    /// Check a platform classifier. Artifacts without one are universal.
    pub fn supports_platform(&self, platform: Option<&str>) -> bool {
        match platform {
            None => true,
            Some(platform) => {
                let platform = platform.to_lowercase();
                self.platforms.iter().any(|prefix| {
                    platform == *prefix
                        || platform.starts_with(&format!("{}-", prefix))
                        || platform.starts_with(&format!("{}_", prefix))
                })
            }
        }
    }

    /// Artifact extra property that opts an artifact out of this backend.
    pub fn skip_key(&self) -> String {
        format!("skip_{}", self.kind.as_str())
    }

    /// Candidate predicate: whether an artifact is eligible for this backend.
    pub fn accepts(
        &self,
        artifact: &Artifact,
        distribution_type: DistributionType,
        project: &Project,
    ) -> bool {
        artifact.is_active(project)
            && !artifact.flag(&self.skip_key())
            && self
                .extensions_for(distribution_type)
                .iter()
                .any(|ext| artifact.has_extension(ext))
            && self.supports_platform(artifact.platform())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_SPEC: BackendSpec = BackendSpec {
        kind: PackagerKind::Brew,
        description: "test",
        distribution_types: &[(DistributionType::Binary, &[".zip", ".tar.gz"])],
        platforms: &["osx", "linux"],
        checksum: None,
        default_revision: 0,
        default_categories: &[],
        app_name_key: None,
        repository_name: "tap",
        repository_required: false,
        requires_release: true,
    };

    #[test]
    fn test_platform_prefix_matching() {
        assert!(TEST_SPEC.supports_platform(None));
        assert!(TEST_SPEC.supports_platform(Some("osx")));
        assert!(TEST_SPEC.supports_platform(Some("osx-aarch_64")));
        assert!(TEST_SPEC.supports_platform(Some("LINUX-x86_64")));
        assert!(!TEST_SPEC.supports_platform(Some("windows-x86_64")));
        assert!(!TEST_SPEC.supports_platform(Some("osxfoo")));
    }

    #[test]
    fn test_accepts_filters_extension_and_skip() {
        let project = Project::new("app", "1.0.0");
        let zip = Artifact::new("app-osx.zip").with_platform("osx-x86_64");
        let jar = Artifact::new("app.jar");
        let skipped = Artifact::new("app-linux.tar.gz")
            .with_platform("linux-x86_64")
            .with_extra("skip_brew", json!(true));

        assert!(TEST_SPEC.accepts(&zip, DistributionType::Binary, &project));
        assert!(!TEST_SPEC.accepts(&jar, DistributionType::Binary, &project));
        assert!(!TEST_SPEC.accepts(&skipped, DistributionType::Binary, &project));
        assert!(!TEST_SPEC.accepts(&zip, DistributionType::JavaBinary, &project));
    }

    #[test]
    fn test_parse_packager_kind() {
        assert_eq!("Homebrew".parse::<PackagerKind>().unwrap(), PackagerKind::Brew);
        assert_eq!("rpm".parse::<PackagerKind>().unwrap(), PackagerKind::Spec);
        assert!("apt".parse::<PackagerKind>().is_err());
    }
}
