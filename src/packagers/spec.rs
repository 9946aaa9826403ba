//! RPM spec files.
//!
//! The packager revision maps to the spec `Release:` field, which starts
//! at 1 rather than 0.

use serde::{Deserialize, Serialize};

use crate::core::distribution::DistributionType;
use crate::packagers::capabilities::{BackendSpec, PackagerKind};
use crate::util::hash::Algorithm;

pub const SPEC: BackendSpec = BackendSpec {
    kind: PackagerKind::Spec,
    description: "RPM spec files pushed to a spec repository",
    distribution_types: &[
        (DistributionType::JavaBinary, &[".zip", ".tar.gz", ".tar"]),
        (DistributionType::Jlink, &[".zip", ".tar.gz", ".tar"]),
        (DistributionType::Binary, &[".zip", ".tar.gz", ".tar"]),
    ],
    platforms: &["linux"],
    checksum: Some(Algorithm::Sha256),
    default_revision: 1,
    default_categories: &["Development/Tools"],
    app_name_key: None,
    repository_name: "spec",
    repository_required: false,
    requires_release: true,
};

/// Spec-only settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecConfig {
    /// `Requires:` entries
    pub requires: Option<Vec<String>>,
}

impl SpecConfig {
    pub fn inherit(&self, parent: &SpecConfig) -> SpecConfig {
        SpecConfig {
            requires: self.requires.clone().or_else(|| parent.requires.clone()),
        }
    }

    pub fn with_fallbacks(&self) -> SpecConfig {
        SpecConfig {
            requires: Some(self.requires.clone().unwrap_or_default()),
        }
    }
}
