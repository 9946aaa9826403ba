//! Activation resolver.
//!
//! Ordered rules, first match wins:
//! 1. an unset child adopts the parent's activation (unset on both = never)
//! 2. the backend must support the distribution type and the activation
//!    must hold for the project
//! 3. the release host must support releases

use std::fmt;

use serde::Serialize;

use crate::core::active::{inherit_active, Active};
use crate::core::distribution::DistributionType;
use crate::core::project::Project;
use crate::core::release::Releaser;
use crate::packagers::BackendSpec;
use crate::util::messages::{self, Message};

/// Why a packager was switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisabledReason {
    /// Activation does not hold for this project
    Inactive,
    /// The backend cannot package this distribution type
    UnsupportedDistribution,
    /// The release host does not support releases
    ReleaseUnsupported,
    /// No artifact matched the backend
    NoArtifacts,
    /// More than one artifact matched the backend
    MultipleArtifacts,
    /// Later-stage configuration errors
    InvalidConfiguration,
}

impl DisabledReason {
    pub fn message(&self, distribution_type: DistributionType) -> Message {
        match self {
            DisabledReason::Inactive => Message::new(messages::DISABLED),
            DisabledReason::UnsupportedDistribution => {
                Message::new(messages::DISABLED_DISTRIBUTION_TYPE).arg(distribution_type)
            }
            DisabledReason::ReleaseUnsupported => Message::new(messages::DISABLED_RELEASE),
            DisabledReason::NoArtifacts => Message::new(messages::DISABLED_NO_ARTIFACTS),
            DisabledReason::MultipleArtifacts => Message::new(messages::DISABLED_MULTIPLE_ARTIFACTS),
            DisabledReason::InvalidConfiguration => Message::new(messages::DISABLED_INVALID),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisabledReason::Inactive => "inactive",
            DisabledReason::UnsupportedDistribution => "unsupported-distribution",
            DisabledReason::ReleaseUnsupported => "release-unsupported",
            DisabledReason::NoArtifacts => "no-artifacts",
            DisabledReason::MultipleArtifacts => "multiple-artifacts",
            DisabledReason::InvalidConfiguration => "invalid-configuration",
        }
    }
}

impl fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of the activation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Enabled(Active),
    Disabled { reason: DisabledReason, active: Active },
}

impl Activation {
    pub fn active(&self) -> Active {
        match self {
            Activation::Enabled(active) => *active,
            Activation::Disabled { active, .. } => *active,
        }
    }
}

/// Resolve whether a packager runs at all.
pub fn resolve_activation(
    child: Option<Active>,
    parent: Option<Active>,
    distribution_type: DistributionType,
    spec: &BackendSpec,
    project: &Project,
    releaser: &dyn Releaser,
) -> Activation {
    let active = inherit_active(child, parent).unwrap_or(Active::Never);

    if !spec.supports_distribution(distribution_type) {
        return Activation::Disabled {
            reason: DisabledReason::UnsupportedDistribution,
            active,
        };
    }

    if !active.check(project) {
        return Activation::Disabled {
            reason: DisabledReason::Inactive,
            active,
        };
    }

    if spec.requires_release && !releaser.is_release_supported() {
        return Activation::Disabled {
            reason: DisabledReason::ReleaseUnsupported,
            active,
        };
    }

    Activation::Enabled(active)
}
