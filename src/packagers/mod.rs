//! Packager backends.
//!
//! Each backend is a closed variant of [`PackagerKind`] plus a static
//! [`BackendSpec`] describing what it can package. Backend-specific
//! settings live in a [`BackendConfig`] payload that the validation
//! pipeline inherits and defaults like every other packager field.
//!
//! # Key Concepts
//!
//! - **Capabilities** - fixed facts about a backend (in `capabilities.rs`)
//! - **Payloads** - per-backend settings (in `brew.rs`, `scoop.rs`, `spec.rs`)
//! - **Registry** - lookup of backend specs by kind (in `registry.rs`)

pub mod brew;
pub mod capabilities;
pub mod macports;
pub mod registry;
pub mod scoop;
pub mod spec;

pub use capabilities::{BackendSpec, PackagerKind, PackagerKindParseError};
pub use registry::PackagerRegistry;

use crate::core::packager::BackendConfig;
use crate::core::release::Releaser;
use crate::validation::errors::Errors;

/// Static spec of a backend.
pub fn spec_for(kind: PackagerKind) -> &'static BackendSpec {
    match kind {
        PackagerKind::Macports => &macports::SPEC,
        PackagerKind::Brew => &brew::SPEC,
        PackagerKind::Scoop => &scoop::SPEC,
        PackagerKind::Spec => &spec::SPEC,
    }
}

impl BackendConfig {
    /// Fill unset payload fields from the parent payload.
    ///
    /// Returns `None` when the two payloads belong to different backends.
    pub fn inherit(&self, parent: &BackendConfig) -> Option<BackendConfig> {
        match (self, parent) {
            (BackendConfig::Macports, BackendConfig::Macports) => Some(BackendConfig::Macports),
            (BackendConfig::Brew(child), BackendConfig::Brew(parent)) => {
                Some(BackendConfig::Brew(child.inherit(parent)))
            }
            (BackendConfig::Scoop(child), BackendConfig::Scoop(parent)) => {
                Some(BackendConfig::Scoop(child.inherit(parent)))
            }
            (BackendConfig::Spec(child), BackendConfig::Spec(parent)) => {
                Some(BackendConfig::Spec(child.inherit(parent)))
            }
            _ => None,
        }
    }

    /// Apply the backend's hard-coded fallbacks.
    pub fn with_fallbacks(&self, distribution: &str, releaser: &dyn Releaser) -> BackendConfig {
        match self {
            BackendConfig::Macports => BackendConfig::Macports,
            BackendConfig::Brew(config) => BackendConfig::Brew(config.with_fallbacks(distribution)),
            BackendConfig::Scoop(config) => BackendConfig::Scoop(config.with_fallbacks(releaser)),
            BackendConfig::Spec(config) => BackendConfig::Spec(config.with_fallbacks()),
        }
    }

    /// Backend-specific checks, reported under `path`.
    pub fn validate(&self, path: &str, errors: &mut Errors) {
        if let BackendConfig::Scoop(config) = self {
            config.validate(path, errors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packagers::brew::BrewConfig;

    #[test]
    fn test_spec_for_matches_kind() {
        for kind in PackagerKind::ALL {
            assert_eq!(spec_for(kind).kind, kind);
        }
    }

    #[test]
    fn test_inherit_rejects_mismatched_payloads() {
        let brew = BackendConfig::Brew(BrewConfig::default());
        assert!(brew.inherit(&BackendConfig::Macports).is_none());
        assert_eq!(
            BackendConfig::Macports.inherit(&BackendConfig::Macports),
            Some(BackendConfig::Macports)
        );
    }
}
