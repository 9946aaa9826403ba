//! Homebrew formulae.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::distribution::DistributionType;
use crate::packagers::capabilities::{BackendSpec, PackagerKind};
use crate::util::hash::Algorithm;

pub const SPEC: BackendSpec = BackendSpec {
    kind: PackagerKind::Brew,
    description: "Homebrew formulae pushed to a tap repository",
    distribution_types: &[
        (DistributionType::JavaBinary, &[".zip", ".tar.gz"]),
        (DistributionType::SingleJar, &[".jar"]),
        (DistributionType::Jlink, &[".zip", ".tar.gz"]),
        (DistributionType::NativeImage, &[".zip", ".tar.gz"]),
        (DistributionType::Binary, &[".zip", ".tar.gz", ".tar.xz"]),
        (DistributionType::NativePackage, &[".dmg", ".pkg", ".zip"]),
    ],
    platforms: &["osx", "macos", "darwin", "linux"],
    checksum: Some(Algorithm::Sha256),
    default_revision: 0,
    default_categories: &[],
    app_name_key: None,
    repository_name: "homebrew-tap",
    repository_required: false,
    requires_release: true,
};

/// Brew-only settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrewConfig {
    /// Ruby class name of the formula (defaults to the camel-cased distribution name)
    pub formula_name: Option<String>,

    /// Formula dependencies, name -> version constraint (may be empty)
    pub dependencies: Option<BTreeMap<String, String>>,

    /// Lines of the `livecheck` block
    pub livecheck: Option<Vec<String>>,
}

impl BrewConfig {
    /// Fill unset fields from the parent packager's settings.
    pub fn inherit(&self, parent: &BrewConfig) -> BrewConfig {
        BrewConfig {
            formula_name: self
                .formula_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .or_else(|| parent.formula_name.clone()),
            dependencies: self
                .dependencies
                .clone()
                .or_else(|| parent.dependencies.clone()),
            livecheck: self.livecheck.clone().or_else(|| parent.livecheck.clone()),
        }
    }

    /// Apply hard-coded fallbacks.
    pub fn with_fallbacks(&self, distribution_name: &str) -> BrewConfig {
        let mut config = self.clone();
        if config
            .formula_name
            .as_deref()
            .map_or(true, |n| n.trim().is_empty())
        {
            config.formula_name = Some(formula_class_name(distribution_name));
        }
        config
    }
}

/// Homebrew formula class name: `my-app_cli` becomes `MyAppCli`.
pub fn formula_class_name(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
