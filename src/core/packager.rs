//! Packager configuration: declared (as parsed) and resolved (as validated).
//!
//! Declared values keep "unset" distinct from "empty": every defaultable
//! field is an `Option`, so `categories = []` is an explicit choice that
//! inheritance never overwrites.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::active::Active;
use crate::core::distribution::Artifact;
use crate::core::repository::{RepositoryDecl, ResolvedRepository};
use crate::packagers::brew::BrewConfig;
use crate::packagers::scoop::ScoopConfig;
use crate::packagers::spec::SpecConfig;
use crate::packagers::PackagerKind;

/// Commit author name used when nothing else is configured.
pub const DEFAULT_COMMIT_AUTHOR_NAME: &str = "packwright-bot";

/// Commit author email used when nothing else is configured.
pub const DEFAULT_COMMIT_AUTHOR_EMAIL: &str = "packwright-bot@users.noreply.github.com";

/// Commit author as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitAuthorDecl {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Commit author after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

/// Backend-specific payload, one variant per packaging technology.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    Macports,
    Brew(BrewConfig),
    Scoop(ScoopConfig),
    Spec(SpecConfig),
}

impl BackendConfig {
    /// A payload with every field unset.
    pub fn empty(kind: PackagerKind) -> Self {
        match kind {
            PackagerKind::Macports => BackendConfig::Macports,
            PackagerKind::Brew => BackendConfig::Brew(BrewConfig::default()),
            PackagerKind::Scoop => BackendConfig::Scoop(ScoopConfig::default()),
            PackagerKind::Spec => BackendConfig::Spec(SpecConfig::default()),
        }
    }

    pub fn kind(&self) -> PackagerKind {
        match self {
            BackendConfig::Macports => PackagerKind::Macports,
            BackendConfig::Brew(_) => PackagerKind::Brew,
            BackendConfig::Scoop(_) => PackagerKind::Scoop,
            BackendConfig::Spec(_) => PackagerKind::Spec,
        }
    }
}

/// A packager as declared, either globally or on a distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct PackagerDecl {
    pub active: Option<Active>,
    pub revision: Option<u32>,
    pub maintainers: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub package_name: Option<String>,
    pub extra_properties: BTreeMap<String, serde_json::Value>,
    pub commit_author: CommitAuthorDecl,
    pub continue_on_error: Option<bool>,
    pub template_directory: Option<PathBuf>,
    pub skip_templates: Option<Vec<String>>,
    pub repository: RepositoryDecl,
    pub backend: BackendConfig,
}

impl PackagerDecl {
    /// A packager with nothing set.
    pub fn new(kind: PackagerKind) -> Self {
        PackagerDecl {
            active: None,
            revision: None,
            maintainers: None,
            categories: None,
            package_name: None,
            extra_properties: BTreeMap::new(),
            commit_author: CommitAuthorDecl::default(),
            continue_on_error: None,
            template_directory: None,
            skip_templates: None,
            repository: RepositoryDecl::default(),
            backend: BackendConfig::empty(kind),
        }
    }

    pub fn kind(&self) -> PackagerKind {
        self.backend.kind()
    }

    pub fn with_active(mut self, active: Active) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra_properties.insert(key.into(), value);
        self
    }
}

/// A packager after the validation pipeline has enabled it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPackager {
    pub kind: PackagerKind,
    pub distribution: String,
    pub active: Active,
    /// The single artifact this packager publishes
    pub artifact: Artifact,
    pub revision: u32,
    pub maintainers: Vec<String>,
    pub categories: Vec<String>,
    pub package_name: String,
    pub extra_properties: BTreeMap<String, serde_json::Value>,
    pub commit_author: CommitAuthor,
    pub continue_on_error: bool,
    pub template_directory: PathBuf,
    pub skip_templates: Vec<String>,
    pub repository: ResolvedRepository,
    pub backend: BackendConfig,
}
