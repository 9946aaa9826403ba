//! Packager destination repositories ("taps").

use serde::{Deserialize, Serialize};

use crate::core::active::Active;

/// Repository activation when neither packager nor parent sets one.
pub const DEFAULT_REPOSITORY_ACTIVE: Active = Active::Release;

/// Branch used when neither packager nor parent sets one.
pub const DEFAULT_BRANCH: &str = "HEAD";

/// A repository as declared in configuration. Every field may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryDecl {
    pub active: Option<Active>,
    pub owner: Option<String>,
    pub name: Option<String>,
    pub branch: Option<String>,
    pub token: Option<String>,
}

/// A repository after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRepository {
    pub active: Active,
    pub enabled: bool,
    pub owner: String,
    pub name: String,
    pub branch: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl ResolvedRepository {
    /// `owner/name` slug.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
