//! Release host configuration and the `Releaser` capability.
//!
//! Packagers only need to know whether the host can create releases and
//! where release assets end up. The REST clients that actually talk to the
//! host live elsewhere.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::packager::CommitAuthorDecl;

/// Supported release hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaserKind {
    #[default]
    Github,
    Gitlab,
    Gitea,
    Codeberg,
    /// Plain git remote, tags only
    Generic,
}

impl ReleaserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaserKind::Github => "github",
            ReleaserKind::Gitlab => "gitlab",
            ReleaserKind::Gitea => "gitea",
            ReleaserKind::Codeberg => "codeberg",
            ReleaserKind::Generic => "generic",
        }
    }

    /// Public web host, if the kind has a canonical one.
    pub fn default_host(&self) -> Option<&'static str> {
        match self {
            ReleaserKind::Github => Some("https://github.com"),
            ReleaserKind::Gitlab => Some("https://gitlab.com"),
            ReleaserKind::Codeberg => Some("https://codeberg.org"),
            ReleaserKind::Gitea | ReleaserKind::Generic => None,
        }
    }
}

impl fmt::Display for ReleaserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the validation pipeline needs from a release host.
pub trait Releaser: Send + Sync {
    /// Host kind.
    fn kind(&self) -> ReleaserKind;

    /// Whether the host can create releases (and host release assets).
    fn is_release_supported(&self) -> bool;

    /// Repository owner on the host.
    fn owner(&self) -> Option<&str>;

    /// Repository name on the host.
    fn name(&self) -> Option<&str>;

    /// API token, if configured.
    fn token(&self) -> Option<&str>;

    /// Web URL of the project repository.
    fn repo_url(&self) -> Option<String>;

    /// URL that always points at the latest release.
    fn latest_release_url(&self) -> Option<String> {
        let repo = self.repo_url()?;
        match self.kind() {
            ReleaserKind::Gitlab => Some(format!("{}/-/releases/permalink/latest", repo)),
            ReleaserKind::Generic => None,
            _ => Some(format!("{}/releases/latest", repo)),
        }
    }

    /// Asset download URL template with `{{tagName}}` and `{{artifactFile}}`.
    fn download_url(&self) -> Option<String> {
        let repo = self.repo_url()?;
        match self.kind() {
            ReleaserKind::Gitlab => Some(format!(
                "{}/-/releases/{{{{tagName}}}}/downloads/{{{{artifactFile}}}}",
                repo
            )),
            ReleaserKind::Generic => None,
            _ => Some(format!(
                "{}/releases/download/{{{{tagName}}}}/{{{{artifactFile}}}}",
                repo
            )),
        }
    }
}

/// The `[release]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Host kind
    pub kind: ReleaserKind,

    /// Web host override (required for self-hosted gitea)
    pub host: Option<String>,

    /// Repository owner
    pub owner: Option<String>,

    /// Repository name (defaults to the project name)
    pub name: Option<String>,

    /// API token
    pub token: Option<String>,

    /// Author for commits pushed to packager repositories
    pub commit_author: CommitAuthorDecl,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Releaser for ReleaseConfig {
    fn kind(&self) -> ReleaserKind {
        self.kind
    }

    fn is_release_supported(&self) -> bool {
        !matches!(self.kind, ReleaserKind::Generic)
    }

    fn owner(&self) -> Option<&str> {
        non_blank(&self.owner)
    }

    fn name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    fn token(&self) -> Option<&str> {
        non_blank(&self.token)
    }

    fn repo_url(&self) -> Option<String> {
        let host = non_blank(&self.host).or(self.kind.default_host())?;
        let owner = Releaser::owner(self)?;
        let name = Releaser::name(self)?;
        Some(format!("{}/{}/{}", host.trim_end_matches('/'), owner, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github() -> ReleaseConfig {
        ReleaseConfig {
            owner: Some("acme".to_string()),
            name: Some("app".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_github_urls() {
        let release = github();
        assert!(release.is_release_supported());
        assert_eq!(
            release.repo_url().as_deref(),
            Some("https://github.com/acme/app")
        );
        assert_eq!(
            release.latest_release_url().as_deref(),
            Some("https://github.com/acme/app/releases/latest")
        );
        assert_eq!(
            release.download_url().as_deref(),
            Some("https://github.com/acme/app/releases/download/{{tagName}}/{{artifactFile}}")
        );
    }

    #[test]
    fn test_gitlab_urls() {
        let release = ReleaseConfig {
            kind: ReleaserKind::Gitlab,
            ..github()
        };
        assert_eq!(
            release.latest_release_url().as_deref(),
            Some("https://gitlab.com/acme/app/-/releases/permalink/latest")
        );
    }

    #[test]
    fn test_generic_does_not_support_releases() {
        let release = ReleaseConfig {
            kind: ReleaserKind::Generic,
            ..github()
        };
        assert!(!release.is_release_supported());
        assert_eq!(release.latest_release_url(), None);
    }

    #[test]
    fn test_gitea_needs_host() {
        let mut release = ReleaseConfig {
            kind: ReleaserKind::Gitea,
            ..github()
        };
        assert_eq!(release.repo_url(), None);
        release.host = Some("https://git.example.com/".to_string());
        assert_eq!(
            release.repo_url().as_deref(),
            Some("https://git.example.com/acme/app")
        );
    }
}
