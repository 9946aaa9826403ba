//! Scoop manifests.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::distribution::DistributionType;
use crate::core::release::Releaser;
use crate::packagers::capabilities::{BackendSpec, PackagerKind};
use crate::util::hash::Algorithm;
use crate::util::messages::{self, Message};
use crate::validation::errors::Errors;

pub const SPEC: BackendSpec = BackendSpec {
    kind: PackagerKind::Scoop,
    description: "Scoop manifests pushed to a bucket repository",
    distribution_types: &[
        (DistributionType::JavaBinary, &[".zip"]),
        (DistributionType::Jlink, &[".zip"]),
        (DistributionType::NativeImage, &[".zip"]),
        (DistributionType::Binary, &[".zip"]),
    ],
    platforms: &["windows"],
    checksum: Some(Algorithm::Sha256),
    default_revision: 0,
    default_categories: &[],
    app_name_key: None,
    repository_name: "scoop-bucket",
    repository_required: false,
    requires_release: true,
};

/// Scoop-only settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoopConfig {
    /// Page scoop polls to detect new versions
    pub checkver_url: Option<String>,

    /// Download URL template used by `scoop update`
    pub autoupdate_url: Option<String>,
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl ScoopConfig {
    /// Fill unset fields from the parent packager's settings.
    pub fn inherit(&self, parent: &ScoopConfig) -> ScoopConfig {
        ScoopConfig {
            checkver_url: if blank(&self.checkver_url) {
                parent.checkver_url.clone()
            } else {
                self.checkver_url.clone()
            },
            autoupdate_url: if blank(&self.autoupdate_url) {
                parent.autoupdate_url.clone()
            } else {
                self.autoupdate_url.clone()
            },
        }
    }

    /// Default both URLs from the release host.
    pub fn with_fallbacks(&self, releaser: &dyn Releaser) -> ScoopConfig {
        let mut config = self.clone();
        if blank(&config.checkver_url) {
            config.checkver_url = releaser.latest_release_url();
        }
        if blank(&config.autoupdate_url) {
            config.autoupdate_url = releaser.download_url();
        }
        config
    }

    /// Both URLs must be absolute.
    pub fn validate(&self, path: &str, errors: &mut Errors) {
        let fields = [
            ("checkver_url", &self.checkver_url),
            ("autoupdate_url", &self.autoupdate_url),
        ];
        for (field, value) in fields {
            let key = format!("{}.{}", path, field);
            match value.as_deref() {
                None => errors.configuration(
                    key.clone(),
                    Message::new(messages::MUST_NOT_BE_BLANK).arg(&key),
                ),
                Some(url) => {
                    if let Err(e) = Url::parse(url) {
                        tracing::debug!("{} rejected: {}", key, e);
                        errors.configuration(
                            key.clone(),
                            Message::new(messages::INVALID_URL).arg(&key).arg(url),
                        );
                    }
                }
            }
        }
    }
}
