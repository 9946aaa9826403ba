//! The release model (`packwright.toml`).
//!
//! The file is deserialized into raw structs first, then converted into
//! the declared model. Every backend gets a global packager, whether or
//! not the file declares one, so the pipeline always has a parent.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::core::active::Active;
use crate::core::distribution::{Artifact, Distribution, DistributionType};
use crate::core::packager::{BackendConfig, CommitAuthorDecl, PackagerDecl};
use crate::core::project::Project;
use crate::core::release::ReleaseConfig;
use crate::core::repository::RepositoryDecl;
use crate::packagers::PackagerKind;
use crate::util::diagnostic::ModelParseError;
use crate::util::hash::Algorithm;

/// Model file name.
pub const MODEL_FILE: &str = "packwright.toml";

/// Errors raised while loading a model.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ModelError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(ModelParseError),

    #[error("invalid {field} pattern `{pattern}`")]
    Pattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown packager `{key}` in {location}")]
    #[diagnostic(help("valid packagers: brew, macports, scoop, spec"))]
    UnknownPackager { location: String, key: String },

    #[error("invalid {kind} settings in {location}: {message}")]
    Payload {
        kind: PackagerKind,
        location: String,
        message: String,
    },
}

/// A distribution together with the packagers it declares.
#[derive(Debug, Clone)]
pub struct DistributionDecl {
    pub distribution: Distribution,

    /// Per-backend packagers; backends not listed here inherit everything
    pub packagers: BTreeMap<PackagerKind, PackagerDecl>,
}

impl DistributionDecl {
    pub fn new(distribution: Distribution) -> Self {
        DistributionDecl {
            distribution,
            packagers: BTreeMap::new(),
        }
    }

    pub fn with_packager(mut self, packager: PackagerDecl) -> Self {
        self.packagers.insert(packager.kind(), packager);
        self
    }

    /// The declared packager for a backend, or an all-unset one.
    pub fn packager(&self, kind: PackagerKind) -> PackagerDecl {
        self.packagers
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| PackagerDecl::new(kind))
    }
}

/// The declared release model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Directory containing the model file
    pub basedir: PathBuf,

    pub project: Project,

    pub release: ReleaseConfig,

    /// Checksum algorithms computed for every artifact
    pub algorithms: BTreeSet<Algorithm>,

    /// Global (parent) packagers, one per backend
    pub packagers: BTreeMap<PackagerKind, PackagerDecl>,

    /// Distributions in declaration order
    pub distributions: Vec<DistributionDecl>,
}

/// Raw model as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct RawModel {
    project: RawProject,

    #[serde(default)]
    release: ReleaseConfig,

    #[serde(default)]
    checksum: RawChecksum,

    #[serde(default)]
    packagers: BTreeMap<String, RawPackager>,

    #[serde(default)]
    distributions: IndexMap<String, RawDistribution>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    name: String,
    version: String,
    snapshot_pattern: Option<String>,
    prerelease: Option<bool>,
    prerelease_pattern: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChecksum {
    algorithms: Option<BTreeSet<Algorithm>>,
}

#[derive(Debug, Deserialize)]
struct RawDistribution {
    #[serde(rename = "type")]
    distribution_type: DistributionType,

    #[serde(default)]
    artifacts: Vec<Artifact>,

    /// Remaining tables are per-backend packagers
    #[serde(flatten)]
    packagers: BTreeMap<String, RawPackager>,
}

/// Raw packager table (common fields plus the backend payload).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPackager {
    active: Option<Active>,
    revision: Option<u32>,
    maintainers: Option<Vec<String>>,
    categories: Option<Vec<String>>,
    package_name: Option<String>,
    extra_properties: BTreeMap<String, serde_json::Value>,
    commit_author: CommitAuthorDecl,
    continue_on_error: Option<bool>,
    template_directory: Option<PathBuf>,
    skip_templates: Option<Vec<String>>,
    repository: RepositoryDecl,

    #[serde(flatten)]
    payload: toml::Table,
}

/// Keys each backend payload understands.
fn payload_keys(kind: PackagerKind) -> &'static [&'static str] {
    match kind {
        PackagerKind::Macports => &[],
        PackagerKind::Brew => &["formula_name", "dependencies", "livecheck"],
        PackagerKind::Scoop => &["checkver_url", "autoupdate_url"],
        PackagerKind::Spec => &["requires"],
    }
}

impl Model {
    /// Load a model from a file path.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// Parse model content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ModelError> {
        let raw: RawModel = toml::from_str(content).map_err(|err| {
            ModelError::Parse(ModelParseError::from_toml(
                path.display().to_string(),
                content,
                &err,
            ))
        })?;

        let basedir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let project = Self::convert_project(raw.project)?;

        let mut release = raw.release;
        if release.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            release.name = Some(project.name.clone());
        }

        let algorithms = raw
            .checksum
            .algorithms
            .unwrap_or_else(|| BTreeSet::from([Algorithm::Sha256]));

        let mut packagers = BTreeMap::new();
        for (key, raw_packager) in raw.packagers {
            let kind: PackagerKind = key.parse().map_err(|_| ModelError::UnknownPackager {
                location: "[packagers]".to_string(),
                key: key.clone(),
            })?;
            let decl = Self::convert_packager(kind, raw_packager, &format!("packagers.{}", key))?;
            packagers.insert(kind, decl);
        }
        for kind in PackagerKind::ALL {
            packagers
                .entry(kind)
                .or_insert_with(|| PackagerDecl::new(kind));
        }

        let mut distributions = Vec::new();
        for (name, raw_dist) in raw.distributions {
            distributions.push(Self::convert_distribution(name, raw_dist)?);
        }

        Ok(Model {
            basedir,
            project,
            release,
            algorithms,
            packagers,
            distributions,
        })
    }

    fn convert_project(raw: RawProject) -> Result<Project, ModelError> {
        let mut project = Project::new(raw.name, raw.version);
        if let Some(pattern) = raw.snapshot_pattern {
            project = project
                .with_snapshot_pattern(&pattern)
                .map_err(|source| ModelError::Pattern {
                    field: "snapshot",
                    pattern: pattern.clone(),
                    source,
                })?;
        }
        if let Some(pattern) = raw.prerelease_pattern {
            project = project
                .with_prerelease_pattern(&pattern)
                .map_err(|source| ModelError::Pattern {
                    field: "prerelease",
                    pattern: pattern.clone(),
                    source,
                })?;
        }
        if let Some(enabled) = raw.prerelease {
            project = project.with_prerelease(enabled);
        }
        Ok(project)
    }

    fn convert_distribution(name: String, raw: RawDistribution) -> Result<DistributionDecl, ModelError> {
        let mut distribution = Distribution::new(name.clone(), raw.distribution_type);
        distribution.artifacts = raw.artifacts;

        let mut decl = DistributionDecl::new(distribution);
        for (key, raw_packager) in raw.packagers {
            let kind: PackagerKind = key.parse().map_err(|_| ModelError::UnknownPackager {
                location: format!("[distributions.{}]", name),
                key: key.clone(),
            })?;
            let location = format!("distributions.{}.{}", name, key);
            decl = decl.with_packager(Self::convert_packager(kind, raw_packager, &location)?);
        }
        Ok(decl)
    }

    fn convert_packager(
        kind: PackagerKind,
        raw: RawPackager,
        location: &str,
    ) -> Result<PackagerDecl, ModelError> {
        // Warn about unknown keys (no silent ignore policy)
        let known = payload_keys(kind);
        for key in raw.payload.keys() {
            if !known.contains(&key.as_str()) {
                tracing::warn!("{}: unknown key `{}` is ignored", location, key);
            }
        }

        let payload = toml::Value::Table(raw.payload);
        let backend = Self::convert_payload(kind, payload).map_err(|err| ModelError::Payload {
            kind,
            location: location.to_string(),
            message: err.message().to_string(),
        })?;

        Ok(PackagerDecl {
            active: raw.active,
            revision: raw.revision,
            maintainers: raw.maintainers,
            categories: raw.categories,
            package_name: raw.package_name,
            extra_properties: raw.extra_properties,
            commit_author: raw.commit_author,
            continue_on_error: raw.continue_on_error,
            template_directory: raw.template_directory,
            skip_templates: raw.skip_templates,
            repository: raw.repository,
            backend,
        })
    }

    fn convert_payload(
        kind: PackagerKind,
        payload: toml::Value,
    ) -> Result<BackendConfig, toml::de::Error> {
        Ok(match kind {
            PackagerKind::Macports => BackendConfig::Macports,
            PackagerKind::Brew => BackendConfig::Brew(payload.try_into()?),
            PackagerKind::Scoop => BackendConfig::Scoop(payload.try_into()?),
            PackagerKind::Spec => BackendConfig::Spec(payload.try_into()?),
        })
    }

    /// Look up a distribution by name.
    pub fn distribution(&self, name: &str) -> Option<&DistributionDecl> {
        self.distributions
            .iter()
            .find(|d| d.distribution.name == name)
    }

    /// The global packager for a backend.
    pub fn packager(&self, kind: PackagerKind) -> Option<&PackagerDecl> {
        self.packagers.get(&kind)
    }
}

/// Find the model file by searching up the directory tree.
pub fn find_model(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(MODEL_FILE);
        if candidate.exists() {
            return Some(candidate);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// A TOML basic string, quoted and escaped.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Generate a starter `packwright.toml`.
///
/// The name is quoted wherever it appears, so names with dots or quotes
/// stay a single key.
pub fn generate_default_model(name: &str) -> String {
    let quoted = toml_string(name);
    let artifact = |suffix: &str| toml_string(&format!("target/distributions/{}-0.1.0-{}", name, suffix));
    format!(
        r#"[project]
name = {quoted}
version = "0.1.0"

[release]
kind = "github"
owner = {quoted}

[checksum]
algorithms = ["sha-256"]

[packagers.brew]
active = "release"

[packagers.macports]
active = "release"
categories = ["devel"]

[distributions.{quoted}]
type = "binary"

[[distributions.{quoted}.artifacts]]
path = {osx}
platform = "osx-x86_64"

[[distributions.{quoted}.artifacts]]
path = {linux}
platform = "linux-x86_64"
extra_properties = {{ skip_brew = true }}
"#,
        osx = artifact("osx-x86_64.zip"),
        linux = artifact("linux-x86_64.tar.gz"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packagers::brew::BrewConfig;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<Model, ModelError> {
        let tmp = TempDir::new().unwrap();
        Model::parse(content, &tmp.path().join(MODEL_FILE))
    }

    #[test]
    fn test_parse_basic_model() {
        let content = r#"
[project]
name = "app"
version = "1.0.0"

[release]
owner = "acme"

[packagers.macports]
active = "always"
categories = []

[distributions.foo]
type = "native-package"

[[distributions.foo.artifacts]]
path = "build/foo-1.0.0.dmg"
platform = "osx-x86_64"

[distributions.foo.macports]
revision = 2
"#;
        let model = parse(content).unwrap();
        assert_eq!(model.project.name, "app");
        assert_eq!(model.release.name.as_deref(), Some("app"));
        assert_eq!(model.algorithms, BTreeSet::from([Algorithm::Sha256]));
        assert_eq!(model.packagers.len(), PackagerKind::ALL.len());

        let global = model.packager(PackagerKind::Macports).unwrap();
        assert_eq!(global.active, Some(Active::Always));
        assert_eq!(global.categories, Some(vec![]));

        let foo = model.distribution("foo").unwrap();
        assert_eq!(foo.distribution.distribution_type, DistributionType::NativePackage);
        assert_eq!(foo.distribution.artifacts.len(), 1);
        assert_eq!(foo.packager(PackagerKind::Macports).revision, Some(2));
        assert_eq!(foo.packager(PackagerKind::Brew), PackagerDecl::new(PackagerKind::Brew));
    }

    #[test]
    fn test_distributions_keep_declaration_order() {
        let content = r#"
[project]
name = "app"
version = "1.0.0"

[distributions.zeta]
type = "binary"

[distributions.alpha]
type = "jlink"
"#;
        let model = parse(content).unwrap();
        let names: Vec<_> = model
            .distributions
            .iter()
            .map(|d| d.distribution.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_parse_backend_payload() {
        let content = r#"
[project]
name = "app"
version = "1.0.0"

[packagers.brew]
formula_name = "App"
livecheck = ["skip"]

[packagers.brew.dependencies]
openjdk = "17"
"#;
        let model = parse(content).unwrap();
        let brew = model.packager(PackagerKind::Brew).unwrap();
        match &brew.backend {
            BackendConfig::Brew(BrewConfig {
                formula_name,
                dependencies,
                livecheck,
            }) => {
                assert_eq!(formula_name.as_deref(), Some("App"));
                assert_eq!(dependencies.as_ref().unwrap().get("openjdk").unwrap(), "17");
                assert_eq!(livecheck.as_ref().unwrap(), &vec!["skip".to_string()]);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_unknown_packager_is_rejected() {
        let content = r#"
[project]
name = "app"
version = "1.0.0"

[distributions.foo]
type = "binary"

[distributions.foo.apt]
active = "always"
"#;
        let err = parse(content).unwrap_err();
        assert!(matches!(err, ModelError::UnknownPackager { .. }));
    }

    #[test]
    fn test_syntax_error_keeps_span() {
        let err = parse("[project\nname = 1").unwrap_err();
        match err {
            ModelError::Parse(diag) => assert!(diag.span.is_some()),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_invalid_snapshot_pattern() {
        let content = r#"
[project]
name = "app"
version = "1.0.0"
snapshot_pattern = "(unclosed"
"#;
        assert!(matches!(parse(content), Err(ModelError::Pattern { field: "snapshot", .. })));
    }

    #[test]
    fn test_find_model_walks_up() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MODEL_FILE), generate_default_model("app")).unwrap();
        let nested = tmp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_model(&nested), Some(tmp.path().join(MODEL_FILE)));
    }

    #[test]
    fn test_generated_model_parses() {
        let model = parse(&generate_default_model("tool")).unwrap();
        assert_eq!(model.distributions.len(), 1);
        assert_eq!(model.distributions[0].distribution.artifacts.len(), 2);
    }

    #[test]
    fn test_generated_model_quotes_name() {
        for name in ["my.tool", "say \"hi\""] {
            let model = parse(&generate_default_model(name)).unwrap();
            assert_eq!(model.project.name, name);
            assert_eq!(model.distributions.len(), 1);
            assert_eq!(model.distributions[0].distribution.name, name);
            assert_eq!(model.release.owner.as_deref(), Some(name));
        }
    }
}
