//! Distributions and their artifacts.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::active::Active;
use crate::core::project::Project;

/// The kind of release artifacts a distribution contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionType {
    /// Java application with launcher scripts
    #[serde(alias = "JAVA_BINARY")]
    JavaBinary,
    /// A single executable jar
    #[serde(alias = "SINGLE_JAR")]
    SingleJar,
    /// A jlink runtime image
    #[serde(alias = "JLINK")]
    Jlink,
    /// A native-image executable
    #[serde(alias = "NATIVE_IMAGE")]
    NativeImage,
    /// A platform installer (.dmg, .pkg, .msi, ...)
    #[serde(alias = "NATIVE_PACKAGE")]
    NativePackage,
    /// A platform-specific binary archive
    #[serde(alias = "BINARY")]
    Binary,
    /// A bare platform-specific executable
    #[serde(alias = "FLAT_BINARY")]
    FlatBinary,
}

impl DistributionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionType::JavaBinary => "java-binary",
            DistributionType::SingleJar => "single-jar",
            DistributionType::Jlink => "jlink",
            DistributionType::NativeImage => "native-image",
            DistributionType::NativePackage => "native-package",
            DistributionType::Binary => "binary",
            DistributionType::FlatBinary => "flat-binary",
        }
    }

    /// Whether every artifact of this type targets one platform.
    pub fn is_platform_specific(&self) -> bool {
        matches!(
            self,
            DistributionType::Jlink
                | DistributionType::NativeImage
                | DistributionType::NativePackage
                | DistributionType::Binary
                | DistributionType::FlatBinary
        )
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an invalid distribution type.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid distribution type '{0}', valid values: java-binary, single-jar, jlink, native-image, native-package, binary, flat-binary")]
pub struct DistributionTypeParseError(pub String);

impl FromStr for DistributionType {
    type Err = DistributionTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "java-binary" => Ok(DistributionType::JavaBinary),
            "single-jar" => Ok(DistributionType::SingleJar),
            "jlink" => Ok(DistributionType::Jlink),
            "native-image" => Ok(DistributionType::NativeImage),
            "native-package" => Ok(DistributionType::NativePackage),
            "binary" => Ok(DistributionType::Binary),
            "flat-binary" => Ok(DistributionType::FlatBinary),
            _ => Err(DistributionTypeParseError(s.to_string())),
        }
    }
}

/// A single build output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Path to the file, relative to the project base directory
    pub path: PathBuf,

    /// Platform classifier such as `osx-x86_64` (None = universal)
    #[serde(default)]
    pub platform: Option<String>,

    /// Activation for this artifact (None = always)
    #[serde(default)]
    pub active: Option<Active>,

    /// Free-form metadata, e.g. `skip_brew = true`
    #[serde(default)]
    pub extra_properties: BTreeMap<String, serde_json::Value>,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Artifact {
            path: path.into(),
            platform: None,
            active: None,
            extra_properties: BTreeMap::new(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra_properties.insert(key.into(), value);
        self
    }

    /// The file name component of the path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Case-insensitive suffix check on the file name (`.tar.gz` works).
    pub fn has_extension(&self, extension: &str) -> bool {
        self.file_name()
            .to_lowercase()
            .ends_with(&extension.to_lowercase())
    }

    /// The platform classifier, if non-blank.
    pub fn platform(&self) -> Option<&str> {
        self.platform
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Whether the artifact is active for this project.
    pub fn is_active(&self, project: &Project) -> bool {
        self.active.unwrap_or(Active::Always).check(project)
    }

    /// Whether a boolean extra property is set to true.
    pub fn flag(&self, key: &str) -> bool {
        match self.extra_properties.get(key) {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Resolve the artifact path against a base directory.
    pub fn resolved_path(&self, basedir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            basedir.join(&self.path)
        }
    }
}

/// A named group of artifacts to be published.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub name: String,
    pub distribution_type: DistributionType,
    pub artifacts: Vec<Artifact>,
}

impl Distribution {
    pub fn new(name: impl Into<String>, distribution_type: DistributionType) -> Self {
        Distribution {
            name: name.into(),
            distribution_type,
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_has_extension_is_suffix_match() {
        let artifact = Artifact::new("build/app-1.0.0-osx-x86_64.TAR.GZ");
        assert!(artifact.has_extension(".tar.gz"));
        assert!(!artifact.has_extension(".zip"));
    }

    #[test]
    fn test_blank_platform_is_none() {
        assert_eq!(Artifact::new("a.zip").with_platform("  ").platform(), None);
        assert_eq!(
            Artifact::new("a.zip").with_platform("osx").platform(),
            Some("osx")
        );
    }

    #[test]
    fn test_flag_accepts_bool_and_string() {
        let artifact = Artifact::new("a.zip")
            .with_extra("skip_brew", json!(true))
            .with_extra("skip_scoop", json!("TRUE"))
            .with_extra("skip_spec", json!(1));
        assert!(artifact.flag("skip_brew"));
        assert!(artifact.flag("skip_scoop"));
        assert!(!artifact.flag("skip_spec"));
        assert!(!artifact.flag("missing"));
    }

    #[test]
    fn test_artifact_activation() {
        let snapshot = Project::new("app", "1.0.0-SNAPSHOT");
        let mut artifact = Artifact::new("a.zip");
        assert!(artifact.is_active(&snapshot));
        artifact.active = Some(Active::Release);
        assert!(!artifact.is_active(&snapshot));
    }

    #[test]
    fn test_parse_distribution_type() {
        assert_eq!(
            "NATIVE_PACKAGE".parse::<DistributionType>().unwrap(),
            DistributionType::NativePackage
        );
        assert!(DistributionType::Binary.is_platform_specific());
        assert!(!DistributionType::JavaBinary.is_platform_specific());
    }
}
