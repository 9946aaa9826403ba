//! Artifact candidate resolver and platform checks.

use crate::core::distribution::{Artifact, Distribution};
use crate::core::project::Project;
use crate::packagers::BackendSpec;
use crate::util::messages::{self, Message};
use crate::validation::errors::Errors;

/// Artifacts of a distribution eligible for a backend, in declaration order.
pub fn candidate_artifacts<'a>(
    distribution: &'a Distribution,
    spec: &BackendSpec,
    project: &Project,
) -> Vec<&'a Artifact> {
    distribution
        .artifacts
        .iter()
        .filter(|artifact| spec.accepts(artifact, distribution.distribution_type, project))
        .collect()
}

/// Record the error for a packager matching several artifacts.
pub fn report_multiple_artifacts(
    path: &str,
    spec: &BackendSpec,
    candidates: &[&Artifact],
    errors: &mut Errors,
) {
    let files = candidates
        .iter()
        .map(|a| a.file_name())
        .collect::<Vec<_>>()
        .join(", ");
    errors.configuration(
        path,
        Message::new(messages::PACKAGER_MULTIPLE_ARTIFACTS)
            .arg(spec.kind)
            .arg(candidates.len())
            .arg(files),
    );
}

/// Platform-specific distributions need a platform on every artifact.
///
/// Returns `false` when an error was recorded.
pub fn validate_artifact_platforms(
    distribution: &Distribution,
    spec: &BackendSpec,
    candidates: &[&Artifact],
    path: &str,
    errors: &mut Errors,
) -> bool {
    if !distribution.distribution_type.is_platform_specific() {
        return true;
    }

    let mut valid = true;
    for artifact in candidates {
        if artifact.platform().is_none() {
            errors.configuration(
                format!("{}.artifact", path),
                Message::new(messages::PLATFORM_CHECK)
                    .arg(&distribution.name)
                    .arg(distribution.distribution_type)
                    .arg(spec.kind)
                    .arg(artifact.path.display()),
            );
            valid = false;
        }
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::active::Active;
    use crate::core::distribution::DistributionType;
    use crate::packagers::{brew, macports};
    use crate::validation::errors::ErrorCategory;

    fn project() -> Project {
        Project::new("app", "1.0.0")
    }

    #[test]
    fn test_candidates_filter_platform_and_extension() {
        let distribution = Distribution::new("app", DistributionType::Binary)
            .with_artifact(Artifact::new("app-osx.zip").with_platform("osx-x86_64"))
            .with_artifact(Artifact::new("app-win.zip").with_platform("windows-x86_64"))
            .with_artifact(Artifact::new("app-osx.exe").with_platform("osx-x86_64"));

        let candidates = candidate_artifacts(&distribution, &macports::SPEC, &project());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file_name(), "app-osx.zip");
    }

    #[test]
    fn test_inactive_artifacts_are_not_candidates() {
        let mut snapshot_only = Artifact::new("app-osx.zip").with_platform("osx");
        snapshot_only.active = Some(Active::Snapshot);
        let distribution = Distribution::new("app", DistributionType::Binary).with_artifact(snapshot_only);

        assert!(candidate_artifacts(&distribution, &macports::SPEC, &project()).is_empty());
    }

    #[test]
    fn test_multiple_artifacts_message() {
        let a = Artifact::new("a.zip");
        let b = Artifact::new("b.zip");
        let mut errors = Errors::new();
        report_multiple_artifacts("distribution.bar.brew", &brew::SPEC, &[&a, &b], &mut errors);

        let entry = errors.iter().next().unwrap();
        assert_eq!(entry.path, "distribution.bar.brew");
        assert_eq!(entry.category, ErrorCategory::Configuration);
        assert_eq!(
            entry.message.text(),
            "brew can only package a single artifact but 2 match: a.zip, b.zip"
        );
    }

    #[test]
    fn test_platform_required_on_platform_specific_types() {
        let artifact = Artifact::new("app.zip");
        let binary = Distribution::new("app", DistributionType::Binary).with_artifact(artifact.clone());
        let java = Distribution::new("app", DistributionType::JavaBinary).with_artifact(artifact.clone());

        let mut errors = Errors::new();
        assert!(validate_artifact_platforms(
            &java,
            &macports::SPEC,
            &[&artifact],
            "distribution.app.macports",
            &mut errors
        ));
        assert!(errors.is_empty());

        assert!(!validate_artifact_platforms(
            &binary,
            &macports::SPEC,
            &[&artifact],
            "distribution.app.macports",
            &mut errors
        ));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.iter().next().unwrap().path,
            "distribution.app.macports.artifact"
        );
    }
}
