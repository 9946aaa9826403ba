//! Packager validation pipeline.
//!
//! One run per (distribution, backend) pair:
//! 1. inherit activation
//! 2. enabled / release support, short-circuit when disabled
//! 3. candidate artifacts and their cardinality
//! 4. revision, maintainers, categories, backend fields, extra properties
//! 5. commit author, repository, template, continue-on-error
//! 6. package name
//! 7. artifact platform compatibility
//!
//! A run never mutates the model. It returns its own errors and the
//! checksum algorithms the backend needs; the caller merges them.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::active::Active;
use crate::core::model::{DistributionDecl, Model};
use crate::core::packager::{
    CommitAuthor, CommitAuthorDecl, PackagerDecl, ResolvedPackager, DEFAULT_COMMIT_AUTHOR_EMAIL,
    DEFAULT_COMMIT_AUTHOR_NAME,
};
use crate::core::release::{ReleaseConfig, Releaser};
use crate::packagers::{PackagerKind, PackagerRegistry};
use crate::util::hash::Algorithm;
use crate::validation::activation::{resolve_activation, Activation, DisabledReason};
use crate::validation::artifacts::{
    candidate_artifacts, report_multiple_artifacts, validate_artifact_platforms,
};
use crate::validation::defaults::inherit_defaults;
use crate::validation::errors::Errors;
use crate::validation::extra::merge_extra_properties;
use crate::validation::repository::resolve_repository;
use crate::validation::template::{validate_template, TemplateResource};

/// Invariant violations that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no global packager configured for backend `{0}`")]
    MissingGlobalPackager(PackagerKind),

    #[error("backend `{0}` is not registered")]
    MissingBackend(PackagerKind),

    #[error("backend `{kind}` was given a `{found}` payload")]
    PayloadMismatch {
        kind: PackagerKind,
        found: PackagerKind,
    },
}

/// Everything a run reads.
pub struct PipelineContext<'a> {
    pub model: &'a Model,
    pub releaser: &'a dyn Releaser,
    pub templates: &'a dyn TemplateResource,
    pub registry: &'a PackagerRegistry,
}

impl<'a> PipelineContext<'a> {
    pub fn new(
        model: &'a Model,
        templates: &'a dyn TemplateResource,
        registry: &'a PackagerRegistry,
    ) -> Self {
        PipelineContext {
            model,
            releaser: &model.release,
            templates,
            registry,
        }
    }
}

/// Final state of a packager.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PackagerResolution {
    Disabled {
        reason: DisabledReason,
        active: Active,
    },
    Enabled(Box<ResolvedPackager>),
}

impl PackagerResolution {
    pub fn is_enabled(&self) -> bool {
        matches!(self, PackagerResolution::Enabled(_))
    }

    /// The resolved activation, never unset.
    pub fn active(&self) -> Active {
        match self {
            PackagerResolution::Disabled { active, .. } => *active,
            PackagerResolution::Enabled(packager) => packager.active,
        }
    }

    pub fn resolved(&self) -> Option<&ResolvedPackager> {
        match self {
            PackagerResolution::Enabled(packager) => Some(packager.as_ref()),
            PackagerResolution::Disabled { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<DisabledReason> {
        match self {
            PackagerResolution::Disabled { reason, .. } => Some(*reason),
            PackagerResolution::Enabled(_) => None,
        }
    }
}

/// What one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PackagerOutcome {
    pub distribution: String,
    pub kind: PackagerKind,
    pub resolution: PackagerResolution,
    pub errors: Errors,
    /// Checksum algorithms this packager needs on top of the model's
    pub required_algorithms: BTreeSet<Algorithm>,
}

/// First value that is set and non-blank.
fn first_non_blank<'a>(values: impl IntoIterator<Item = &'a Option<String>>) -> Option<String> {
    values
        .into_iter()
        .filter_map(|value| value.as_deref())
        .find(|value| !value.trim().is_empty())
        .map(str::to_string)
}

fn resolve_commit_author(
    child: &CommitAuthorDecl,
    parent: &CommitAuthorDecl,
    release: &ReleaseConfig,
) -> CommitAuthor {
    let fallback = &release.commit_author;
    CommitAuthor {
        name: first_non_blank([&child.name, &parent.name, &fallback.name])
            .unwrap_or_else(|| DEFAULT_COMMIT_AUTHOR_NAME.to_string()),
        email: first_non_blank([&child.email, &parent.email, &fallback.email])
            .unwrap_or_else(|| DEFAULT_COMMIT_AUTHOR_EMAIL.to_string()),
    }
}

fn resolve_package_name(child: &PackagerDecl, parent: &PackagerDecl, distribution: &str) -> String {
    first_non_blank([&child.package_name, &parent.package_name])
        .unwrap_or_else(|| distribution.to_string())
}

/// Validate one packager of one distribution.
pub fn resolve_packager(
    ctx: &PipelineContext<'_>,
    decl: &DistributionDecl,
    kind: PackagerKind,
) -> Result<PackagerOutcome, PipelineError> {
    let spec = ctx
        .registry
        .get(kind)
        .ok_or(PipelineError::MissingBackend(kind))?;
    let parent = ctx
        .model
        .packager(kind)
        .ok_or(PipelineError::MissingGlobalPackager(kind))?;
    if parent.kind() != kind {
        return Err(PipelineError::PayloadMismatch {
            kind,
            found: parent.kind(),
        });
    }
    let child = decl.packager(kind);
    if child.kind() != kind {
        return Err(PipelineError::PayloadMismatch {
            kind,
            found: child.kind(),
        });
    }

    let distribution = &decl.distribution;
    let project = &ctx.model.project;
    let path = format!("distribution.{}.{}", distribution.name, kind);
    tracing::debug!("{}", path);

    let mut outcome = PackagerOutcome {
        distribution: distribution.name.clone(),
        kind,
        resolution: PackagerResolution::Disabled {
            reason: DisabledReason::Inactive,
            active: Active::Never,
        },
        errors: Errors::new(),
        required_algorithms: BTreeSet::new(),
    };

    let disable = |outcome: &mut PackagerOutcome, reason: DisabledReason, active: Active| {
        tracing::debug!("{}: {}", path, reason.message(distribution.distribution_type));
        outcome.resolution = PackagerResolution::Disabled { reason, active };
    };

    // 1-2. activation
    let activation = resolve_activation(
        child.active,
        parent.active,
        distribution.distribution_type,
        spec,
        project,
        ctx.releaser,
    );
    tracing::debug!("{}: active = {}", path, activation.active());
    let active = match activation {
        Activation::Enabled(active) => active,
        Activation::Disabled { reason, active } => {
            disable(&mut outcome, reason, active);
            return Ok(outcome);
        }
    };

    // 3. candidates
    let candidates = candidate_artifacts(distribution, spec, project);
    let artifact = match candidates.as_slice() {
        [] => {
            disable(&mut outcome, DisabledReason::NoArtifacts, Active::Never);
            return Ok(outcome);
        }
        [artifact] => (*artifact).clone(),
        _ => {
            report_multiple_artifacts(&path, spec, &candidates, &mut outcome.errors);
            disable(&mut outcome, DisabledReason::MultipleArtifacts, active);
            return Ok(outcome);
        }
    };
    if let Some(algorithm) = spec.checksum {
        outcome.required_algorithms.insert(algorithm);
    }

    // 4. defaults and backend-specific fields
    let defaults = inherit_defaults(&child, parent, spec, &distribution.name, ctx.releaser)?;
    let extra_properties = merge_extra_properties(
        &child.extra_properties,
        &parent.extra_properties,
        spec,
        distribution,
    );

    // 5. commit author, repository, template, continue-on-error
    let commit_author =
        resolve_commit_author(&child.commit_author, &parent.commit_author, &ctx.model.release);

    let mut repository_errors = Errors::new();
    let repository = resolve_repository(
        &child.repository,
        &parent.repository,
        spec,
        project,
        ctx.releaser,
        &path,
        &mut repository_errors,
    );
    let mut valid = !(spec.repository_required && repository_errors.has_configuration_errors());
    outcome.errors.extend(repository_errors);

    let (template, template_valid) = validate_template(
        &child,
        parent,
        &distribution.name,
        ctx.templates,
        &path,
        &mut outcome.errors,
    );
    valid &= template_valid;

    let continue_on_error = child
        .continue_on_error
        .or(parent.continue_on_error)
        .unwrap_or(false);

    let mut backend_errors = Errors::new();
    defaults.backend.validate(&path, &mut backend_errors);
    valid &= backend_errors.is_valid();
    outcome.errors.extend(backend_errors);

    // 6. package name
    let package_name = resolve_package_name(&child, parent, &distribution.name);

    // 7. platforms
    valid &= validate_artifact_platforms(
        distribution,
        spec,
        &[&artifact],
        &path,
        &mut outcome.errors,
    );

    if !valid {
        disable(&mut outcome, DisabledReason::InvalidConfiguration, active);
        return Ok(outcome);
    }

    outcome.resolution = PackagerResolution::Enabled(Box::new(ResolvedPackager {
        kind,
        distribution: distribution.name.clone(),
        active,
        artifact,
        revision: defaults.revision.unwrap_or(spec.default_revision),
        maintainers: defaults.maintainers.unwrap_or_default(),
        categories: defaults.categories.unwrap_or_default(),
        package_name,
        extra_properties,
        commit_author,
        continue_on_error,
        template_directory: template.directory,
        skip_templates: template.skip_templates,
        repository,
        backend: defaults.backend,
    }));
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distribution::{Artifact, Distribution, DistributionType};
    use crate::core::project::Project;
    use crate::core::release::ReleaserKind;
    use crate::packagers::scoop::ScoopConfig;
    use crate::packagers::{macports, BackendSpec};
    use crate::core::packager::BackendConfig;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    struct Templates(bool);

    impl TemplateResource for Templates {
        fn exists(&self, _reference: &Path) -> bool {
            self.0
        }
    }

    fn model(distributions: Vec<DistributionDecl>) -> Model {
        let mut packagers = BTreeMap::new();
        for kind in PackagerKind::ALL {
            packagers.insert(kind, PackagerDecl::new(kind).with_active(Active::Always));
        }
        Model {
            basedir: PathBuf::from("."),
            project: Project::new("app", "1.0.0"),
            release: ReleaseConfig {
                owner: Some("acme".to_string()),
                name: Some("app".to_string()),
                token: Some("secret".to_string()),
                ..Default::default()
            },
            algorithms: BTreeSet::from([Algorithm::Sha256]),
            packagers,
            distributions,
        }
    }

    fn foo() -> DistributionDecl {
        DistributionDecl::new(
            Distribution::new("foo", DistributionType::NativePackage)
                .with_artifact(Artifact::new("build/foo-1.0.0.dmg").with_platform("osx-x86_64")),
        )
    }

    fn run(model: &Model, decl: &DistributionDecl, kind: PackagerKind) -> PackagerOutcome {
        let registry = PackagerRegistry::new();
        let templates = Templates(true);
        let ctx = PipelineContext::new(model, &templates, &registry);
        resolve_packager(&ctx, decl, kind).unwrap()
    }

    #[test]
    fn test_macports_native_package_defaults() {
        let mut model = model(vec![foo()]);
        model
            .packagers
            .get_mut(&PackagerKind::Macports)
            .unwrap()
            .categories = Some(vec![]);

        let outcome = run(&model, &model.distributions[0], PackagerKind::Macports);
        assert!(outcome.errors.is_empty());
        let resolved = outcome.resolution.resolved().unwrap();
        assert_eq!(resolved.revision, 0);
        assert_eq!(resolved.categories, vec!["devel".to_string()]);
        assert_eq!(resolved.extra_properties.get("appName"), Some(&json!("foo.app")));
        assert_eq!(resolved.package_name, "foo");
        assert_eq!(resolved.repository.slug(), "acme/macports");
        assert_eq!(outcome.required_algorithms, BTreeSet::from([Algorithm::Rmd160]));
    }

    #[test]
    fn test_multiple_candidates_disable_with_one_error() {
        let bar = DistributionDecl::new(
            Distribution::new("bar", DistributionType::Binary)
                .with_artifact(Artifact::new("bar-osx-x86_64.zip").with_platform("osx-x86_64"))
                .with_artifact(Artifact::new("bar-osx-aarch_64.zip").with_platform("osx-aarch_64")),
        );
        let model = model(vec![bar]);

        let outcome = run(&model, &model.distributions[0], PackagerKind::Macports);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors.iter().next().unwrap().path, "distribution.bar.macports");
        assert_eq!(
            outcome.resolution,
            PackagerResolution::Disabled {
                reason: DisabledReason::MultipleArtifacts,
                active: Active::Always
            }
        );
        assert!(outcome.required_algorithms.is_empty());
    }

    #[test]
    fn test_zero_candidates_force_never() {
        let empty = DistributionDecl::new(Distribution::new("empty", DistributionType::Binary));
        let model = model(vec![empty]);

        let outcome = run(&model, &model.distributions[0], PackagerKind::Brew);
        assert!(outcome.errors.is_empty());
        assert_eq!(
            outcome.resolution,
            PackagerResolution::Disabled {
                reason: DisabledReason::NoArtifacts,
                active: Active::Never
            }
        );
    }

    #[test]
    fn test_release_unsupported_disables_without_errors() {
        let mut model = model(vec![foo()]);
        model.release.kind = ReleaserKind::Generic;

        let outcome = run(&model, &model.distributions[0], PackagerKind::Macports);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.resolution.reason(), Some(DisabledReason::ReleaseUnsupported));
    }

    #[test]
    fn test_missing_template_disables() {
        let mut decl = foo();
        let mut macports = PackagerDecl::new(PackagerKind::Macports);
        macports.template_directory = Some(PathBuf::from("missing"));
        decl = decl.with_packager(macports);
        let model = model(vec![decl]);

        let registry = PackagerRegistry::new();
        let templates = Templates(false);
        let ctx = PipelineContext::new(&model, &templates, &registry);
        let outcome = resolve_packager(&ctx, &model.distributions[0], PackagerKind::Macports).unwrap();

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(
            outcome.errors.iter().next().unwrap().path,
            "distribution.foo.macports.template"
        );
        assert_eq!(outcome.resolution.reason(), Some(DisabledReason::InvalidConfiguration));
        assert_eq!(outcome.resolution.active(), Active::Always);
    }

    #[test]
    fn test_platform_required_for_binary() {
        let decl = DistributionDecl::new(
            Distribution::new("tool", DistributionType::Binary).with_artifact(Artifact::new("tool.zip")),
        );
        let model = model(vec![decl]);

        let outcome = run(&model, &model.distributions[0], PackagerKind::Brew);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.resolution.reason(), Some(DisabledReason::InvalidConfiguration));
    }

    #[test]
    fn test_package_name_and_commit_author_precedence() {
        let mut decl = foo();
        let mut child = PackagerDecl::new(PackagerKind::Macports);
        child.package_name = Some("  ".to_string());
        child.commit_author.email = Some("child@example.com".to_string());
        decl = decl.with_packager(child);

        let mut model = model(vec![decl]);
        let parent = model.packagers.get_mut(&PackagerKind::Macports).unwrap();
        parent.package_name = Some("foo-port".to_string());
        model.release.commit_author.name = Some("Release Bot".to_string());

        let outcome = run(&model, &model.distributions[0], PackagerKind::Macports);
        let resolved = outcome.resolution.resolved().unwrap();
        assert_eq!(resolved.package_name, "foo-port");
        assert_eq!(resolved.commit_author.name, "Release Bot");
        assert_eq!(resolved.commit_author.email, "child@example.com");
    }

    #[test]
    fn test_set_values_are_not_trimmed() {
        let mut decl = foo();
        let mut child = PackagerDecl::new(PackagerKind::Macports);
        child.package_name = Some(" foo-port ".to_string());
        child.commit_author.name = Some(" Bot ".to_string());
        decl = decl.with_packager(child);
        let model = model(vec![decl]);

        let outcome = run(&model, &model.distributions[0], PackagerKind::Macports);
        let resolved = outcome.resolution.resolved().unwrap();
        assert_eq!(resolved.package_name, " foo-port ");
        assert_eq!(resolved.commit_author.name, " Bot ");
    }

    static REQUIRED_REPOSITORY: BackendSpec = BackendSpec {
        repository_required: true,
        ..macports::SPEC
    };

    #[test]
    fn test_required_repository_error_disables() {
        let mut model = model(vec![foo()]);
        model.release.owner = None;

        let mut registry = PackagerRegistry::empty();
        registry.register(&REQUIRED_REPOSITORY);
        let templates = Templates(true);
        let ctx = PipelineContext::new(&model, &templates, &registry);
        let outcome = resolve_packager(&ctx, &model.distributions[0], PackagerKind::Macports).unwrap();

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(
            outcome.errors.iter().next().unwrap().path,
            "distribution.foo.macports.repository.owner"
        );
        assert_eq!(
            outcome.resolution,
            PackagerResolution::Disabled {
                reason: DisabledReason::InvalidConfiguration,
                active: Active::Always
            }
        );
    }

    #[test]
    fn test_optional_repository_error_keeps_packager() {
        let mut model = model(vec![foo()]);
        model.release.owner = None;

        let outcome = run(&model, &model.distributions[0], PackagerKind::Macports);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors.has_configuration_errors());
        assert!(outcome.resolution.is_enabled());
    }

    #[test]
    fn test_missing_backend_is_fatal() {
        let model = model(vec![foo()]);

        let registry = PackagerRegistry::empty();
        let templates = Templates(true);
        let ctx = PipelineContext::new(&model, &templates, &registry);
        let err = resolve_packager(&ctx, &model.distributions[0], PackagerKind::Macports).unwrap_err();
        assert!(matches!(err, PipelineError::MissingBackend(PackagerKind::Macports)));
    }

    #[test]
    fn test_scoop_urls_default_from_release() {
        let decl = DistributionDecl::new(
            Distribution::new("app", DistributionType::JavaBinary).with_artifact(Artifact::new("app-1.0.0.zip")),
        );
        let model = model(vec![decl]);

        let outcome = run(&model, &model.distributions[0], PackagerKind::Scoop);
        assert!(outcome.errors.is_empty());
        let resolved = outcome.resolution.resolved().unwrap();
        match &resolved.backend {
            BackendConfig::Scoop(ScoopConfig { checkver_url, .. }) => assert_eq!(
                checkver_url.as_deref(),
                Some("https://github.com/acme/app/releases/latest")
            ),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_declared_model_is_not_mutated() {
        let model = model(vec![foo()]);
        let before = model.distributions[0].packager(PackagerKind::Macports);
        let _ = run(&model, &model.distributions[0], PackagerKind::Macports);
        assert_eq!(model.distributions[0].packager(PackagerKind::Macports), before);
        assert_eq!(model.packagers[&PackagerKind::Macports].categories, None);
    }

    #[test]
    fn test_missing_global_packager_is_fatal() {
        let mut model = model(vec![foo()]);
        model.packagers.remove(&PackagerKind::Macports);

        let registry = PackagerRegistry::new();
        let templates = Templates(true);
        let ctx = PipelineContext::new(&model, &templates, &registry);
        let err = resolve_packager(&ctx, &model.distributions[0], PackagerKind::Macports).unwrap_err();
        assert!(matches!(err, PipelineError::MissingGlobalPackager(PackagerKind::Macports)));
    }
}
