//! Tap/repository resolver.

use crate::core::active::{inherit_active, Active};
use crate::core::project::Project;
use crate::core::release::Releaser;
use crate::core::repository::{
    RepositoryDecl, ResolvedRepository, DEFAULT_BRANCH, DEFAULT_REPOSITORY_ACTIVE,
};
use crate::packagers::BackendSpec;
use crate::util::messages::{self, Message};
use crate::validation::errors::Errors;

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn pick(child: &Option<String>, parent: &Option<String>) -> Option<String> {
    non_blank(child).or_else(|| non_blank(parent))
}

/// Resolve the destination repository of a packager.
///
/// Identity problems are recorded under `<path>.repository.<field>`; the
/// caller decides whether they disable the packager.
pub fn resolve_repository(
    child: &RepositoryDecl,
    parent: &RepositoryDecl,
    spec: &BackendSpec,
    project: &Project,
    releaser: &dyn Releaser,
    path: &str,
    errors: &mut Errors,
) -> ResolvedRepository {
    let active: Active = inherit_active(child.active, parent.active).unwrap_or(DEFAULT_REPOSITORY_ACTIVE);
    let enabled = active.check(project);

    let owner = pick(&child.owner, &parent.owner)
        .or_else(|| releaser.owner().map(str::to_string))
        .unwrap_or_default();
    let name = pick(&child.name, &parent.name).unwrap_or_else(|| spec.repository_name.to_string());
    let branch = pick(&child.branch, &parent.branch).unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    let token = pick(&child.token, &parent.token).or_else(|| releaser.token().map(str::to_string));

    if enabled {
        let repository_path = format!("{}.repository", path);
        for (field, value) in [("owner", &owner), ("name", &name), ("branch", &branch)] {
            if value.trim().is_empty() {
                let key = format!("{}.{}", repository_path, field);
                errors.configuration(key.clone(), Message::new(messages::MUST_NOT_BE_BLANK).arg(&key));
            }
        }
        if token.is_none() {
            errors.warning(
                repository_path.clone(),
                Message::new(messages::TOKEN_MISSING).arg(&repository_path),
            );
        }
    } else {
        tracing::debug!("{}.repository: {}", path, Message::new(messages::DISABLED));
    }

    ResolvedRepository {
        active,
        enabled,
        owner,
        name,
        branch,
        token,
    }
}
