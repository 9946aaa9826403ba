//! Default inheritance resolver.
//!
//! Fills unset packager fields from the global packager of the same
//! backend, then from the backend's hard-coded fallbacks. An explicit child
//! value is never overwritten, even when it is zero or empty. Parent lists
//! only count when they are non-empty. Applying the resolver twice gives
//! the same result as applying it once.

use crate::core::packager::PackagerDecl;
use crate::core::release::Releaser;
use crate::packagers::BackendSpec;
use crate::validation::pipeline::PipelineError;

/// Child list, else non-empty parent list.
fn inherit_list(child: &Option<Vec<String>>, parent: &Option<Vec<String>>) -> Option<Vec<String>> {
    child
        .clone()
        .or_else(|| parent.clone().filter(|list| !list.is_empty()))
}

/// Resolve revision, maintainers, categories and the backend payload.
///
/// All other fields are copied from the child unchanged.
pub fn inherit_defaults(
    child: &PackagerDecl,
    parent: &PackagerDecl,
    spec: &BackendSpec,
    distribution: &str,
    releaser: &dyn Releaser,
) -> Result<PackagerDecl, PipelineError> {
    let backend = child
        .backend
        .inherit(&parent.backend)
        .ok_or_else(|| PipelineError::PayloadMismatch {
            kind: spec.kind,
            found: if child.kind() != spec.kind {
                child.kind()
            } else {
                parent.kind()
            },
        })?
        .with_fallbacks(distribution, releaser);

    let revision = child
        .revision
        .or(parent.revision)
        .unwrap_or(spec.default_revision);

    let maintainers = inherit_list(&child.maintainers, &parent.maintainers).unwrap_or_default();

    let categories = inherit_list(&child.categories, &parent.categories).unwrap_or_else(|| {
        spec.default_categories
            .iter()
            .map(|c| c.to_string())
            .collect()
    });

    Ok(PackagerDecl {
        revision: Some(revision),
        maintainers: Some(maintainers),
        categories: Some(categories),
        backend,
        ..child.clone()
    })
}
