//! Template directory validation.

use std::path::{Path, PathBuf};

use crate::core::packager::PackagerDecl;
use crate::packagers::PackagerKind;
use crate::util::messages::{self, Message};
use crate::validation::errors::Errors;

/// Root of the conventional per-distribution template directories.
pub const DEFAULT_TEMPLATE_ROOT: &str = "src/packwright/distributions";

/// Existence checks for template locations.
pub trait TemplateResource: Send + Sync {
    /// Whether a template directory exists.
    fn exists(&self, reference: &Path) -> bool;
}

/// Templates on the local filesystem, relative to the model's directory.
#[derive(Debug, Clone)]
pub struct FsTemplateResource {
    basedir: PathBuf,
}

impl FsTemplateResource {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        FsTemplateResource {
            basedir: basedir.into(),
        }
    }
}

impl TemplateResource for FsTemplateResource {
    fn exists(&self, reference: &Path) -> bool {
        if reference.is_absolute() {
            reference.is_dir()
        } else {
            self.basedir.join(reference).is_dir()
        }
    }
}

/// Resolved template settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSettings {
    pub directory: PathBuf,
    pub skip_templates: Vec<String>,
}

/// The conventional template directory of a distribution and backend.
pub fn default_template_directory(distribution: &str, kind: PackagerKind) -> PathBuf {
    Path::new(DEFAULT_TEMPLATE_ROOT)
        .join(distribution)
        .join(kind.as_str())
}

/// Resolve the template directory and skipped templates.
///
/// A declared directory (child, else parent) must exist. Undeclared
/// directories fall back to the conventional location without a check.
pub fn validate_template(
    child: &PackagerDecl,
    parent: &PackagerDecl,
    distribution: &str,
    templates: &dyn TemplateResource,
    path: &str,
    errors: &mut Errors,
) -> (TemplateSettings, bool) {
    let declared = child
        .template_directory
        .clone()
        .or_else(|| parent.template_directory.clone())
        .filter(|d| !d.as_os_str().is_empty());

    let mut valid = true;
    let directory = match declared {
        Some(directory) => {
            if !templates.exists(&directory) {
                let key = format!("{}.template", path);
                errors.configuration(
                    key.clone(),
                    Message::new(messages::DIRECTORY_NOT_EXIST)
                        .arg(&key)
                        .arg(directory.display()),
                );
                valid = false;
            }
            directory
        }
        None => default_template_directory(distribution, child.kind()),
    };

    let skip_templates = child
        .skip_templates
        .clone()
        .or_else(|| parent.skip_templates.clone())
        .unwrap_or_default();

    (
        TemplateSettings {
            directory,
            skip_templates,
        },
        valid,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct NoTemplates;

    impl TemplateResource for NoTemplates {
        fn exists(&self, _reference: &Path) -> bool {
            false
        }
    }

    #[test]
    fn test_undeclared_directory_uses_convention() {
        let child = PackagerDecl::new(PackagerKind::Macports);
        let parent = PackagerDecl::new(PackagerKind::Macports);
        let mut errors = Errors::new();

        let (settings, valid) =
            validate_template(&child, &parent, "app", &NoTemplates, "distribution.app.macports", &mut errors);
        assert!(valid);
        assert!(errors.is_empty());
        assert_eq!(
            settings.directory,
            PathBuf::from("src/packwright/distributions/app/macports")
        );
    }

    #[test]
    fn test_missing_declared_directory() {
        let mut child = PackagerDecl::new(PackagerKind::Macports);
        child.template_directory = Some(PathBuf::from("templates/macports"));
        let parent = PackagerDecl::new(PackagerKind::Macports);
        let mut errors = Errors::new();

        let (_, valid) =
            validate_template(&child, &parent, "app", &NoTemplates, "distribution.app.macports", &mut errors);
        assert!(!valid);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.iter().next().unwrap().path,
            "distribution.app.macports.template"
        );
    }

    #[test]
    fn test_parent_directory_and_skip_templates_inherit() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("tpl")).unwrap();
        let resource = FsTemplateResource::new(tmp.path());

        let child = PackagerDecl::new(PackagerKind::Brew);
        let mut parent = PackagerDecl::new(PackagerKind::Brew);
        parent.template_directory = Some(PathBuf::from("tpl"));
        parent.skip_templates = Some(vec!["README.md.tpl".to_string()]);
        let mut errors = Errors::new();

        let (settings, valid) =
            validate_template(&child, &parent, "app", &resource, "distribution.app.brew", &mut errors);
        assert!(valid);
        assert_eq!(settings.directory, PathBuf::from("tpl"));
        assert_eq!(settings.skip_templates, vec!["README.md.tpl".to_string()]);
    }
}
