//! Template properties for a resolved packager.

use crate::core::model::Model;
use crate::core::packager::{BackendConfig, ResolvedPackager};
use crate::template::{Props, TemplateFunctions, TemplateValue};

fn text(props: &mut Props, key: &str, value: impl Into<String>) {
    props.insert(key.to_string(), TemplateValue::Text(value.into()));
}

fn list(props: &mut Props, key: &str, value: &[String]) {
    props.insert(key.to_string(), TemplateValue::List(value.to_vec()));
}

/// Build the property map templates of `resolved` render against.
///
/// Extra properties are added last without overriding built-in keys.
/// String extras become text, everything else stays JSON.
pub fn template_props(model: &Model, resolved: &ResolvedPackager) -> Props {
    let mut props = Props::new();

    text(&mut props, "projectName", &model.project.name);
    text(&mut props, "projectVersion", &model.project.version);
    text(&mut props, "distributionName", &resolved.distribution);
    text(&mut props, "packagerName", resolved.kind.as_str());
    text(&mut props, "packageName", &resolved.package_name);
    text(&mut props, "revision", resolved.revision.to_string());
    list(&mut props, "categories", &resolved.categories);
    list(&mut props, "maintainers", &resolved.maintainers);

    text(&mut props, "artifactFile", resolved.artifact.file_name());
    text(
        &mut props,
        "artifactPath",
        resolved.artifact.resolved_path(&model.basedir).display().to_string(),
    );
    if let Some(platform) = resolved.artifact.platform() {
        text(&mut props, "artifactPlatform", platform);
    }

    text(&mut props, "repositoryOwner", &resolved.repository.owner);
    text(&mut props, "repositoryName", &resolved.repository.name);
    text(&mut props, "repositoryBranch", &resolved.repository.branch);
    text(&mut props, "commitAuthorName", &resolved.commit_author.name);
    text(&mut props, "commitAuthorEmail", &resolved.commit_author.email);

    match &resolved.backend {
        BackendConfig::Macports => {}
        BackendConfig::Brew(brew) => {
            if let Some(ref name) = brew.formula_name {
                text(&mut props, "brewFormulaName", name);
            }
            if let Some(ref dependencies) = brew.dependencies {
                let value = dependencies
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect();
                props.insert(
                    "brewDependencies".to_string(),
                    TemplateValue::Json(serde_json::Value::Object(value)),
                );
            }
            if let Some(ref livecheck) = brew.livecheck {
                list(&mut props, "brewLivecheck", livecheck);
            }
        }
        BackendConfig::Scoop(scoop) => {
            if let Some(ref url) = scoop.checkver_url {
                text(&mut props, "scoopCheckverUrl", url);
            }
            if let Some(ref url) = scoop.autoupdate_url {
                text(&mut props, "scoopAutoupdateUrl", url);
            }
        }
        BackendConfig::Spec(spec) => {
            list(&mut props, "specRequires", spec.requires.as_deref().unwrap_or(&[]));
        }
    }

    for (key, value) in &resolved.extra_properties {
        if props.contains_key(key) {
            continue;
        }
        let value = match value {
            serde_json::Value::String(s) => TemplateValue::Text(s.clone()),
            other => TemplateValue::Json(other.clone()),
        };
        props.insert(key.clone(), value);
    }

    TemplateFunctions::apply(&mut props);
    props
}
