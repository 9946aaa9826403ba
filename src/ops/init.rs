//! Implementation of `packwright init`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::model::{generate_default_model, MODEL_FILE};
use crate::util::fs::write_string;

/// Write a starter `packwright.toml` into `dir`.
///
/// `name` defaults to the directory name. Returns the written path.
pub fn init_model(dir: &Path, name: Option<&str>) -> Result<PathBuf> {
    let model_path = dir.join(MODEL_FILE);
    if model_path.exists() {
        bail!("`{}` already exists in `{}`", MODEL_FILE, dir.display());
    }

    let name = match name {
        Some(name) => name.to_string(),
        None => match dir.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => bail!(
                "cannot infer a project name from `{}`, pass --name",
                dir.display()
            ),
        },
    };

    write_string(&model_path, &generate_default_model(&name))?;
    tracing::debug!("wrote {}", model_path.display());
    Ok(model_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Model;
    use tempfile::TempDir;

    #[test]
    fn test_init_uses_directory_name() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("mytool");

        let path = init_model(&dir, None).unwrap();
        let model = Model::load(&path).unwrap();
        assert_eq!(model.project.name, "mytool");
    }

    #[test]
    fn test_init_dotted_directory_loads_back() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("my.tool");

        let path = init_model(&dir, None).unwrap();
        let model = Model::load(&path).unwrap();
        assert_eq!(model.project.name, "my.tool");
        assert!(model.distribution("my.tool").is_some());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        init_model(tmp.path(), Some("app")).unwrap();

        let err = init_model(tmp.path(), Some("app")).unwrap_err();
        assert!(format!("{}", err).contains("already exists"));
    }
}
