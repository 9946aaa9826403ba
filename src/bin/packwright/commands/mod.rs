//! Command implementations

pub mod checksum;
pub mod completions;
pub mod init;
pub mod packagers;
pub mod show;
pub mod validate;

use anyhow::Result;

use packwright::core::model::Model;
use packwright::GlobalContext;

/// Load the model the context points at.
pub fn load_model(ctx: &GlobalContext) -> Result<Model> {
    let path = ctx.model_path()?;
    tracing::debug!("loading {}", path.display());
    Ok(Model::load(&path)?)
}
