//! `packwright init` command

use anyhow::Result;

use crate::cli::InitArgs;
use packwright::ops::init_model;
use packwright::GlobalContext;

pub fn execute(args: InitArgs, ctx: &GlobalContext) -> Result<()> {
    let dir = match args.path {
        Some(path) if path.is_absolute() => path,
        Some(path) => ctx.cwd().join(path),
        None => ctx.cwd().to_path_buf(),
    };

    let path = init_model(&dir, args.name.as_deref())?;
    eprintln!("     Created {}", path.display());

    Ok(())
}
