//! `packwright show` command

use anyhow::{Context, Result};

use crate::cli::ShowArgs;
use packwright::ops::{resolve_one, template_props};
use packwright::template::TemplateValue;
use packwright::util::diagnostic::emit;
use packwright::validation::{FsTemplateResource, PackagerResolution};
use packwright::GlobalContext;

use super::load_model;

pub fn execute(args: ShowArgs, ctx: &GlobalContext) -> Result<()> {
    let model = load_model(ctx)?;
    let templates = FsTemplateResource::new(&model.basedir);

    let outcome = resolve_one(&model, &templates, &args.distribution, args.packager)?;

    match &outcome.resolution {
        PackagerResolution::Enabled(resolved) => {
            let json = serde_json::to_string_pretty(resolved.as_ref())
                .context("failed to serialize packager")?;
            println!("{}", json);

            if args.props {
                println!();
                for (key, value) in template_props(&model, resolved) {
                    match value {
                        TemplateValue::Text(s) => println!("{} = {}", key, s),
                        TemplateValue::List(l) => println!("{} = [{}]", key, l.join(", ")),
                        TemplateValue::Json(v) => println!("{} = {}", key, v),
                        TemplateValue::Timestamp(t) => println!("{} = {}", key, t.to_rfc3339()),
                        TemplateValue::Function(_) if ctx.is_verbose() => {
                            println!("{} = <function>", key)
                        }
                        TemplateValue::Function(_) => {}
                    }
                }
            }
        }
        PackagerResolution::Disabled { reason, active } => {
            println!(
                "{}.{} is disabled: {} (active: {})",
                outcome.distribution, outcome.kind, reason, active
            );
        }
    }

    for entry in outcome.errors.iter() {
        emit(&entry.to_diagnostic(), ctx.color());
    }

    Ok(())
}
