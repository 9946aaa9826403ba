//! `packwright validate` command

use anyhow::Result;

use crate::cli::ValidateArgs;
use packwright::ops::{format_report, report_json, validate_model, ValidateOptions};
use packwright::util::config::OutputFormat;
use packwright::validation::FsTemplateResource;
use packwright::GlobalContext;

use super::load_model;

pub fn execute(args: ValidateArgs, ctx: &GlobalContext) -> Result<()> {
    let config = ctx.config();
    let model = load_model(ctx)?;
    let templates = FsTemplateResource::new(&model.basedir);

    let opts = ValidateOptions {
        parallel: !args.no_parallel && config.parallel(),
        jobs: args.jobs.or(config.validate.jobs),
        strict: args.strict || config.validate.strict,
    };

    let report = validate_model(&model, &templates, &opts)?;

    match args.format.unwrap_or_else(|| config.format()) {
        OutputFormat::Human => print!("{}", format_report(&report, ctx.is_verbose(), ctx.color())),
        OutputFormat::Json => println!("{}", report_json(&report)?),
    }

    // Exit with error code if validation failed
    if !report.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}
