//! packwright CLI - resolve and validate release packagers

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use packwright::core::model::ModelError;
use packwright::util::diagnostic::render_report;
use packwright::GlobalContext;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ModelError>() {
            Some(ModelError::Parse(parse)) => eprint!("{}", render_report(parse, color)),
            _ => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("packwright=debug")
    } else {
        EnvFilter::new("packwright=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?.with_model(cli.config);
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color && ctx.config().color());

    // Execute command
    match cli.command {
        Commands::Validate(args) => commands::validate::execute(args, &ctx),
        Commands::Show(args) => commands::show::execute(args, &ctx),
        Commands::Packagers(args) => commands::packagers::execute(args),
        Commands::Init(args) => commands::init::execute(args, &ctx),
        Commands::Checksum(args) => commands::checksum::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
