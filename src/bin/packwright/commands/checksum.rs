//! `packwright checksum` command

use anyhow::Result;

use crate::cli::ChecksumArgs;
use packwright::util::hash::{checksum_file, Algorithm};
use packwright::GlobalContext;

use super::load_model;

pub fn execute(args: ChecksumArgs, ctx: &GlobalContext) -> Result<()> {
    let algorithms: Vec<Algorithm> = if !args.algorithm.is_empty() {
        args.algorithm
    } else {
        match load_model(ctx) {
            Ok(model) => model.algorithms.into_iter().collect(),
            Err(e) => {
                tracing::debug!("no model algorithms ({:#}), using sha-256", e);
                vec![Algorithm::Sha256]
            }
        }
    };

    let file = if args.file.is_absolute() {
        args.file
    } else {
        ctx.cwd().join(args.file)
    };

    for algorithm in algorithms {
        let checksum = checksum_file(algorithm, &file)?;
        println!("{:<9} {}", algorithm.as_str(), checksum);
    }

    Ok(())
}
