//! `packwright packagers` command

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::PackagersArgs;
use packwright::packagers::{BackendSpec, PackagerRegistry};

#[derive(Serialize)]
struct PackagerInfo<'a> {
    name: &'a str,
    description: &'a str,
    platforms: &'a [&'a str],
    distribution_types: Vec<&'a str>,
    checksum: Option<&'a str>,
    repository: &'a str,
}

impl<'a> From<&'a BackendSpec> for PackagerInfo<'a> {
    fn from(spec: &'a BackendSpec) -> Self {
        PackagerInfo {
            name: spec.kind.as_str(),
            description: spec.description,
            platforms: spec.platforms,
            distribution_types: spec
                .distribution_types
                .iter()
                .map(|(ty, _)| ty.as_str())
                .collect(),
            checksum: spec.checksum.map(|a| a.as_str()),
            repository: spec.repository_name,
        }
    }
}

pub fn execute(args: PackagersArgs) -> Result<()> {
    let registry = PackagerRegistry::new();
    let infos: Vec<PackagerInfo<'_>> = registry.all().map(PackagerInfo::from).collect();

    if args.json {
        let json = serde_json::to_string_pretty(&infos).context("failed to serialize packagers")?;
        println!("{}", json);
        return Ok(());
    }

    for info in &infos {
        println!("{:<10} {}", info.name, info.description);
        println!("           platforms: {}", info.platforms.join(", "));
        println!("           types: {}", info.distribution_types.join(", "));
        if let Some(checksum) = info.checksum {
            println!("           checksum: {}", checksum);
        }
        println!("           repository: {}", info.repository);
    }

    Ok(())
}
