//! Implementation of `packwright validate`.
//!
//! Every (distribution, backend) pair is validated independently, in
//! parallel by default. Results are merged afterwards in declaration
//! order: distributions as written, backends in `PackagerKind::ALL` order.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::core::active::Active;
use crate::core::model::{DistributionDecl, Model};
use crate::core::packager::ResolvedPackager;
use crate::packagers::{PackagerKind, PackagerRegistry};
use crate::util::hash::Algorithm;
use crate::validation::activation::DisabledReason;
use crate::validation::errors::{ErrorEntry, Errors};
use crate::validation::pipeline::{resolve_packager, PackagerOutcome, PipelineContext};
use crate::validation::template::TemplateResource;

/// Options for validation.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Validate pairs in parallel
    pub parallel: bool,

    /// Worker threads (None = rayon default)
    pub jobs: Option<usize>,

    /// Treat warnings as errors
    pub strict: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        ValidateOptions {
            parallel: true,
            jobs: None,
            strict: false,
        }
    }
}

/// Merged result of validating a whole model.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// One outcome per pair, in declaration order
    pub outcomes: Vec<PackagerOutcome>,

    /// Every pair's errors, in declaration order
    pub errors: Errors,

    /// Model algorithms plus the backend checksum of every pair that
    /// matched exactly one artifact, enabled or not
    pub algorithms: BTreeSet<Algorithm>,

    pub strict: bool,
}

impl ValidationReport {
    /// No configuration errors, and no warnings in strict mode.
    pub fn is_valid(&self) -> bool {
        self.errors.is_valid() && !(self.strict && self.errors.has_warnings())
    }

    pub fn enabled(&self) -> impl Iterator<Item = &ResolvedPackager> {
        self.outcomes.iter().filter_map(|o| o.resolution.resolved())
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    pub fn disabled_count(&self) -> usize {
        self.outcomes.len() - self.enabled_count()
    }
}

/// Grow `algorithms` by every outcome's requirements.
///
/// The set only grows; inserting an algorithm twice is a no-op.
pub fn merge_algorithms(algorithms: &mut BTreeSet<Algorithm>, outcomes: &[PackagerOutcome]) {
    for outcome in outcomes {
        algorithms.extend(outcome.required_algorithms.iter().copied());
    }
}

/// Validate every packager of every distribution.
pub fn validate_model(
    model: &Model,
    templates: &dyn TemplateResource,
    opts: &ValidateOptions,
) -> Result<ValidationReport> {
    // Set up rayon thread pool
    if let Some(j) = opts.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(j)
            .build_global()
            .ok(); // Ignore if already set
    }

    let registry = PackagerRegistry::new();
    let ctx = PipelineContext::new(model, templates, &registry);

    let pairs: Vec<(&DistributionDecl, PackagerKind)> = model
        .distributions
        .iter()
        .flat_map(|decl| PackagerKind::ALL.into_iter().map(move |kind| (decl, kind)))
        .collect();

    tracing::debug!("validating {} packager(s)", pairs.len());

    let results: Vec<_> = if opts.parallel {
        pairs
            .par_iter()
            .map(|(decl, kind)| resolve_packager(&ctx, decl, *kind))
            .collect()
    } else {
        pairs
            .iter()
            .map(|(decl, kind)| resolve_packager(&ctx, decl, *kind))
            .collect()
    };

    let mut outcomes = Vec::with_capacity(results.len());
    for result in results {
        outcomes.push(result.context("packager validation aborted")?);
    }

    let mut errors = Errors::new();
    for outcome in &outcomes {
        errors.extend(outcome.errors.clone());
    }

    let mut algorithms = model.algorithms.clone();
    merge_algorithms(&mut algorithms, &outcomes);

    Ok(ValidationReport {
        outcomes,
        errors,
        algorithms,
        strict: opts.strict,
    })
}

/// Resolve a single packager for inspection.
pub fn resolve_one(
    model: &Model,
    templates: &dyn TemplateResource,
    distribution: &str,
    kind: PackagerKind,
) -> Result<PackagerOutcome> {
    let decl = model.distribution(distribution).with_context(|| {
        let known = model
            .distributions
            .iter()
            .map(|d| d.distribution.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown distribution `{}` (known: {})", distribution, known)
    })?;

    let registry = PackagerRegistry::new();
    let ctx = PipelineContext::new(model, templates, &registry);
    resolve_packager(&ctx, decl, kind).context("packager validation aborted")
}

/// Format a validation report for terminal output.
pub fn format_report(report: &ValidationReport, verbose: bool, color: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(output, "Packagers:").unwrap();
    for outcome in &report.outcomes {
        let name = format!("{}/{}", outcome.distribution, outcome.kind);
        match outcome.resolution.resolved() {
            Some(resolved) => {
                writeln!(
                    output,
                    "  [OK] {} -> {} ({})",
                    name,
                    resolved.repository.slug(),
                    resolved.artifact.file_name()
                )
                .unwrap();
                if verbose {
                    writeln!(output, "      package: {} r{}", resolved.package_name, resolved.revision)
                        .unwrap();
                    writeln!(output, "      templates: {}", resolved.template_directory.display())
                        .unwrap();
                }
            }
            None => {
                let reason = outcome.resolution.reason();
                let noisy = matches!(
                    reason,
                    Some(DisabledReason::MultipleArtifacts | DisabledReason::InvalidConfiguration)
                );
                if verbose || noisy {
                    writeln!(
                        output,
                        "  [--] {} disabled ({})",
                        name,
                        reason.map(|r| r.as_str()).unwrap_or("inactive")
                    )
                    .unwrap();
                }
            }
        }
    }

    let algorithms = report
        .algorithms
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(output, "\nChecksums: {}", algorithms).unwrap();

    if !report.errors.is_empty() {
        writeln!(output).unwrap();
        for entry in report.errors.iter() {
            write!(output, "{}", entry.to_diagnostic().format(color)).unwrap();
        }
    }

    writeln!(
        output,
        "\nSummary: {} enabled, {} disabled, {} error(s), {} warning(s)",
        report.enabled_count(),
        report.disabled_count(),
        report.errors.configuration_count(),
        report.errors.warning_count()
    )
    .unwrap();

    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    algorithms: &'a BTreeSet<Algorithm>,
    packagers: Vec<JsonPackager<'a>>,
    errors: Vec<&'a ErrorEntry>,
}

#[derive(Serialize)]
struct JsonPackager<'a> {
    distribution: &'a str,
    packager: PackagerKind,
    enabled: bool,
    active: Active,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<DisabledReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<&'a ResolvedPackager>,
}

/// Render a validation report as JSON.
pub fn report_json(report: &ValidationReport) -> Result<String> {
    let json = JsonReport {
        valid: report.is_valid(),
        algorithms: &report.algorithms,
        packagers: report
            .outcomes
            .iter()
            .map(|o| JsonPackager {
                distribution: &o.distribution,
                packager: o.kind,
                enabled: o.resolution.is_enabled(),
                active: o.resolution.active(),
                reason: o.resolution.reason(),
                resolved: o.resolution.resolved(),
            })
            .collect(),
        errors: report.errors.iter().collect(),
    };
    serde_json::to_string_pretty(&json).context("failed to serialize validation report")
}
