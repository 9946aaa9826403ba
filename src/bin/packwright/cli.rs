//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use packwright::packagers::PackagerKind;
use packwright::util::config::OutputFormat;
use packwright::util::hash::Algorithm;

/// packwright - resolve and validate release packagers
#[derive(Parser)]
#[command(name = "packwright")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Model file to use instead of the nearest packwright.toml
    #[arg(long, global = true, value_name = "FILE", env = "PACKWRIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every packager of every distribution
    Validate(ValidateArgs),

    /// Show how one packager of one distribution resolves
    Show(ShowArgs),

    /// List the supported packager backends
    Packagers(PackagersArgs),

    /// Write a starter packwright.toml
    Init(InitArgs),

    /// Compute checksums of a file
    Checksum(ChecksumArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Validate pairs one at a time
    #[arg(long)]
    pub no_parallel: bool,

    /// Worker threads for parallel validation
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Report format (human, json)
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Distribution name
    pub distribution: String,

    /// Packager backend (brew, macports, scoop, spec)
    pub packager: PackagerKind,

    /// Also print template properties
    #[arg(long)]
    pub props: bool,
}

#[derive(Args)]
pub struct PackagersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct ChecksumArgs {
    /// File to hash
    pub file: PathBuf,

    /// Algorithms to compute (defaults to the model's set, else sha-256)
    #[arg(short, long, value_delimiter = ',')]
    pub algorithm: Vec<Algorithm>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
