//! Core data structures for packwright.
//!
//! This module contains the foundational types used throughout packwright:
//! - Project context and activation (`Active`)
//! - Distributions and their artifacts
//! - Declared and resolved packagers, repositories, release hosts
//! - The release model loaded from `packwright.toml`

pub mod active;
pub mod distribution;
pub mod model;
pub mod packager;
pub mod project;
pub mod release;
pub mod repository;

pub use active::Active;
pub use distribution::{Artifact, Distribution, DistributionType};
pub use model::{find_model, DistributionDecl, Model, ModelError, MODEL_FILE};
pub use packager::{PackagerDecl, ResolvedPackager};
pub use project::Project;
pub use release::{ReleaseConfig, Releaser};
