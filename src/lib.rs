//! packwright - resolve and validate release packagers
//!
//! This crate provides the core library functionality for packwright:
//! loading the release model, resolving every packager of every
//! distribution against its global defaults, and reporting what is
//! enabled, what is disabled and why.

pub mod core;
pub mod ops;
pub mod packagers;
pub mod template;
pub mod util;
pub mod validation;

pub use core::{
    active::Active, distribution::Distribution, model::Model, packager::ResolvedPackager,
    project::Project,
};

pub use packagers::PackagerKind;
pub use util::context::GlobalContext;
pub use validation::{Errors, PackagerOutcome};
