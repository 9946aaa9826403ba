//! High-level operations.
//!
//! This module contains the implementation of packwright commands.

pub mod init;
pub mod props;
pub mod validate;

pub use init::init_model;
pub use props::template_props;
pub use validate::{
    format_report, merge_algorithms, report_json, resolve_one, validate_model, ValidateOptions,
    ValidationReport,
};
