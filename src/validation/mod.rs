//! Packager resolution and validation.
//!
//! The pipeline (in `pipeline.rs`) sequences the resolvers below once per
//! (distribution, backend) pair:
//!
//! - **Activation** - enabled or disabled, and why (in `activation.rs`)
//! - **Artifacts** - candidate selection and platform checks (in `artifacts.rs`)
//! - **Defaults** - parent and hard-coded fallbacks (in `defaults.rs`)
//! - **Extra properties** - parent into child, child wins (in `extra.rs`)
//! - **Repository** - destination tap resolution (in `repository.rs`)
//! - **Template** - template directory checks (in `template.rs`)
//! - **Errors** - the accumulator every stage writes to (in `errors.rs`)

pub mod activation;
pub mod artifacts;
pub mod defaults;
pub mod errors;
pub mod extra;
pub mod pipeline;
pub mod repository;
pub mod template;

pub use activation::DisabledReason;
pub use errors::{ErrorCategory, ErrorEntry, Errors};
pub use pipeline::{
    resolve_packager, PackagerOutcome, PackagerResolution, PipelineContext, PipelineError,
};
pub use template::{FsTemplateResource, TemplateResource};
