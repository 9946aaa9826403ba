//! Template support for packager outputs.

pub mod functions;

pub use functions::{Props, TemplateError, TemplateFunctions, TemplateValue, KEY_NOW};
