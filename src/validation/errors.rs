//! Errors accumulator.
//!
//! Validation never stops at the first problem. Entries are appended in
//! the order they are found and never removed; a result is valid when it
//! holds no configuration entries.

use serde::Serialize;

use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::messages::{self, Message};

/// Kind of accumulated problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Invalid configuration; the run must not proceed
    Configuration,
    /// Suspicious but usable configuration
    Warning,
}

/// One accumulated problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
    pub category: ErrorCategory,

    /// Dotted configuration path, e.g. `distribution.app.brew.template`
    pub path: String,

    pub message: Message,
}

impl ErrorEntry {
    /// Render as a terminal diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = match self.category {
            ErrorCategory::Configuration => Diagnostic::error(self.message.text()),
            ErrorCategory::Warning => Diagnostic::warning(self.message.text()),
        }
        .with_context(format!("at {}", self.path));

        match suggestion_for(self.message.id) {
            Some(suggestion) => diagnostic.with_suggestion(suggestion),
            None => diagnostic,
        }
    }
}

fn suggestion_for(id: &str) -> Option<&'static str> {
    match id {
        messages::PACKAGER_MULTIPLE_ARTIFACTS => Some(suggestions::MULTIPLE_ARTIFACTS),
        messages::DIRECTORY_NOT_EXIST => Some(suggestions::TEMPLATE_DIRECTORY),
        messages::MUST_NOT_BE_BLANK => Some(suggestions::REPOSITORY_IDENTITY),
        messages::PLATFORM_CHECK => Some(suggestions::ARTIFACT_PLATFORM),
        messages::INVALID_URL => Some(suggestions::INVALID_URL),
        messages::TOKEN_MISSING => Some(suggestions::TOKEN_MISSING),
        _ => None,
    }
}

/// Ordered, append-only collection of problems.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Errors {
    entries: Vec<ErrorEntry>,
}

impl Errors {
    pub fn new() -> Self {
        Errors::default()
    }

    /// Record a configuration error.
    pub fn configuration(&mut self, path: impl Into<String>, message: Message) {
        self.push(ErrorCategory::Configuration, path.into(), message);
    }

    /// Record a warning.
    pub fn warning(&mut self, path: impl Into<String>, message: Message) {
        self.push(ErrorCategory::Warning, path.into(), message);
    }

    fn push(&mut self, category: ErrorCategory, path: String, message: Message) {
        tracing::debug!("{}: {}", path, message);
        self.entries.push(ErrorEntry {
            category,
            path,
            message,
        });
    }

    /// Append every entry of `other`, keeping its order.
    pub fn extend(&mut self, other: Errors) {
        self.entries.extend(other.entries);
    }

    /// No configuration errors were recorded.
    pub fn is_valid(&self) -> bool {
        !self.has_configuration_errors()
    }

    pub fn has_configuration_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.category == ErrorCategory::Configuration)
    }

    pub fn has_warnings(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.category == ErrorCategory::Warning)
    }

    pub fn configuration_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.category == ErrorCategory::Configuration)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries.len() - self.configuration_count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter()
    }
}
