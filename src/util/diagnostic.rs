//! User-friendly diagnostic messages.
//!
//! Every reported configuration problem names the configuration path it
//! belongs to and, where one exists, a concrete fix.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource,
    SourceSpan,
};
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no configuration file is found.
    pub const NO_CONFIG: &str = "help: Run `packwright init` to create a packwright.toml";

    /// Suggestion when a packager matches several artifacts.
    pub const MULTIPLE_ARTIFACTS: &str =
        "Give each artifact a distinct platform, or set `skip_<packager> = true` on the extra ones";

    /// Suggestion when a template directory is missing.
    pub const TEMPLATE_DIRECTORY: &str =
        "Create the directory or remove `template_directory` to use the built-in templates";

    /// Suggestion when a repository identity field is blank.
    pub const REPOSITORY_IDENTITY: &str =
        "Set `owner` under [release] or on the packager's repository table";

    /// Suggestion when a platform-specific artifact has no platform.
    pub const ARTIFACT_PLATFORM: &str =
        "Add `platform = \"<os>-<arch>\"` to the artifact, e.g. `osx-x86_64`";

    /// Suggestion for malformed URLs.
    pub const INVALID_URL: &str = "Use an absolute URL such as https://example.com/releases/latest";

    /// Suggestion when a repository token is missing.
    pub const TOKEN_MISSING: &str =
        "Set `token` on the repository table or under [release]";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
            Severity::Help => write!(f, "help"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
                Severity::Help => "\x1b[1;32mhelp\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Note => "note",
                Severity::Help => "help",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// A `packwright.toml` that could not be parsed.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("failed to parse {file}: {message}")]
#[diagnostic(
    code(packwright::model::parse),
    help("Check the table and key names against `packwright init` output")
)]
pub struct ModelParseError {
    pub file: String,
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl ModelParseError {
    /// Build a parse error from a TOML deserialization failure.
    pub fn from_toml(file: impl Into<String>, content: &str, err: &toml::de::Error) -> Self {
        let file = file.into();
        ModelParseError {
            message: err.message().to_string(),
            src: NamedSource::new(file.clone(), content.to_string()),
            span: err.span().map(SourceSpan::from),
            file,
        }
    }
}

/// Render a miette diagnostic with its source snippet.
pub fn render_report(diagnostic: &dyn MietteDiagnostic, color: bool) -> String {
    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let mut output = String::new();
    if GraphicalReportHandler::new_themed(theme)
        .render_report(&mut output, diagnostic)
        .is_err()
    {
        output = format!("error: {}\n", diagnostic);
    }
    output
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
