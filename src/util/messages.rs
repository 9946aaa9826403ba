//! Message catalog.
//!
//! Validation results carry a message id plus positional parameters rather
//! than a pre-rendered string, so downstream reporting can key off the id.
//! Templates use `{0}`, `{1}`, ... placeholders.

use std::fmt;

use serde::Serialize;

pub const DISABLED: &str = "validation.disabled";
pub const DISABLED_RELEASE: &str = "validation.disabled.release";
pub const DISABLED_DISTRIBUTION_TYPE: &str = "validation.disabled.distribution.type";
pub const DISABLED_NO_ARTIFACTS: &str = "validation.disabled.no.artifacts";
pub const DISABLED_MULTIPLE_ARTIFACTS: &str = "validation.disabled.multiple.artifacts";
pub const DISABLED_INVALID: &str = "validation.disabled.invalid";
pub const PACKAGER_MULTIPLE_ARTIFACTS: &str = "validation.packager.multiple.artifacts";
pub const DIRECTORY_NOT_EXIST: &str = "validation.directory.not.exist";
pub const MUST_NOT_BE_BLANK: &str = "validation.must.not.be.blank";
pub const PLATFORM_CHECK: &str = "validation.distributions.platform.check";
pub const INVALID_URL: &str = "validation.invalid.url";
pub const TOKEN_MISSING: &str = "validation.repository.token.missing";

const CATALOG: &[(&str, &str)] = &[
    (DISABLED, "disabled"),
    (DISABLED_RELEASE, "disabled, the release host does not support releases"),
    (
        DISABLED_DISTRIBUTION_TYPE,
        "disabled, distribution type {0} is not supported",
    ),
    (DISABLED_NO_ARTIFACTS, "disabled, no matching artifacts"),
    (
        DISABLED_MULTIPLE_ARTIFACTS,
        "disabled, more than one matching artifact",
    ),
    (DISABLED_INVALID, "disabled, configuration is invalid"),
    (
        PACKAGER_MULTIPLE_ARTIFACTS,
        "{0} can only package a single artifact but {1} match: {2}",
    ),
    (DIRECTORY_NOT_EXIST, "{0} does not exist: {1}"),
    (MUST_NOT_BE_BLANK, "{0} must not be blank"),
    (
        PLATFORM_CHECK,
        "distribution {0} is of type {1} and {2} requires a platform on artifact {3}",
    ),
    (INVALID_URL, "{0} is not a valid URL: {1}"),
    (
        TOKEN_MISSING,
        "{0} has no token, publishing to the repository will fail",
    ),
];

/// Look up the template for a message id.
pub fn template(id: &str) -> Option<&'static str> {
    CATALOG.iter().find(|(key, _)| *key == id).map(|(_, t)| *t)
}

/// Render a message template with positional arguments.
pub fn render(id: &str, args: &[String]) -> String {
    let Some(template) = template(id) else {
        return if args.is_empty() {
            id.to_string()
        } else {
            format!("{} [{}]", id, args.join(", "))
        };
    };

    // Arguments are inserted verbatim, never re-scanned for placeholders
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let arg = after
            .find('}')
            .and_then(|end| after[..end].parse::<usize>().ok().map(|i| (i, end)))
            .and_then(|(i, end)| args.get(i).map(|arg| (arg, end)));
        match arg {
            Some((arg, end)) => {
                output.push_str(arg);
                rest = &after[end + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

/// A message id plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: &'static str,
    pub args: Vec<String>,
}

impl Message {
    pub fn new(id: &'static str) -> Self {
        Message {
            id,
            args: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, arg: impl fmt::Display) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Render the message text.
    pub fn text(&self) -> String {
        render(self.id, &self.args)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_positional_args() {
        let msg = Message::new(DIRECTORY_NOT_EXIST)
            .arg("distribution.app.brew.template")
            .arg("templates/brew");
        assert_eq!(
            msg.text(),
            "distribution.app.brew.template does not exist: templates/brew"
        );
    }

    #[test]
    fn test_render_leaves_placeholders_in_args_alone() {
        let msg = Message::new(DIRECTORY_NOT_EXIST)
            .arg("distribution.{1}.brew.template")
            .arg("tpl");
        assert_eq!(msg.text(), "distribution.{1}.brew.template does not exist: tpl");
    }

    #[test]
    fn test_render_missing_arg_keeps_placeholder() {
        let msg = Message::new(DIRECTORY_NOT_EXIST).arg("distribution.app.brew.template");
        assert_eq!(msg.text(), "distribution.app.brew.template does not exist: {1}");
    }

    #[test]
    fn test_render_unknown_id_keeps_args() {
        assert_eq!(render("no.such.id", &[]), "no.such.id");
        assert_eq!(
            render("no.such.id", &["a".to_string(), "b".to_string()]),
            "no.such.id [a, b]"
        );
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        for (i, (id, _)) in CATALOG.iter().enumerate() {
            assert!(
                CATALOG[i + 1..].iter().all(|(other, _)| other != id),
                "duplicate message id {}",
                id
            );
        }
    }
}
