//! Functions exposed to packager templates.
//!
//! Templates receive a property map; [`TemplateFunctions::apply`] adds the
//! `f_*` helpers to it. Each helper takes the rendered text of its section
//! as input.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::path::Path;
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local};

use crate::util::hash::{compute_checksum, Algorithm};

/// Props key holding the timestamp `f_now` formats.
pub const KEY_NOW: &str = "now";

/// Errors raised by template functions.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid time format `{0}`")]
    TimeFormat(String),

    #[error("`{0}` is not a template function")]
    NotAFunction(String),
}

/// A template function.
pub type TemplateFn = Arc<dyn Fn(&str) -> Result<String, TemplateError> + Send + Sync>;

/// A value in the template property map.
#[derive(Clone)]
pub enum TemplateValue {
    Text(String),
    List(Vec<String>),
    Json(serde_json::Value),
    Timestamp(DateTime<FixedOffset>),
    Function(TemplateFn),
}

impl fmt::Debug for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            TemplateValue::List(l) => f.debug_tuple("List").field(l).finish(),
            TemplateValue::Json(v) => f.debug_tuple("Json").field(v).finish(),
            TemplateValue::Timestamp(t) => f.debug_tuple("Timestamp").field(t).finish(),
            TemplateValue::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Text(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Text(value)
    }
}

/// Template property map.
pub type Props = BTreeMap<String, TemplateValue>;

fn function<F>(f: F) -> TemplateValue
where
    F: Fn(&str) -> Result<String, TemplateError> + Send + Sync + 'static,
{
    TemplateValue::Function(Arc::new(f))
}

fn format_time(now: &DateTime<FixedOffset>, pattern: &str) -> Result<String, TemplateError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(TemplateError::TimeFormat(pattern.to_string()));
    }
    let mut out = String::new();
    write!(out, "{}", now.format_with_items(items.iter()))
        .map_err(|_| TemplateError::TimeFormat(pattern.to_string()))?;
    Ok(out)
}

fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn uncapitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn markdown_to_html(input: &str) -> String {
    let parser = pulldown_cmark::Parser::new(input);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html.trim().to_string()
}

fn read_file(input: &str) -> Result<Vec<u8>, TemplateError> {
    let path = input.trim();
    std::fs::read(Path::new(path)).map_err(|source| TemplateError::Read {
        path: path.to_string(),
        source,
    })
}

/// Registry of the built-in template functions.
pub struct TemplateFunctions;

impl TemplateFunctions {
    /// Add every `f_*` function to `props`.
    ///
    /// `f_now` formats the timestamp stored under [`KEY_NOW`], or the
    /// current time when there is none, so one render sees one instant.
    pub fn apply(props: &mut Props) {
        let now = match props.get(KEY_NOW) {
            Some(TemplateValue::Timestamp(now)) => *now,
            _ => Local::now().fixed_offset(),
        };
        props.insert(
            "f_now".to_string(),
            function(move |pattern| format_time(&now, pattern)),
        );

        props.insert("f_trim".to_string(), function(|s| Ok(s.trim().to_string())));
        props.insert(
            "f_underscore".to_string(),
            function(|s| Ok(s.replace(['.', '-', '+'], "_"))),
        );
        props.insert(
            "f_dash".to_string(),
            function(|s| Ok(s.replace(['.', '_', '+'], "-"))),
        );
        props.insert(
            "f_slash".to_string(),
            function(|s| Ok(s.replace(['.', '-', '+'], "/"))),
        );
        props.insert("f_upper".to_string(), function(|s| Ok(s.to_uppercase())));
        props.insert("f_lower".to_string(), function(|s| Ok(s.to_lowercase())));
        props.insert("f_capitalize".to_string(), function(|s| Ok(capitalize(s))));
        props.insert("f_uncapitalize".to_string(), function(|s| Ok(uncapitalize(s))));
        props.insert("f_md2html".to_string(), function(|s| Ok(markdown_to_html(s))));
        props.insert(
            "f_file_read".to_string(),
            function(|s| Ok(String::from_utf8_lossy(&read_file(s)?).into_owned())),
        );
        props.insert(
            "f_file_size".to_string(),
            function(|s| Ok(read_file(s)?.len().to_string())),
        );

        for algorithm in Algorithm::ALL {
            props.insert(
                format!("f_checksum_{}", algorithm.formatted()),
                function(move |s| Ok(compute_checksum(algorithm, &read_file(s)?))),
            );
        }
    }

    /// Call a function from `props`.
    pub fn call(props: &Props, name: &str, input: &str) -> Result<String, TemplateError> {
        match props.get(name) {
            Some(TemplateValue::Function(f)) => f(input),
            _ => Err(TemplateError::NotAFunction(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn props() -> Props {
        let mut props = Props::new();
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 9, 14, 30, 0)
            .unwrap();
        props.insert(KEY_NOW.to_string(), TemplateValue::Timestamp(now));
        TemplateFunctions::apply(&mut props);
        props
    }

    #[test]
    fn test_now_uses_fixed_timestamp() {
        let props = props();
        assert_eq!(TemplateFunctions::call(&props, "f_now", "%Y-%m-%d").unwrap(), "2024-03-09");
        assert_eq!(TemplateFunctions::call(&props, "f_now", "%H:%M").unwrap(), "14:30");
    }

    #[test]
    fn test_invalid_time_format() {
        let props = props();
        assert!(matches!(
            TemplateFunctions::call(&props, "f_now", "%Q"),
            Err(TemplateError::TimeFormat(_))
        ));
    }

    #[test]
    fn test_string_functions() {
        let props = props();
        let call = |name: &str, input: &str| TemplateFunctions::call(&props, name, input).unwrap();

        assert_eq!(call("f_trim", "  app "), "app");
        assert_eq!(call("f_underscore", "1.2.3-rc+1"), "1_2_3_rc_1");
        assert_eq!(call("f_dash", "1.2_3+4"), "1-2-3-4");
        assert_eq!(call("f_slash", "org.acme-app"), "org/acme/app");
        assert_eq!(call("f_upper", "app"), "APP");
        assert_eq!(call("f_lower", "APP"), "app");
        assert_eq!(call("f_capitalize", "app"), "App");
        assert_eq!(call("f_uncapitalize", "App"), "app");
        assert_eq!(call("f_md2html", "**bold**"), "<p><strong>bold</strong></p>");
    }

    #[test]
    fn test_file_functions() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();
        let input = format!(" {} ", file.display());
        let props = props();

        assert_eq!(TemplateFunctions::call(&props, "f_file_read", &input).unwrap(), "hello");
        assert_eq!(TemplateFunctions::call(&props, "f_file_size", &input).unwrap(), "5");
        assert_eq!(
            TemplateFunctions::call(&props, "f_checksum_sha256", &input).unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert!(TemplateFunctions::call(&props, "f_file_read", "/no/such/file").is_err());
    }

    #[test]
    fn test_checksum_function_per_algorithm() {
        let props = props();
        for algorithm in Algorithm::ALL {
            let key = format!("f_checksum_{}", algorithm.formatted());
            assert!(matches!(props.get(&key), Some(TemplateValue::Function(_))), "{}", key);
        }
    }

    #[test]
    fn test_text_is_not_callable() {
        let mut props = props();
        props.insert("name".to_string(), "app".into());
        assert!(matches!(
            TemplateFunctions::call(&props, "name", ""),
            Err(TemplateError::NotAFunction(_))
        ));
    }
}
