//! Placeholder substitution for generated documents.
//!
//! Generated HTML carries literal `{{ token }}` markers (`{{name}}`,
//! `{{date}}`, ...) that a later step replaces with real values. This module
//! implements that step so documents can be filled from the CLI and checked
//! in tests.

use std::collections::HashMap;

use thiserror::Error;

use crate::render::escape_text;

/// Placeholder substitution errors.
#[derive(Debug, Error)]
pub enum PlaceholderError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Invalid placeholder syntax.
    #[error("invalid placeholder syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for placeholder operations.
pub type Result<T> = std::result::Result<T, PlaceholderError>;

/// Values for placeholder substitution.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderContext {
    variables: HashMap<String, String>,
}

impl PlaceholderContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Check if a variable exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the context has no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PlaceholderContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for (key, value) in iter {
            ctx.insert(key, value);
        }
        ctx
    }
}

/// Replace every `{{ token }}` in `markup` with its value from `context`.
///
/// Values are HTML-escaped. `{{ token? }}` is optional and becomes an empty
/// string when missing; any other missing token is an error.
pub fn fill(markup: &str, context: &PlaceholderContext) -> Result<String> {
    let mut result = markup.to_string();
    let mut pos = 0;

    while let Some(start) = result[pos..].find("{{") {
        let start = pos + start;
        let end = result[start..].find("}}").ok_or_else(|| {
            PlaceholderError::InvalidSyntax("unclosed {{ delimiter".to_string())
        })?;
        let end = start + end + 2;

        let var_name = result[start + 2..end - 2].trim();

        let (var_name, optional) = match var_name.strip_suffix('?') {
            Some(stripped) => (stripped, true),
            None => (var_name, false),
        };

        if var_name.is_empty() {
            return Err(PlaceholderError::InvalidSyntax(
                "empty placeholder".to_string(),
            ));
        }

        let value = match context.get(var_name) {
            Some(v) => escape_text(v),
            None if optional => String::new(),
            None => return Err(PlaceholderError::MissingVariable(var_name.to_string())),
        };

        result.replace_range(start..end, &value);
        pos = start + value.len();
    }

    Ok(result)
}

/// List placeholder names in order of first appearance.
///
/// Unclosed delimiters end the scan.
#[must_use]
pub fn placeholders(markup: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = markup;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };

        let name = after[..end].trim().trim_end_matches('?').to_string();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
        rest = &after[end + 2..];
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_simple() {
        let ctx = PlaceholderContext::new().with_var("name", "Jane Doe");
        let result = fill("<p>{{name}}</p>", &ctx).unwrap();
        assert_eq!(result, "<p>Jane Doe</p>");
    }

    #[test]
    fn test_fill_with_spaces_and_repeats() {
        let ctx = PlaceholderContext::new()
            .with_var("nik", "3171234567890001")
            .with_var("date", "17 October 2026");
        let result = fill("{{ nik }} / {{date}} / {{nik}}", &ctx).unwrap();
        assert_eq!(result, "3171234567890001 / 17 October 2026 / 3171234567890001");
    }

    #[test]
    fn test_fill_optional_variable() {
        let ctx = PlaceholderContext::new();
        let result = fill("<p>{{ note? }}</p>", &ctx).unwrap();
        assert_eq!(result, "<p></p>");
    }

    #[test]
    fn test_fill_missing_variable() {
        let ctx = PlaceholderContext::new().with_var("name", "Jane");
        let err = fill("{{name}} {{email}}", &ctx).unwrap_err();
        assert!(matches!(err, PlaceholderError::MissingVariable(ref v) if v == "email"));
    }

    #[test]
    fn test_fill_unclosed() {
        let ctx = PlaceholderContext::new();
        assert!(matches!(
            fill("{{name", &ctx),
            Err(PlaceholderError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_fill_escapes_values() {
        let ctx = PlaceholderContext::new().with_var("address", "A & B <Street>");
        let result = fill("<td>{{address}}</td>", &ctx).unwrap();
        assert_eq!(result, "<td>A &amp; B &lt;Street&gt;</td>");
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let ctx = PlaceholderContext::new().with_var("name", "{{name}}");
        let result = fill("{{name}}", &ctx).unwrap();
        assert_eq!(result, "{{name}}");
    }

    #[test]
    fn test_placeholders_in_order() {
        let names = placeholders("{{name}} {{ nik }} {{name}} {{gender?}} {{oops");
        assert_eq!(names, vec!["name", "nik", "gender"]);
    }

    #[test]
    fn test_context_from_iter() {
        let ctx: PlaceholderContext = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(ctx.len(), 2);
        assert!(ctx.contains("a"));
        assert_eq!(ctx.get("b"), Some("2"));
    }
}
