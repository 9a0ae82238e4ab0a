//! Placeholder substitution context.

use std::collections::BTreeMap;

/// Context for template rendering.
///
/// A value object holding every `{{KEY}}` substitution available to a
/// template. Keys are `SCREAMING_SNAKE_CASE` by convention.
///
/// A `BTreeMap` keeps iteration (and therefore debug output) stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, consuming self and returning the extended context.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Render a template string by replacing `{{KEY}}` placeholders.
    ///
    /// Single left-to-right scan: substituted values are never re-scanned, so
    /// a value that itself contains `{{...}}` is emitted verbatim.
    ///
    /// - `{{UNKNOWN}}` stays as literal `{{UNKNOWN}}`
    /// - `{{ KEY }}` is accepted (surrounding whitespace trimmed)
    /// - `${{ secrets.TOKEN }}` (CI syntax) passes through untouched
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };

            let key = after[..end].trim();
            match self.variables.get(key) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }

        out.push_str(rest);
        out
    }
}
