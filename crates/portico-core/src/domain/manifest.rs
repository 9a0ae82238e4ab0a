//! Minimal `go.mod` model: module path and replace directives.
//!
//! Only what the generator needs is understood. Every other line is kept
//! verbatim so rendering a parsed manifest reproduces the input.

use std::collections::BTreeMap;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleManifest {
    module: String,
    lines: Vec<String>,
    trailing_newline: bool,
}

impl ModuleManifest {
    /// Parse manifest text. `path` labels the file in errors.
    pub fn parse(path: &str, text: &str) -> Result<Self, DomainError> {
        let module = text
            .lines()
            .map(strip_comment)
            .find_map(|l| l.strip_prefix("module").filter(|rest| rest.starts_with([' ', '\t'])))
            .map(|rest| unquote(rest.trim()).to_string())
            .filter(|m| !m.is_empty())
            .ok_or_else(|| DomainError::MalformedManifest {
                path: path.to_string(),
                reason: "no module directive".into(),
            })?;

        Ok(Self {
            module,
            lines: text.lines().map(str::to_string).collect(),
            trailing_newline: text.is_empty() || text.ends_with('\n'),
        })
    }

    /// Fresh manifest, as written by `go mod init`.
    pub fn new(module: impl Into<String>, go_version: &str) -> Self {
        let module = module.into();
        Self {
            lines: vec![format!("module {module}"), String::new(), format!("go {go_version}")],
            module,
            trailing_newline: true,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module
    }

    /// All replace directives, keyed by the replaced module path.
    pub fn replaces(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        let mut in_block = false;
        for line in &self.lines {
            if let Some((old, new)) = classify(line, &mut in_block) {
                out.insert(old.to_string(), new.to_string());
            }
        }
        out
    }

    /// Add a replace directive, or overwrite the target of an existing one.
    pub fn set_replace(&mut self, module: &str, replacement: &str) {
        let directive = format!("{module} => {replacement}");
        let mut in_block = false;
        for line in &mut self.lines {
            let was_in_block = in_block;
            let matches = classify(line, &mut in_block).is_some_and(|(old, _)| old == module);
            if matches {
                *line = if was_in_block {
                    format!("\t{directive}")
                } else {
                    format!("replace {directive}")
                };
                return;
            }
        }

        if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
            self.lines.push(String::new());
        }
        self.lines.push(format!("replace {directive}"));
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline && !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Returns `(old, new)` module paths when `line` is a replace directive,
/// tracking `replace ( ... )` blocks through `in_block`.
fn classify<'a>(line: &'a str, in_block: &mut bool) -> Option<(&'a str, &'a str)> {
    let line = strip_comment(line).trim();

    if *in_block {
        if line == ")" {
            *in_block = false;
            return None;
        }
        return parse_directive(line);
    }

    let rest = line.strip_prefix("replace")?;
    let rest = rest.trim_start();
    if rest == "(" {
        *in_block = true;
        return None;
    }
    parse_directive(rest)
}

fn parse_directive(text: &str) -> Option<(&str, &str)> {
    let (left, right) = text.split_once("=>")?;
    let old = left.split_whitespace().next()?;
    let new = right.split_whitespace().next()?;
    Some((unquote(old), unquote(new)))
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}
