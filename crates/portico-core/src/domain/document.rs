//! Line-oriented view of a generated source file and its insertion points.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Which anchor flavor the injector looks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorStyle {
    /// Versioned `portico:extension-point <name>/v1` marker comments.
    /// Each must appear exactly once.
    #[default]
    ExtensionPoint,
    /// Plain substrings of the stock gateway template; first match wins.
    Legacy,
}

/// Named places in the gateway template where per-service code is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    Imports,
    Registrations,
    ConfigFields,
}

impl InsertionPoint {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Imports => "portico:extension-point imports/v1",
            Self::Registrations => "portico:extension-point registrations/v1",
            Self::ConfigFields => "portico:extension-point config-fields/v1",
        }
    }

    pub fn legacy_anchor(self) -> &'static str {
        match self {
            Self::Imports => "google.golang.org/grpc",
            Self::Registrations => "func Register",
            Self::ConfigFields => "type Config struct",
        }
    }

    pub fn anchor(self, style: AnchorStyle) -> &'static str {
        match style {
            AnchorStyle::ExtensionPoint => self.marker(),
            AnchorStyle::Legacy => self.legacy_anchor(),
        }
    }
}

impl fmt::Display for InsertionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Imports => "imports",
            Self::Registrations => "registrations",
            Self::ConfigFields => "config fields",
        })
    }
}

/// A text file held as ordered lines.
///
/// Parsing and rendering round-trip the presence or absence of a final
/// newline; all other bytes are preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDocument {
    name: String,
    lines: Vec<String>,
    trailing_newline: bool,
}

impl LineDocument {
    /// `name` labels the document in error messages.
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        let trailing_newline = text.ends_with('\n');
        let body = if trailing_newline {
            &text[..text.len() - 1]
        } else {
            text
        };
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n').map(str::to_string).collect()
        };

        Self {
            name: name.into(),
            lines,
            trailing_newline,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index of the first line containing `anchor`.
    pub fn find_first(&self, anchor: &str) -> Result<usize, DomainError> {
        self.lines
            .iter()
            .position(|l| l.contains(anchor))
            .ok_or_else(|| self.not_found(anchor))
    }

    /// Index of the only line containing `anchor`.
    pub fn find_unique(&self, anchor: &str) -> Result<usize, DomainError> {
        let mut hits = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.contains(anchor))
            .map(|(i, _)| i);

        let first = hits.next().ok_or_else(|| self.not_found(anchor))?;
        let extra = hits.count();
        if extra > 0 {
            return Err(DomainError::DuplicateAnchor {
                file: self.name.clone(),
                anchor: anchor.to_string(),
                count: extra + 1,
            });
        }
        Ok(first)
    }

    /// Resolve an insertion point under the given anchor style.
    pub fn locate(&self, point: InsertionPoint, style: AnchorStyle) -> Result<usize, DomainError> {
        let anchor = point.anchor(style);
        match style {
            AnchorStyle::ExtensionPoint => self.find_unique(anchor),
            AnchorStyle::Legacy => self.find_first(anchor),
        }
    }

    /// Insert `new_lines` immediately after the first line containing
    /// `anchor`, preserving their order.
    pub fn insert_after<I>(&mut self, anchor: &str, new_lines: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = String>,
    {
        let idx = self.find_first(anchor)?;
        self.splice_after(idx, new_lines);
        Ok(())
    }

    /// Insert after a resolved insertion point.
    pub fn insert_at_point<I>(
        &mut self,
        point: InsertionPoint,
        style: AnchorStyle,
        new_lines: I,
    ) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = String>,
    {
        let idx = self.locate(point, style)?;
        self.splice_after(idx, new_lines);
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    fn splice_after<I>(&mut self, idx: usize, new_lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        let at = idx + 1;
        self.lines.splice(at..at, new_lines);
    }

    fn not_found(&self, anchor: &str) -> DomainError {
        DomainError::AnchorNotFound {
            file: self.name.clone(),
            anchor: anchor.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANDLERS: &str = "package handlers\n\nimport (\n\t\"google.golang.org/grpc\"\n\t// portico:extension-point imports/v1\n)\n\nfunc Register() {\n}\n";

    #[test]
    fn round_trips_trailing_newline() {
        assert_eq!(LineDocument::parse("a", HANDLERS).render(), HANDLERS);
        assert_eq!(LineDocument::parse("a", "x\ny").render(), "x\ny");
        assert_eq!(LineDocument::parse("a", "").render(), "");
        assert_eq!(LineDocument::parse("a", "\n\n").render(), "\n\n");
    }

    #[test]
    fn insert_after_first_match_keeps_order() {
        let mut doc = LineDocument::parse("h.go", "a\nanchor\nb\nanchor\n");
        doc.insert_after("anchor", vec!["1".to_string(), "2".to_string()])
            .unwrap();
        assert_eq!(doc.render(), "a\nanchor\n1\n2\nb\nanchor\n");
    }

    #[test]
    fn insert_after_missing_anchor_fails() {
        let mut doc = LineDocument::parse("h.go", "a\nb\n");
        let err = doc.insert_after("func Register", vec!["x".into()]).unwrap_err();
        assert_eq!(
            err,
            DomainError::AnchorNotFound {
                file: "h.go".into(),
                anchor: "func Register".into()
            }
        );
        assert_eq!(doc.render(), "a\nb\n");
    }

    #[test]
    fn extension_point_must_be_unique() {
        let text = format!(
            "// {m}\n// {m}\n",
            m = InsertionPoint::Imports.marker()
        );
        let doc = LineDocument::parse("h.go", &text);
        assert!(matches!(
            doc.locate(InsertionPoint::Imports, AnchorStyle::ExtensionPoint),
            Err(DomainError::DuplicateAnchor { count: 2, .. })
        ));
    }

    #[test]
    fn locate_by_style() {
        let doc = LineDocument::parse("h.go", HANDLERS);
        assert_eq!(
            doc.locate(InsertionPoint::Imports, AnchorStyle::Legacy).unwrap(),
            3
        );
        assert_eq!(
            doc.locate(InsertionPoint::Imports, AnchorStyle::ExtensionPoint)
                .unwrap(),
            4
        );
        assert_eq!(
            doc.locate(InsertionPoint::Registrations, AnchorStyle::Legacy)
                .unwrap(),
            7
        );
    }
}
