//! Template tree: the unrendered gateway source set.
//!
//! Template files are plain text with `{{KEY}}` placeholders in both their
//! relative path and their content. A tree is always kept sorted by path so
//! that rendering and materialization are deterministic regardless of how a
//! [`TemplateSource`](crate::application::ports::TemplateSource) enumerates
//! its files.

use super::common::RelativePath;
use crate::domain::error::DomainError;

/// A single template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Relative path inside the template subdir (may contain placeholders).
    pub path: RelativePath,
    pub content: String,
}

impl TemplateFile {
    pub fn new(path: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Fallible constructor for paths coming from outside the crate.
    pub fn try_new(path: &str, content: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            path: RelativePath::try_new(path)?,
            content: content.into(),
        })
    }
}

/// Ordered set of template files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    files: Vec<TemplateFile>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, keeping the tree sorted by path.
    pub fn push(&mut self, file: TemplateFile) {
        let idx = self.files.partition_point(|f| f.path <= file.path);
        self.files.insert(idx, file);
    }

    /// Fluent variant of `push` for builder chains.
    pub fn with_file(mut self, file: TemplateFile) -> Self {
        self.push(file);
        self
    }

    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Reject empty trees and duplicate paths.
    pub fn validate(&self, subdir: &str) -> Result<(), DomainError> {
        if self.files.is_empty() {
            return Err(DomainError::EmptyTemplate {
                subdir: subdir.to_string(),
            });
        }
        for pair in self.files.windows(2) {
            if pair[0].path == pair[1].path {
                return Err(DomainError::DuplicatePath {
                    path: pair[0].path.to_slash_string(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<TemplateFile> for TemplateTree {
    fn from_iter<I: IntoIterator<Item = TemplateFile>>(iter: I) -> Self {
        let mut tree = Self::new();
        for file in iter {
            tree.push(file);
        }
        tree
    }
}
