//! In-memory template source for testing.

use std::collections::HashMap;

use portico_core::{
    application::{ApplicationError, ports::TemplateSource},
    domain::{TemplateFile, TemplateTree},
    error::PorticoResult,
};

/// Template source backed by a map of subdir to tree.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplates {
    trees: HashMap<String, TemplateTree>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one file to `subdir`.
    pub fn with_file(mut self, subdir: &str, path: &str, content: &str) -> Self {
        self.trees
            .entry(subdir.to_string())
            .or_default()
            .push(TemplateFile::new(path, content));
        self
    }

    /// Replace the whole tree of `subdir`.
    pub fn with_tree(mut self, subdir: &str, tree: TemplateTree) -> Self {
        self.trees.insert(subdir.to_string(), tree);
        self
    }
}

impl TemplateSource for InMemoryTemplates {
    fn load(&self, subdir: &str) -> PorticoResult<TemplateTree> {
        self.trees.get(subdir).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                subdir: subdir.to_string(),
                source_name: "in-memory templates".into(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_files_by_subdir() {
        let source = InMemoryTemplates::new()
            .with_file("go", "main.go", "package main")
            .with_file("go", "go.sum", "");

        assert_eq!(source.load("go").unwrap().len(), 2);
        assert!(source.load("workflows").is_err());
    }
}
