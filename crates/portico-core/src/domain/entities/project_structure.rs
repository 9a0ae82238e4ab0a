use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// Rendered gateway tree ready for materialization.
///
/// Output of the template renderer. Paths are relative to `root`.
/// It contains no business logic, only data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStructure {
    pub(crate) root: PathBuf,
    pub(crate) files: Vec<FileToWrite>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.push(FileToWrite {
            path: path.into(),
            content: content.into(),
        });
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.files.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Rendered gateway tree is empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for file in &self.files {
            let path_str = file.path.display().to_string();

            if file.path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed { path: path_str });
            }

            if !seen.insert(path_str.clone()) {
                return Err(DomainError::DuplicatePath { path: path_str });
            }
        }

        Ok(())
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.files.iter()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
}

impl FileToWrite {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty() {
        assert!(ProjectStructure::new("/tmp/gw").validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicates() {
        let structure = ProjectStructure::new("/tmp/gw")
            .with_file("main.go", "")
            .with_file("main.go", "");
        assert!(matches!(
            structure.validate(),
            Err(DomainError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn validate_rejects_absolute() {
        let structure = ProjectStructure::new("/tmp/gw").with_file("/etc/passwd", "");
        assert!(matches!(
            structure.validate(),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn files_keep_insertion_order() {
        let structure = ProjectStructure::new("/tmp/gw")
            .with_file("go.mod", "module x\n")
            .with_file("main.go", "package main\n");

        let paths: Vec<_> = structure.files().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("go.mod"), PathBuf::from("main.go")]);
        assert_eq!(structure.file_count(), 2);
        assert!(structure.validate().is_ok());
    }
}
