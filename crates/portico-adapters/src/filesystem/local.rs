//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use portico_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    error::{PorticoError, PorticoResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> PorticoResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> PorticoResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> PorticoResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn list_dir(&self, path: &Path) -> PorticoResult<Vec<DirEntry>> {
        let entries =
            std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;

        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| map_io_error(&entry.path(), e, "get file type"))?
                .is_dir();
            out.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        Ok(out)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> PorticoResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn rename(&self, from: &Path, to: &Path) -> PorticoResult<()> {
        if to.exists() {
            return Err(ApplicationError::Filesystem {
                path: to.to_path_buf(),
                reason: "Failed to rename: destination exists".into(),
            }
            .into());
        }
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> PorticoError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
