//! Filesystem-based template source.
//!
//! Lets users override the built-in templates with their own tree:
//!
//! ```text
//! my-templates/
//! ├── go/
//! │   ├── main.go
//! │   ├── handlers/handlers.go
//! │   └── config/config.go
//! └── workflows/
//!     └── go.yml.tmpl
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use portico_core::{
    application::{ApplicationError, ports::TemplateSource},
    domain::{TemplateFile, TemplateTree},
    error::{PorticoError, PorticoResult},
};

/// Loads template subdirs from a root directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateSource for DirectoryTemplates {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self, subdir: &str) -> PorticoResult<TemplateTree> {
        let dir = self.root.join(subdir);
        if !dir.is_dir() {
            return Err(ApplicationError::TemplateNotFound {
                subdir: subdir.to_string(),
                source_name: self.root.display().to_string(),
            }
            .into());
        }

        let mut tree = TemplateTree::new();
        for walk_entry in WalkDir::new(&dir).min_depth(1) {
            let entry = walk_entry.map_err(|e| io_error(&dir, e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&dir)
                .map_err(|e| io_error(entry.path(), e.to_string()))?;
            let relative = normalize_path(relative);

            let content = fs::read_to_string(entry.path())
                .map_err(|e| io_error(entry.path(), format!("Failed to read template: {e}")))?;

            tree.push(TemplateFile::try_new(&relative, content)?);
        }

        debug!(subdir, files = tree.len(), "Loaded template from disk");
        Ok(tree)
    }
}

fn io_error(path: &Path, reason: String) -> PorticoError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason,
    }
    .into()
}

/// Forward-slash relative path, independent of the host separator.
fn normalize_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
