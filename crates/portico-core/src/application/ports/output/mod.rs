//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `portico-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{
    Exposure, ProjectStructure, RenderContext, ServiceLocation, TemplateTree,
};
use crate::error::PorticoResult;

/// A directory entry as returned by [`Filesystem::list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `portico_adapters::filesystem::LocalFilesystem` (production)
/// - `portico_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PorticoResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> PorticoResult<()>;

    fn read_to_string(&self, path: &Path) -> PorticoResult<String>;

    /// Immediate children of a directory, in no particular order.
    ///
    /// Fails when the directory does not exist.
    fn list_dir(&self, path: &Path) -> PorticoResult<Vec<DirEntry>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> PorticoResult<()>;

    /// Move a file or directory. The destination must not exist.
    fn rename(&self, from: &Path, to: &Path) -> PorticoResult<()>;
}

/// Port for loading raw template trees.
///
/// Implemented by:
/// - `portico_adapters::templates::EmbeddedTemplates` (built into the binary)
/// - `portico_adapters::templates::DirectoryTemplates` (user override)
/// - `portico_adapters::templates::InMemoryTemplates` (testing)
pub trait TemplateSource: Send + Sync {
    /// Load every file under `subdir`, sorted by relative path.
    fn load(&self, subdir: &str) -> PorticoResult<TemplateTree>;
}

/// Port for template rendering.
pub trait TemplateRenderer: Send + Sync {
    /// Render paths and contents of a template tree into a project structure
    /// rooted at `output_root`.
    fn render(
        &self,
        tree: &TemplateTree,
        context: &RenderContext,
        output_root: &Path,
    ) -> PorticoResult<ProjectStructure>;
}

/// Port for Go module manipulation.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleTool: Send + Sync {
    /// `go mod init <module>` in `dir`.
    fn init(&self, dir: &Path, module: &str) -> PorticoResult<()>;

    /// `go mod edit -replace <module>=<path>` in `dir`.
    fn replace(&self, dir: &Path, module: &str, path: &str) -> PorticoResult<()>;

    /// `go mod tidy` in `dir`.
    fn tidy(&self, dir: &Path) -> PorticoResult<()>;
}

/// Port for build-workspace registration.
#[cfg_attr(test, mockall::automock)]
pub trait WorkspaceTool: Send + Sync {
    /// `go work use <member>` run from `workspace_root`.
    fn use_member(&self, workspace_root: &Path, member: &Path) -> PorticoResult<()>;
}

/// Port deciding whether a backend offers a gateway-compatible interface.
#[cfg_attr(test, mockall::automock)]
pub trait ExposureProbe: Send + Sync {
    fn probe(&self, location: &ServiceLocation) -> PorticoResult<Exposure>;
}
