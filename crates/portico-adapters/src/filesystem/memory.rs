//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use portico_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    error::{PorticoError, PorticoResult},
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    failing_writes: Vec<String>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent).unwrap();
        }
        self.write_file(path, content).unwrap();
        self
    }

    /// Seed an empty directory (testing helper).
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.create_dir_all(path.as_ref()).unwrap();
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let mut files: Vec<_> = inner.files.keys().cloned().collect();
        files.sort();
        files
    }

    /// Snapshot of every file under `root`, keyed by path relative to it.
    pub fn snapshot(&self, root: impl AsRef<Path>) -> Vec<(PathBuf, String)> {
        let root = root.as_ref();
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let mut out: Vec<_> = inner
            .files
            .iter()
            .filter_map(|(p, c)| {
                p.strip_prefix(root)
                    .ok()
                    .map(|rel| (rel.to_path_buf(), c.clone()))
            })
            .collect();
        out.sort();
        out
    }

    /// Make writes to any path containing `needle` fail (testing helper).
    pub fn fail_writes_containing(&self, needle: &str) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing_writes.push(needle.to_string());
        }
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
            inner.failing_writes.clear();
        }
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error() -> PorticoError {
    PorticoError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

fn fs_error(path: &Path, reason: &str) -> PorticoError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> PorticoResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error())?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> PorticoResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error())?;

        let display = path.to_string_lossy();
        if inner.failing_writes.iter().any(|n| display.contains(n.as_str())) {
            return Err(fs_error(path, "Simulated write failure"));
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(fs_error(path, "Parent directory does not exist"));
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> PorticoResult<String> {
        let inner = self.inner.read().map_err(|_| lock_error())?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| fs_error(path, "No such file"))
    }

    fn list_dir(&self, path: &Path) -> PorticoResult<Vec<DirEntry>> {
        let inner = self.inner.read().map_err(|_| lock_error())?;
        if !inner.directories.contains(path) {
            return Err(fs_error(path, "No such directory"));
        }

        let child_name = |p: &Path| {
            (p.parent() == Some(path))
                .then(|| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .flatten()
        };

        let dirs = inner
            .directories
            .iter()
            .filter_map(|p| child_name(p))
            .map(DirEntry::dir);
        let files = inner
            .files
            .keys()
            .filter_map(|p| child_name(p))
            .map(DirEntry::file);

        Ok(dirs.chain(files).collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> PorticoResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error())?;
        if !inner.directories.contains(path) {
            return Err(fs_error(path, "No such directory"));
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));

        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> PorticoResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error())?;
        if inner.files.contains_key(to) || inner.directories.contains(to) {
            return Err(fs_error(to, "Destination exists"));
        }
        if !inner.files.contains_key(from) && !inner.directories.contains(from) {
            return Err(fs_error(from, "No such file or directory"));
        }

        let moved = |p: &Path| p.strip_prefix(from).ok().map(|rel| to.join(rel));

        let dirs: Vec<_> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in dirs {
            inner.directories.remove(&old);
            if let Some(new) = moved(&old) {
                inner.directories.insert(new);
            }
        }

        let files: Vec<_> = inner
            .files
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in files {
            if let (Some(content), Some(new)) = (inner.files.remove(&old), moved(&old)) {
                inner.files.insert(new, content);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.txt"), "x").is_err());

        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.txt"), "x").unwrap();
        assert_eq!(fs.read_file("/a/b.txt").as_deref(), Some("x"));
    }

    #[test]
    fn list_dir_returns_direct_children() {
        let fs = MemoryFilesystem::new()
            .with_file("/s/billing/invoices/go.mod", "")
            .with_dir("/s/auth");

        let mut names: Vec<_> = fs
            .list_dir(Path::new("/s"))
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.is_dir))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![("auth".to_string(), true), ("billing".to_string(), true)]
        );
    }

    #[test]
    fn remove_dir_all_removes_subtree() {
        let fs = MemoryFilesystem::new()
            .with_file("/gw/api/main.go", "")
            .with_file("/gw/apix/main.go", "");

        fs.remove_dir_all(Path::new("/gw/api")).unwrap();
        assert!(!fs.exists(Path::new("/gw/api")));
        assert!(!fs.exists(Path::new("/gw/api/main.go")));
        assert!(fs.exists(Path::new("/gw/apix/main.go")));
    }

    #[test]
    fn rename_moves_subtree() {
        let fs = MemoryFilesystem::new().with_file("/gw/.api.staging/handlers/handlers.go", "h");

        fs.rename(Path::new("/gw/.api.staging"), Path::new("/gw/api"))
            .unwrap();

        assert_eq!(fs.read_file("/gw/api/handlers/handlers.go").as_deref(), Some("h"));
        assert!(fs.exists(Path::new("/gw/api/handlers")));
        assert!(!fs.exists(Path::new("/gw/.api.staging")));
    }

    #[test]
    fn simulated_write_failures() {
        let fs = MemoryFilesystem::new().with_dir("/gw");
        fs.fail_writes_containing("config.go");
        assert!(fs.write_file(Path::new("/gw/config.go"), "").is_err());
        assert!(fs.write_file(Path::new("/gw/main.go"), "").is_ok());
    }
}
