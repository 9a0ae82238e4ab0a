use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to be relative.
///
/// Invariant: never absolute and never escapes its root through `..`.
/// Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if path is absolute (use `try_new` for fallible).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        assert!(
            !path.is_absolute(),
            "RelativePath cannot be absolute: {:?}",
            path
        );
        Self(path)
    }

    /// Fallible constructor.
    ///
    /// Rejects absolute paths and paths with a `..` component, since template
    /// output must stay inside the target directory.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if path.is_absolute() || escapes {
            Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            })
        } else {
            Ok(Self(path))
        }
    }

    /// Join a segment, maintaining relative invariant.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, DomainError> {
        Self::try_new(self.0.join(segment.as_ref()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Forward-slash rendering, stable across platforms.
    pub fn to_slash_string(&self) -> String {
        self.0
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
