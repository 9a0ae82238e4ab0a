// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside pipeline step wrappers)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Required placeholder missing: {field}")]
    MissingPlaceholder { field: &'static str },

    #[error("Invalid placeholder '{field}': {reason}")]
    InvalidPlaceholder { field: &'static str, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Services '{first}' and '{second}' both map to import alias '{alias}'")]
    AliasCollision {
        alias: String,
        first: String,
        second: String,
    },

    // ========================================================================
    // Template / generated-file Errors
    // ========================================================================
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template '{subdir}' has no files")]
    EmptyTemplate { subdir: String },

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Anchor '{anchor}' not found in {file}")]
    AnchorNotFound { file: String, anchor: String },

    #[error("Anchor '{anchor}' appears {count} times in {file}; expected exactly one")]
    DuplicateAnchor {
        file: String,
        anchor: String,
        count: usize,
    },

    #[error("Malformed module manifest {path}: {reason}")]
    MalformedManifest { path: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingPlaceholder { field } => vec![
                format!("The '{}' value could not be derived", field),
                "Check the service name, namespace and remote you passed".into(),
            ],
            Self::AliasCollision { first, second, .. } => vec![
                format!("'{}' and '{}' produce the same Go identifier", first, second),
                "Rename one of the namespaces or services".into(),
            ],
            Self::AnchorNotFound { file, anchor } | Self::DuplicateAnchor { file, anchor, .. } => {
                vec![
                    format!("Generated file {} lost its insertion point '{}'", file, anchor),
                    "The gateway template may be out of date or hand-edited".into(),
                    "Try --legacy-anchors for templates without extension-point markers".into(),
                ]
            }
            Self::MalformedManifest { path, .. } => vec![
                format!("Check that {} declares a `module` line", path),
                "Run `go mod init <module>` inside the backend service".into(),
            ],
            Self::EmptyTemplate { subdir } => vec![
                format!("Template '{}' is empty or missing", subdir),
                "Check --template-dir or the `templates.local_path` setting".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingPlaceholder { .. }
            | Self::InvalidPlaceholder { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::AliasCollision { .. } => ErrorCategory::Validation,
            Self::InvalidTemplate(_)
            | Self::EmptyTemplate { .. }
            | Self::DuplicatePath { .. }
            | Self::AnchorNotFound { .. }
            | Self::DuplicateAnchor { .. }
            | Self::MalformedManifest { .. } => ErrorCategory::Template,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    Internal,
}
