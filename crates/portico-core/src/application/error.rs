//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the outside world
//! (filesystem, Go toolchain), not in business logic. Business logic errors
//! are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Gateway already exists and overwriting is disabled.
    #[error("Gateway already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// A backend service looked exposed but could not be described.
    #[error("Cannot discover service {service}: {reason}")]
    Discovery { service: String, reason: String },

    /// Reading or writing a generated file during injection failed.
    #[error("Cannot inject into {file}: {reason}")]
    Injection { file: PathBuf, reason: String },

    /// A `go mod` invocation failed.
    #[error("`{command}` failed in {dir}: {output}")]
    Module {
        command: String,
        dir: PathBuf,
        output: String,
    },

    /// A `go work` invocation failed.
    #[error("`{command}` failed in {dir}: {output}")]
    Workspace {
        command: String,
        dir: PathBuf,
        output: String,
    },

    /// An external tool is not installed.
    #[error("Required tool not found on PATH: {tool}")]
    ToolNotFound { tool: String },

    /// No template files under the requested subdir.
    #[error("Template '{subdir}' not found in {source_name}")]
    TemplateNotFound { subdir: String, source_name: String },

    /// Template rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AlreadyExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Drop --no-overwrite to regenerate it (destructive)".into(),
                "Choose a different gateway name or namespace".into(),
            ],
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::Discovery { service, .. } => vec![
                format!("Inspect the backend service {}", service),
                "Exposed services need a go.mod declaring their module".into(),
            ],
            Self::Module { command, .. } | Self::Workspace { command, .. } => vec![
                format!("Re-run `{}` by hand to see the full output", command),
                "Check that backend modules referenced by replace directives build".into(),
            ],
            Self::ToolNotFound { tool } => vec![
                format!("Install `{}` and make sure it is on PATH", tool),
                "Or set `toolchain.go_binary` in the config file".into(),
            ],
            Self::TemplateNotFound { subdir, .. } => vec![
                format!("No files found for template '{}'", subdir),
                "Try: portico config get templates.local_path".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::Discovery { .. } => ErrorCategory::Validation,
            Self::TemplateNotFound { .. } | Self::ToolNotFound { .. } => ErrorCategory::NotFound,
            Self::Module { .. } | Self::Workspace { .. } => ErrorCategory::External,
            Self::RenderingFailed { .. } => ErrorCategory::Template,
            Self::Filesystem { .. } | Self::Injection { .. } | Self::RollbackFailed { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}
