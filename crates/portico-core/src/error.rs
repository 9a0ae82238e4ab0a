//! Unified error handling for Portico Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::{ApplicationError, PipelineStep};
use crate::domain::DomainError;

/// Root error type for Portico Core operations.
///
/// This enum wraps all possible errors that can occur when using portico-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum PorticoError {
    /// Errors from the domain layer (business logic violations).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// A gateway pipeline step failed; carries the step purpose and target.
    #[error("{step} for {}: {source}", target.display())]
    Step {
        step: PipelineStep,
        target: PathBuf,
        source: Box<PorticoError>,
    },

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl PorticoError {
    /// Wrap this error with the pipeline step that produced it.
    pub fn in_step(self, step: PipelineStep, target: impl Into<PathBuf>) -> Self {
        Self::Step {
            step,
            target: target.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any `Step` wrappers.
    pub fn root(&self) -> &PorticoError {
        match self {
            Self::Step { source, .. } => source.root(),
            other => other,
        }
    }

    /// The pipeline step this error was raised in, if any.
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            Self::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Step { source, target, .. } => {
                let mut out = source.suggestions();
                out.push(format!(
                    "The gateway at {} may be partially generated; re-run the full create",
                    target.display()
                ));
                out
            }
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Portico".into(),
                "Please report this issue at: https://github.com/cosecruz/portico/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Template => ErrorCategory::Template,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Step { source, .. } => source.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    NotFound,
    Conflict,
    External,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type PorticoResult<T> = Result<T, PorticoError>;
