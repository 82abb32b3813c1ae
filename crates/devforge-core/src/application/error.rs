//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No template with this name in the registry.
    #[error("Template '{name}' not found")]
    TemplateNotFound { name: String },

    /// A source directory given by the user does not exist.
    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// A template with this name is already registered.
    #[error("Template '{name}' already exists")]
    TemplateExists { name: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A template file could not be rendered.
    #[error("Failed to render {path}: {reason}")]
    RenderingFailed { path: PathBuf, reason: String },

    /// A pre-render hook refused the configuration.
    #[error("Hook '{hook}' failed: {reason}")]
    HookFailed { hook: String, reason: String },

    /// The per-output-root lock was poisoned by a panicking render.
    #[error("Output lock for {path} is poisoned")]
    LockPoisoned { path: PathBuf },
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { name } => vec![
                format!("No template named '{}' in the registry", name),
                "Try: devforge template list to see available templates".into(),
                "Or register one with: devforge template add <name> <path>".into(),
            ],
            Self::SourceNotFound { path } => vec![
                format!("Check that {} exists and is a directory", path.display()),
            ],
            Self::TemplateExists { name } => vec![
                format!("Remove it first: devforge template remove {}", name),
                "Or choose a different template name".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Files written before the failure were left in place".into(),
            ],
            Self::RenderingFailed { path, .. } => vec![
                format!("Fix the template file {}", path.display()),
                "Files written before the failure were left in place".into(),
            ],
            Self::HookFailed { hook, .. } => vec![
                format!("Disable the '{}' plugin or fix its input", hook),
                "Nothing was written to the output directory".into(),
            ],
            Self::LockPoisoned { .. } => vec![
                "A previous render into this directory panicked".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } | Self::SourceNotFound { .. } => ErrorCategory::NotFound,
            Self::TemplateExists { .. } => ErrorCategory::AlreadyExists,
            Self::FilesystemError { .. } | Self::RenderingFailed { .. } => ErrorCategory::Io,
            Self::HookFailed { .. } => ErrorCategory::Hook,
            Self::LockPoisoned { .. } => ErrorCategory::Internal,
        }
    }
}
