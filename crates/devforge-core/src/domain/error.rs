// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::project_name::NameViolation;
use crate::error::ErrorCategory;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid project name '{name}': {violation}")]
    InvalidProjectName {
        name: String,
        violation: NameViolation,
    },

    #[error("Invalid template name '{name}': {reason}")]
    InvalidTemplateName { name: String, reason: String },

    #[error("Invalid variable assignment '{input}': {reason}")]
    InvalidAssignment { input: String, reason: String },

    // ========================================================================
    // Template Authoring Errors
    // ========================================================================
    #[error("Malformed template expression at line {line}, column {column}: {reason}")]
    MalformedTemplate {
        reason: String,
        line: usize,
        column: usize,
    },

    #[error("Rendered entry name '{name}' is not a safe path component")]
    UnsafeEntryName { name: String },

    #[error("Path escapes the output root: {path}")]
    PathEscapesRoot { path: String },

    #[error("Invalid template manifest: {0}")]
    InvalidManifest(String),
}

impl DomainError {
    pub(crate) fn malformed(reason: impl Into<String>, line: usize, column: usize) -> Self {
        Self::MalformedTemplate {
            reason: reason.into(),
            line,
            column,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { .. } => vec![
                "Use lowercase letters, digits, '-', '.', or '~'".into(),
                "Start with a letter or digit".into(),
                "Examples: my-project, widget, demo.app".into(),
            ],
            Self::InvalidTemplateName { .. } => vec![
                "Template names must be a single directory name".into(),
                "Avoid '/', '\\', '.' and '..'".into(),
            ],
            Self::InvalidAssignment { .. } => vec![
                "Use the form KEY=VALUE, e.g. --set framework=react".into(),
            ],
            Self::MalformedTemplate { .. } => vec![
                "Check that every {{#if}} / {{#unless}} has a matching close tag".into(),
                "Supported helpers: kebabCase, camelCase".into(),
            ],
            Self::UnsafeEntryName { .. } | Self::PathEscapesRoot { .. } => vec![
                "A variable used in a file name produced a path separator or '..'".into(),
                "Use plain names for variables that appear in template file names".into(),
            ],
            Self::InvalidManifest(_) => vec!["Check template.json in the template root".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. }
            | Self::InvalidTemplateName { .. }
            | Self::InvalidAssignment { .. } => ErrorCategory::Validation,
            Self::MalformedTemplate { .. }
            | Self::UnsafeEntryName { .. }
            | Self::PathEscapesRoot { .. }
            | Self::InvalidManifest(_) => ErrorCategory::Io,
        }
    }
}
