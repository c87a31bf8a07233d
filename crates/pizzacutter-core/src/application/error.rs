//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not pattern
//! logic. Pattern logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    ConfigurationNotFound { path: PathBuf },

    /// The configuration file exists but could not be understood.
    #[error("Invalid configuration in {path}: {reason}")]
    ConfigurationInvalid { path: PathBuf, reason: String },

    /// The template directory does not exist.
    #[error("Template directory not found: {path}")]
    TemplateDirNotFound { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Rewriting a target file in place failed; the original is untouched.
    #[error("Rewriting {path} failed: {reason}")]
    RewriteFailed { path: PathBuf, reason: String },

    /// In-memory adapter state is unusable (lock poisoned).
    #[error("Filesystem state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigurationNotFound { path } => vec![
                format!("No file at: {}", path.display()),
                "Pass the path to an existing pizzacutter TOML file".into(),
            ],
            Self::ConfigurationInvalid { reason, .. } => vec![
                format!("Parser said: {reason}"),
                "Check the [settings], [options] and [patterns] tables".into(),
            ],
            Self::TemplateDirNotFound { path } => vec![
                format!("Missing directory: {}", path.display()),
                "Check --template-dir or settings.template_dir".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Re-run with --overwrite to complete a partially written target".into(),
            ],
            Self::RewriteFailed { path, .. } => vec![
                format!("The original file was kept: {}", path.display()),
                "Check free disk space and permissions".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationNotFound { .. } | Self::TemplateDirNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::ConfigurationInvalid { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. } | Self::RewriteFailed { .. } => ErrorCategory::Io,
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
