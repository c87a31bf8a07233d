//! Unified error handling for PizzaCutter Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for PizzaCutter Core operations.
#[derive(Debug, Error, Clone)]
pub enum CutterError {
    /// Errors from the domain layer (pattern logic violations).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration and I/O failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// I/O failure outside a specific filesystem port call.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CutterError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Io { .. } => vec![
                "Check that the paths exist and are accessible".into(),
                "Re-run with -vv for details".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in PizzaCutter".into(),
                "Please report this issue at: https://github.com/bitranox/PizzaCutter/issues"
                    .into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Pattern => ErrorCategory::Pattern,
                crate::domain::ErrorCategory::Template => ErrorCategory::Template,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Io { .. } => ErrorCategory::Io,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Pattern,
    Template,
    NotFound,
    Configuration,
    Io,
    Internal,
}

/// Convenient result type alias.
pub type CutterResult<T> = Result<T, CutterError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an I/O-ish error.
    fn context(self, msg: impl Into<String>) -> CutterResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> CutterResult<T> {
        self.map_err(|e| CutterError::Io {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
