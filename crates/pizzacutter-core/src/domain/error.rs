// ============================================================================
// domain/error.rs - PATTERN ENGINE ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is fatal for the build that raised it. Non-fatal findings
/// (policy skips, leftover placeholders) are diagnostics, not errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Pattern resolution
    // ========================================================================
    #[error("pattern \"{token}\" refers back to \"{back_reference}\" (stack: {stack:?})")]
    PatternCycle {
        /// The token whose value holds the back reference.
        token: String,
        /// The token that was already being resolved.
        back_reference: String,
        stack: Vec<String>,
    },

    // ========================================================================
    // Path rewriting
    // ========================================================================
    #[error("path segment is empty after removing option markers: {path}")]
    MalformedPathSegment { path: String },

    #[error("path pattern \"{pattern}\" can only be one complete part of the path: {path}")]
    PathPatternNotWholeSegment { path: String, pattern: String },

    #[error("source {path} is not inside the template root {template_root}")]
    SourceOutsideTemplate { path: String, template_root: String },

    // ========================================================================
    // Content rewriting
    // ========================================================================
    #[error("recursion on include: {path} is already being rewritten (stack: {stack:?})")]
    RecursionOnInclude { path: String, stack: Vec<String> },

    // ========================================================================
    // Constraint violations
    // ========================================================================
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PatternCycle {
                token,
                back_reference,
                stack,
            } => vec![
                format!("\"{token}\" expands to a value containing \"{back_reference}\""),
                format!("Resolution chain: {}", stack.join(" -> ")),
                "Break the loop by replacing one of the references with literal text".into(),
            ],
            Self::MalformedPathSegment { path } => vec![
                format!("Offending template path: {path}"),
                "Option markers must be attached to a real file or directory name".into(),
            ],
            Self::PathPatternNotWholeSegment { pattern, .. } => vec![
                format!("Rename the template object to exactly \"{pattern}\""),
                "Or define the pattern as a text value instead of a path".into(),
            ],
            Self::InvalidConfiguration(msg) => vec![
                "Check the [patterns], [options] and audit_prefixes tables".into(),
                format!("Details: {msg}"),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PatternCycle { .. } => ErrorCategory::Pattern,
            Self::MalformedPathSegment { .. }
            | Self::PathPatternNotWholeSegment { .. }
            | Self::RecursionOnInclude { .. } => ErrorCategory::Template,
            Self::InvalidConfiguration(_) => ErrorCategory::Validation,
            Self::SourceOutsideTemplate { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Pattern,
    Template,
    Internal,
}
