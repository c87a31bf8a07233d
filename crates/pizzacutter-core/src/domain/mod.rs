// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for PizzaCutter.
//!
//! Pure pattern logic: resolution, path rewriting, content rewriting, copy
//! policy and auditing. All I/O goes through the ports defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: rewriters work on paths, byte slices and `BufRead`/`Write`
//! - **Few external crates**: std library + thiserror + tracing + serde
//! - **Two-phase patterns**: `RawPatterns` → [`resolver::resolve`] → `ResolvedPatterns`
//!
// Public API - what the world sees
pub mod audit;
pub mod content_rewriter;
pub mod diagnostics;
pub mod entities;
pub mod error;
pub mod path_rewriter;
pub mod policy;
pub mod resolver;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use audit::{AUDIT_WINDOW, AuditFinding, Auditor};
pub use content_rewriter::{
    ContentRewriter, IncludeGuard, RewriteStats, TEMP_SUFFIX, temp_path_for,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use entities::{
    AuditRecord, BuildConfig, BuildHooks, BuildReport, NoHooks, RawPatterns, ResolvedPatterns,
    SkipCounts,
};
pub use error::{DomainError, ErrorCategory};
pub use path_rewriter::{PathRewriter, RewrittenPath};
pub use policy::{CopyPolicy, Decision, SkipReason};
pub use resolver::resolve;
pub use value_objects::{
    CLOSE_DELIMITER, OPEN_DELIMITER, OptionMarkers, OptionRole, PatternValue, TRUE_TOKEN, Token,
    default_audit_prefixes,
};

pub use entities::common::normalize_lexically;
pub use validation::DomainValidator;
