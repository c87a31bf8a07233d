//! Structured, non-fatal build findings.
//!
//! Every diagnostic is kept in the [`Diagnostics`] sink (and so in the build
//! report) and is also emitted as a `tracing` event at its severity.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    AbsolutePathOverride,
    MultipleAbsolutePaths,
    EmptySegmentDropped,
    SkippedNoCopy,
    SkippedOutsideTarget,
    OutsideTargetAllowed,
    SkippedNoOverwrite,
    SkippedExistingTarget,
    Overwrite,
    UnfilledPattern,
    MissingClosingDelimiter,
    TempCleanupFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Path the finding is about (template source or build target).
    pub subject: PathBuf,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        kind: DiagnosticKind,
        subject: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, subject: &Path, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, subject, message)
    }

    pub fn info(kind: DiagnosticKind, subject: &Path, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, kind, subject, message)
    }

    pub fn debug(kind: DiagnosticKind, subject: &Path, message: impl Into<String>) -> Self {
        Self::new(Severity::Debug, kind, subject, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject.display(), self.message)
    }
}

/// Ordered diagnostics sink for one build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    /// Warnings are logged at debug level instead.
    #[serde(skip)]
    quiet: bool,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        let kind = diagnostic.kind;
        let subject = diagnostic.subject.display();
        let message = &diagnostic.message;
        match diagnostic.severity {
            Severity::Warning if !self.quiet => warn!(?kind, %subject, "{message}"),
            Severity::Warning | Severity::Debug => debug!(?kind, %subject, "{message}"),
            Severity::Info => info!(?kind, %subject, "{message}"),
        }
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity >= severity).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
