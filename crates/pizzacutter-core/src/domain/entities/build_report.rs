use std::path::PathBuf;

use serde::Serialize;

use crate::domain::{audit::AuditFinding, diagnostics::Diagnostics, policy::SkipReason};

/// Skipped objects per reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub no_copy: usize,
    pub outside_target: usize,
    pub no_overwrite: usize,
    pub existing_target: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NoCopy => self.no_copy += 1,
            SkipReason::OutsideTarget => self.outside_target += 1,
            SkipReason::NoOverwrite => self.no_overwrite += 1,
            SkipReason::ExistingTarget => self.existing_target += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.no_copy + self.outside_target + self.no_overwrite + self.existing_target
    }
}

/// An audit finding tied to the target it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub path: PathBuf,
    #[serde(flatten)]
    pub finding: AuditFinding,
}

/// Outcome of one build.
///
/// Under dry-run the create/overwrite counters describe what would have
/// happened; nothing was written.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub template_root: PathBuf,
    pub target_root: PathBuf,
    pub dry_run: bool,
    /// Template objects discovered.
    pub objects: usize,
    pub directories_created: usize,
    pub files_created: usize,
    pub files_overwritten: usize,
    /// Files whose content went through the rewriter.
    pub files_rewritten: usize,
    pub skipped: SkipCounts,
    pub audit: Vec<AuditRecord>,
    pub diagnostics: Diagnostics,
}

impl BuildReport {
    pub fn new(
        template_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        dry_run: bool,
        quiet: bool,
    ) -> Self {
        Self {
            template_root: template_root.into(),
            target_root: target_root.into(),
            dry_run,
            diagnostics: Diagnostics::new(quiet),
            ..Self::default()
        }
    }

    pub fn has_audit_findings(&self) -> bool {
        !self.audit.is_empty()
    }
}
