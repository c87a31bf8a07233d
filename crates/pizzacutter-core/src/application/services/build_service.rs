//! Build Service - the one use case PizzaCutter has.
//!
//! A build runs strictly in sequence:
//! 1. `before_build` hook
//! 2. Resolve patterns
//! 3. Discover template objects
//! 4. Materialize the target tree under the copy policy
//! 5. Rewrite the content of files materialized in this run
//! 6. Audit targets for unfilled patterns
//! 7. `after_build` hook

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        AuditFinding, AuditRecord, Auditor, BuildConfig, BuildHooks, BuildReport,
        ContentRewriter, CopyPolicy, Decision, Diagnostic, DiagnosticKind, Diagnostics,
        DomainValidator as validator, IncludeGuard, PathRewriter, ResolvedPatterns,
        RewriteStats, RewrittenPath, SkipReason, resolve, temp_path_for,
    },
    error::{Context, CutterResult},
};

/// A template object paired with where it goes.
#[derive(Debug)]
struct PlannedObject {
    source: PathBuf,
    is_dir: bool,
    target: RewrittenPath,
    /// Skips that do not depend on the state of the target.
    precheck: Option<SkipReason>,
    /// Written in this run.
    materialized: bool,
}

/// Main build service.
///
/// Orchestrates resolution, materialization, rewriting and auditing against
/// an injected filesystem.
pub struct BuildService {
    filesystem: Box<dyn Filesystem>,
}

impl BuildService {
    /// Create a new build service with the given filesystem adapter.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pizzacutter_core::application::BuildService;
    /// use pizzacutter_core::domain::{BuildConfig, NoHooks};
    ///
    /// # fn run(filesystem: Box<dyn pizzacutter_core::application::Filesystem>) {
    /// let service = BuildService::new(filesystem);
    /// let mut config = BuildConfig::new("/templates/app", "/work/app")
    ///     .with_text("{{PizzaCutter.project_dir}}", "app");
    /// let report = service.build(&mut config, &mut NoHooks).unwrap();
    /// println!("{} files created", report.files_created);
    /// # }
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Build or rebuild the target described by `config`.
    #[instrument(
        skip_all,
        fields(
            template = %config.template_root.display(),
            target = %config.target_root.display(),
            dry_run = config.dry_run
        )
    )]
    pub fn build(
        &self,
        config: &mut BuildConfig,
        hooks: &mut dyn BuildHooks,
    ) -> CutterResult<BuildReport> {
        hooks.before_build(config);

        validator::validate_build_config(config)?;
        if !self.filesystem.is_dir(&config.template_root) {
            return Err(ApplicationError::TemplateDirNotFound {
                path: config.template_root.clone(),
            }
            .into());
        }

        let patterns = resolve(&config.patterns)?;
        info!(patterns = patterns.len(), "Patterns resolved");

        let mut report = BuildReport::new(
            &config.template_root,
            &config.target_root,
            config.dry_run,
            config.quiet,
        );

        let objects = self.discover(&config.template_root, &patterns)?;
        report.objects = objects.len();
        info!(objects = objects.len(), "Template objects discovered");

        let mut plan = self.plan(config, &patterns, objects, &mut report.diagnostics)?;
        self.materialize(config, &mut plan, &mut report)?;

        if config.dry_run {
            debug!("Dry run, content rewriting skipped");
        } else {
            self.rewrite_contents(config, &patterns, &plan, &mut report)?;
        }

        self.audit(config, &plan, &mut report)?;

        info!(
            created = report.files_created,
            overwritten = report.files_overwritten,
            skipped = report.skipped.total(),
            unfilled = report.audit.len(),
            "Build completed"
        );

        hooks.after_build(config, &report);
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Stages
    // -------------------------------------------------------------------------

    /// Qualifying children of the template root (directories whose name holds
    /// a token) plus all their descendants, sorted parents first.
    fn discover(
        &self,
        template_root: &Path,
        patterns: &ResolvedPatterns,
    ) -> CutterResult<Vec<(PathBuf, bool)>> {
        let mut objects = BTreeSet::new();

        for child in self.filesystem.read_dir(template_root)? {
            if !self.filesystem.is_dir(&child) {
                continue;
            }
            let name = child
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !patterns.any_token_in(&name) {
                debug!(path = %child.display(), "Not a template directory");
                continue;
            }
            objects.extend(self.filesystem.walk(&child)?);
        }

        Ok(objects
            .into_iter()
            .map(|path| {
                let is_dir = self.filesystem.is_dir(&path);
                (path, is_dir)
            })
            .collect())
    }

    fn plan(
        &self,
        config: &BuildConfig,
        patterns: &ResolvedPatterns,
        objects: Vec<(PathBuf, bool)>,
        diagnostics: &mut Diagnostics,
    ) -> CutterResult<Vec<PlannedObject>> {
        let rewriter = PathRewriter::new(
            patterns,
            &config.options,
            &config.template_root,
            &config.target_root,
        );
        let policy = policy_for(config);

        let mut plan = Vec::with_capacity(objects.len());
        for (source, is_dir) in objects {
            let target = rewriter.target_path_for(&source, diagnostics)?;
            let precheck = policy.precheck(&source, &target.path);
            plan.push(PlannedObject {
                source,
                is_dir,
                target,
                precheck,
                materialized: false,
            });
        }
        Ok(plan)
    }

    fn materialize(
        &self,
        config: &BuildConfig,
        plan: &mut [PlannedObject],
        report: &mut BuildReport,
    ) -> CutterResult<()> {
        let policy = policy_for(config);

        for object in plan.iter_mut() {
            let target = object.target.path.as_path();
            let exists = self.filesystem.exists(target);
            let decision = policy.decide(&object.source, target, exists);
            record_decision(config, object, decision, &mut report.diagnostics);

            let overwrite = match decision {
                Decision::Skip(reason) => {
                    report.skipped.record(reason);
                    continue;
                }
                Decision::Proceed { overwrite } => overwrite,
            };

            if object.is_dir {
                if !overwrite {
                    report.directories_created += 1;
                }
            } else if overwrite {
                report.files_overwritten += 1;
            } else {
                report.files_created += 1;
            }

            if config.dry_run {
                continue;
            }

            if object.is_dir {
                self.filesystem.create_dir_all(target)?;
            } else {
                if let Some(parent) = target.parent() {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.filesystem.remove_file(target)?;
                self.filesystem.copy_file(&object.source, target)?;
                object.materialized = true;
            }
        }
        Ok(())
    }

    fn rewrite_contents(
        &self,
        config: &BuildConfig,
        patterns: &ResolvedPatterns,
        plan: &[PlannedObject],
        report: &mut BuildReport,
    ) -> CutterResult<()> {
        let rewriter = ContentRewriter::new(patterns, &config.options);
        let mut guard = IncludeGuard::new();

        for object in plan.iter().filter(|o| o.materialized) {
            let target = object.target.path.as_path();
            guard.enter(target)?;
            let stats = self.rewrite_file(&rewriter, target, &mut report.diagnostics)?;
            guard.leave();

            report.files_rewritten += 1;
            debug!(
                path = %target.display(),
                changed = stats.lines_changed,
                deleted = stats.lines_deleted,
                "Content rewritten"
            );
        }
        Ok(())
    }

    /// Rewrite `target` into its temp file, then rename it over `target`.
    /// On failure the temp file is removed and the original stays as it was.
    fn rewrite_file(
        &self,
        rewriter: &ContentRewriter<'_>,
        target: &Path,
        diagnostics: &mut Diagnostics,
    ) -> CutterResult<RewriteStats> {
        let temp = temp_path_for(target);

        let swapped = self
            .filesystem
            .open_read(target)
            .and_then(|reader| {
                let writer = self.filesystem.create_write(&temp)?;
                rewriter
                    .rewrite_stream(reader, writer)
                    .context(format!("rewriting {}", target.display()))
            })
            .and_then(|stats| {
                self.filesystem.rename(&temp, target)?;
                Ok(stats)
            });

        match swapped {
            Ok(stats) => Ok(stats),
            Err(err) => {
                if self.filesystem.exists(&temp) {
                    if let Err(cleanup) = self.filesystem.remove_file(&temp) {
                        diagnostics.push(Diagnostic::warning(
                            DiagnosticKind::TempCleanupFailed,
                            &temp,
                            format!("could not remove temp file: {cleanup}"),
                        ));
                    }
                }
                warn!(path = %target.display(), error = %err, "Rewrite failed");
                Err(ApplicationError::RewriteFailed {
                    path: target.to_path_buf(),
                    reason: err.to_string(),
                }
                .into())
            }
        }
    }

    fn audit(
        &self,
        config: &BuildConfig,
        plan: &[PlannedObject],
        report: &mut BuildReport,
    ) -> CutterResult<()> {
        let auditor = Auditor::new(&config.audit_prefixes);

        for object in plan.iter().filter(|o| o.precheck.is_none()) {
            let target = object.target.path.as_path();
            let mut findings = auditor.scan_path(target);
            if self.filesystem.is_file(target) {
                let content = self.filesystem.read_bytes(target)?;
                findings.extend(auditor.scan_content(&content));
            }

            for finding in findings {
                let kind = match finding {
                    AuditFinding::UnfilledPattern { .. } => DiagnosticKind::UnfilledPattern,
                    AuditFinding::MissingClosingDelimiter { .. } => {
                        DiagnosticKind::MissingClosingDelimiter
                    }
                };
                report
                    .diagnostics
                    .push(Diagnostic::warning(kind, target, finding.to_string()));
                report.audit.push(AuditRecord {
                    path: target.to_path_buf(),
                    finding,
                });
            }
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------
// Internal Helpers
// -------------------------------------------------------------------------

fn policy_for(config: &BuildConfig) -> CopyPolicy<'_> {
    CopyPolicy::new(
        &config.options,
        &config.target_root,
        config.allow_overwrite,
        config.allow_outside_write,
    )
}

fn record_decision(
    config: &BuildConfig,
    object: &PlannedObject,
    decision: Decision,
    diagnostics: &mut Diagnostics,
) {
    let target = object.target.path.as_path();
    let shown = target.display();
    let diagnostic = match decision {
        Decision::Skip(SkipReason::NoCopy) => Diagnostic::debug(
            DiagnosticKind::SkippedNoCopy,
            &object.source,
            format!("object not copied, marked no-copy: {shown}"),
        ),
        Decision::Skip(SkipReason::OutsideTarget) => {
            let message = format!("object not written, outside the project directory: {shown}");
            if config.dry_run {
                Diagnostic::info(DiagnosticKind::SkippedOutsideTarget, target, message)
            } else {
                Diagnostic::warning(DiagnosticKind::SkippedOutsideTarget, target, message)
            }
        }
        Decision::Skip(SkipReason::NoOverwrite) => Diagnostic::debug(
            DiagnosticKind::SkippedNoOverwrite,
            target,
            format!("object not overwritten, marked no-overwrite: {shown}"),
        ),
        Decision::Skip(SkipReason::ExistingTarget) => Diagnostic::debug(
            DiagnosticKind::SkippedExistingTarget,
            target,
            format!("object overwrite skipped, allow_overwrite = false: {shown}"),
        ),
        Decision::Proceed { overwrite } => {
            let outside = !target.starts_with(&config.target_root);
            if outside {
                diagnostics.push(Diagnostic::info(
                    DiagnosticKind::OutsideTargetAllowed,
                    target,
                    format!("writing outside the project directory: {shown}"),
                ));
            }
            if !overwrite || object.is_dir {
                return;
            }
            let verb = if config.dry_run { "will be" } else { "is" };
            Diagnostic::debug(
                DiagnosticKind::Overwrite,
                target,
                format!("object {verb} overwritten: {shown}"),
            )
        }
    };
    diagnostics.push(diagnostic);
}
