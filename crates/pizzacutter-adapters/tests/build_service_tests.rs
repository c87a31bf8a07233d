//! Build service behavior against the in-memory and local filesystems.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use pizzacutter_adapters::{ConfigLoader, LocalFilesystem, MemoryFilesystem};
use pizzacutter_core::{
    application::{ApplicationError, BuildService, ports::Filesystem},
    domain::{
        AuditFinding, BuildConfig, BuildHooks, BuildReport, DiagnosticKind, NoHooks,
        PatternValue, Severity, TEMP_SUFFIX,
    },
    error::{CutterError, CutterResult},
};
use tempfile::TempDir;

const PROJECT: &str = "{{PizzaCutter.project_dir}}";
const NAME: &str = "{{PizzaCutter.name}}";
const SHARED: &str = "{{PizzaCutter.shared}}";
const NO_COPY: &str = "{{PizzaCutter.option.no_copy}}";
const NO_OVERWRITE: &str = "{{PizzaCutter.option.no_overwrite}}";
const DELETE_IF_EMPTY: &str = "{{PizzaCutter.option.delete_line_if_empty}}";

// ── helpers ───────────────────────────────────────────────────────────────

fn template_fs() -> MemoryFilesystem {
    let fs = MemoryFilesystem::new();
    fs.add_file(
        format!("/tpl/{PROJECT}/README.md"),
        format!("# {NAME}\ncut: {{{{PizzaCutter.True}}}}\n"),
    )
    .add_file(
        format!("/tpl/{PROJECT}/src/{NAME}.rs"),
        format!("pub fn {NAME}() {{}}\n"),
    )
    .add_file("/tpl/pizzacutter.toml", "# not copied\n")
    .add_file("/tpl/plain/ignored.txt", "not a template directory\n");
    fs
}

fn config() -> BuildConfig {
    BuildConfig::new("/tpl", "/out")
        .with_text(PROJECT, "demo")
        .with_text(NAME, "widget")
}

fn build(fs: &MemoryFilesystem, config: &mut BuildConfig) -> Result<BuildReport, CutterError> {
    BuildService::new(Box::new(fs.clone())).build(config, &mut NoHooks)
}

fn text(fs: &MemoryFilesystem, path: &str) -> String {
    fs.read_to_string(path).unwrap_or_else(|| panic!("missing {path}"))
}

// ── materialization and rewriting ─────────────────────────────────────────

#[test]
fn builds_project_with_substituted_paths_and_content() {
    let fs = template_fs();
    let report = build(&fs, &mut config()).unwrap();

    assert_eq!(
        fs.tree("/out"),
        vec![
            PathBuf::from("/out/demo"),
            PathBuf::from("/out/demo/README.md"),
            PathBuf::from("/out/demo/src"),
            PathBuf::from("/out/demo/src/widget.rs"),
        ]
    );
    assert_eq!(text(&fs, "/out/demo/README.md"), "# widget\ncut: True\n");
    assert_eq!(text(&fs, "/out/demo/src/widget.rs"), "pub fn widget() {}\n");

    assert_eq!(report.objects, 4);
    assert_eq!(report.files_created, 2);
    assert_eq!(report.directories_created, 2);
    assert_eq!(report.files_rewritten, 2);
    assert!(report.audit.is_empty());
}

#[test]
fn template_stays_untouched() {
    let fs = template_fs();
    let before: Vec<_> = fs
        .snapshot()
        .into_iter()
        .filter(|(p, _)| p.starts_with("/tpl"))
        .collect();

    build(&fs, &mut config()).unwrap();

    let after: Vec<_> = fs
        .snapshot()
        .into_iter()
        .filter(|(p, _)| p.starts_with("/tpl"))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn rebuild_with_overwrite_is_idempotent() {
    let fs = template_fs();
    build(&fs, &mut config().allow_overwrite(true)).unwrap();
    let first = fs.snapshot();

    let report = build(&fs, &mut config().allow_overwrite(true)).unwrap();
    assert_eq!(fs.snapshot(), first);
    assert_eq!(report.files_overwritten, 2);
    assert_eq!(report.files_created, 0);
}

#[test]
fn existing_targets_are_kept_without_overwrite() {
    let fs = template_fs();
    fs.add_file("/out/demo/README.md", "user edit\n");

    let report = build(&fs, &mut config()).unwrap();

    assert_eq!(text(&fs, "/out/demo/README.md"), "user edit\n");
    assert_eq!(text(&fs, "/out/demo/src/widget.rs"), "pub fn widget() {}\n");
    // the existing directory and file are both skipped
    assert_eq!(report.skipped.existing_target, 2);
}

#[test]
fn delete_line_marker_removes_blank_lines() {
    let fs = MemoryFilesystem::new();
    fs.add_file(
        format!("/tpl/{PROJECT}/setup.cfg"),
        format!("a = 1\n{{{{PizzaCutter.extra}}}}{DELETE_IF_EMPTY}\nb = 2\n"),
    );
    let mut config = config().with_text("{{PizzaCutter.extra}}", "");

    build(&fs, &mut config).unwrap();
    assert_eq!(text(&fs, "/out/demo/setup.cfg"), "a = 1\nb = 2\n");
}

// ── option markers ────────────────────────────────────────────────────────

#[test]
fn no_copy_marker_skips_object_and_descendants() {
    let fs = template_fs();
    fs.add_file(format!("/tpl/{PROJECT}/docs{NO_COPY}/guide.md"), "guide\n")
        .add_file(format!("/tpl/{PROJECT}/notes.txt{NO_COPY}"), "notes\n");

    let report = build(&fs, &mut config()).unwrap();

    assert!(!fs.exists(Path::new("/out/demo/docs")));
    assert!(!fs.exists(Path::new("/out/demo/notes.txt")));
    assert_eq!(report.skipped.no_copy, 3);
}

#[test]
fn no_overwrite_marker_protects_existing_file() {
    let fs = template_fs();
    fs.add_file(format!("/tpl/{PROJECT}/settings.ini{NO_OVERWRITE}"), "fresh\n")
        .add_file("/out/demo/settings.ini", "customized\n");

    let report = build(&fs, &mut config().allow_overwrite(true)).unwrap();

    assert_eq!(text(&fs, "/out/demo/settings.ini"), "customized\n");
    assert_eq!(report.skipped.no_overwrite, 1);
}

#[test]
fn no_overwrite_marker_still_creates_missing_file() {
    let fs = template_fs();
    fs.add_file(format!("/tpl/{PROJECT}/settings.ini{NO_OVERWRITE}"), "fresh\n");

    build(&fs, &mut config()).unwrap();
    assert_eq!(text(&fs, "/out/demo/settings.ini"), "fresh\n");
}

#[test]
fn marker_only_segment_fails_the_build() {
    let fs = template_fs();
    fs.add_file(format!("/tpl/{PROJECT}/{NO_COPY}"), "x\n");

    let err = build(&fs, &mut config()).unwrap_err();
    assert!(err.to_string().contains("empty after removing option markers"));
}

// ── outside writes ────────────────────────────────────────────────────────

fn shared_template() -> MemoryFilesystem {
    let fs = MemoryFilesystem::new();
    fs.add_file(format!("/tpl/{PROJECT}/{SHARED}/conf.ini"), "name={{PizzaCutter.name}}\n");
    fs
}

#[test]
fn absolute_override_outside_target_is_skipped_by_default() {
    let fs = shared_template();
    let mut config = config().with_path(SHARED, "/shared");

    let report = build(&fs, &mut config).unwrap();

    assert!(!fs.exists(Path::new("/shared")));
    assert_eq!(report.skipped.outside_target, 2);
    assert_eq!(
        report
            .diagnostics
            .of_kind(DiagnosticKind::AbsolutePathOverride)
            .count(),
        2
    );
    assert!(
        report
            .diagnostics
            .of_kind(DiagnosticKind::SkippedOutsideTarget)
            .all(|d| d.severity == Severity::Warning)
    );
}

#[test]
fn absolute_override_writes_when_allowed() {
    let fs = shared_template();
    let mut config = config()
        .with_path(SHARED, "/shared")
        .allow_outside_write(true);

    let report = build(&fs, &mut config).unwrap();

    assert_eq!(text(&fs, "/shared/conf.ini"), "name=widget\n");
    assert!(
        report
            .diagnostics
            .of_kind(DiagnosticKind::OutsideTargetAllowed)
            .count()
            >= 1
    );
}

#[test]
fn relative_fragment_escaping_target_counts_as_outside() {
    let fs = shared_template();
    let mut config = config().with_path(SHARED, "../../sibling");

    let report = build(&fs, &mut config).unwrap();
    assert!(!fs.exists(Path::new("/sibling/conf.ini")));
    assert_eq!(report.skipped.outside_target, 2);
}

#[test]
fn outside_skip_is_info_under_dry_run() {
    let fs = shared_template();
    let mut config = config().with_path(SHARED, "/shared").dry_run(true);

    let report = build(&fs, &mut config).unwrap();
    assert!(
        report
            .diagnostics
            .of_kind(DiagnosticKind::SkippedOutsideTarget)
            .all(|d| d.severity == Severity::Info)
    );
}

// ── dry run ───────────────────────────────────────────────────────────────

#[test]
fn dry_run_has_no_effect_across_flag_matrix() {
    for overwrite in [false, true] {
        for outside in [false, true] {
            for quiet in [false, true] {
                for prepopulated in [false, true] {
                    let fs = template_fs();
                    fs.add_file(format!("/tpl/{PROJECT}/{SHARED}/conf.ini"), "x\n");
                    if prepopulated {
                        fs.add_file("/out/demo/README.md", "user edit\n");
                    }
                    let before = (fs.snapshot(), fs.tree("/"));

                    let mut config = config()
                        .with_path(SHARED, "/shared")
                        .allow_overwrite(overwrite)
                        .allow_outside_write(outside)
                        .quiet(quiet)
                        .dry_run(true);
                    let report = build(&fs, &mut config).unwrap();

                    assert_eq!(
                        (fs.snapshot(), fs.tree("/")),
                        before,
                        "overwrite={overwrite} outside={outside} quiet={quiet} prepopulated={prepopulated}"
                    );
                    assert!(report.dry_run);
                    assert_eq!(report.files_rewritten, 0);
                }
            }
        }
    }
}

#[test]
fn only_dry_run_flag_separates_plan_from_write() {
    for dry_run in [false, true] {
        let fs = template_fs();
        let before = fs.snapshot();

        let report = build(&fs, &mut config().dry_run(dry_run)).unwrap();

        assert_eq!(report.dry_run, dry_run);
        assert_eq!(report.files_created, 2, "dry_run={dry_run}");
        assert_eq!(fs.snapshot() == before, dry_run, "dry_run={dry_run}");
        assert_eq!(fs.exists(Path::new("/out/demo/README.md")), !dry_run);
        assert_eq!(report.files_rewritten, if dry_run { 0 } else { 2 });
    }
}

#[test]
fn dry_run_counts_what_would_happen() {
    let fs = template_fs();
    let report = build(&fs, &mut config().dry_run(true)).unwrap();
    assert_eq!(report.files_created, 2);
    assert!(!fs.exists(Path::new("/out")));
}

// ── audit ─────────────────────────────────────────────────────────────────

#[test]
fn unfilled_patterns_are_reported_not_fatal() {
    let fs = MemoryFilesystem::new();
    fs.add_file(
        format!("/tpl/{PROJECT}/left_{{{{PizzaCutter.other}}}}.txt"),
        "value = {{PizzaCutter.unknown}}\nbroken = {{PizzaCutter.open\n",
    );

    let report = build(&fs, &mut config()).unwrap();

    let findings: Vec<_> = report.audit.iter().map(|r| r.finding.clone()).collect();
    assert_eq!(
        findings,
        vec![
            AuditFinding::UnfilledPattern {
                pattern: "{{PizzaCutter.other}}".into()
            },
            AuditFinding::UnfilledPattern {
                pattern: "{{PizzaCutter.unknown}}".into()
            },
            AuditFinding::MissingClosingDelimiter {
                fragment: "{{PizzaCutter.open".into()
            },
        ]
    );
    assert_eq!(
        report
            .diagnostics
            .of_kind(DiagnosticKind::UnfilledPattern)
            .count(),
        2
    );
}

#[test]
fn skipped_objects_are_not_audited() {
    let fs = MemoryFilesystem::new();
    fs.add_file(
        format!("/tpl/{PROJECT}/skip{NO_COPY}.txt"),
        "{{PizzaCutter.unknown}}\n",
    );

    let report = build(&fs, &mut config()).unwrap();
    assert!(report.audit.is_empty());
}

// ── failures ──────────────────────────────────────────────────────────────

#[test]
fn failed_rewrite_removes_temp_and_keeps_original() {
    let fs = template_fs();
    let temp = format!("/out/demo/README.md{TEMP_SUFFIX}");
    fs.fail_writes_to(&temp);

    let err = build(&fs, &mut config()).unwrap_err();

    assert!(matches!(
        err,
        CutterError::Application(ApplicationError::RewriteFailed { .. })
    ));
    assert!(!fs.exists(Path::new(&temp)));
    // copied, not yet rewritten
    assert_eq!(
        text(&fs, "/out/demo/README.md"),
        format!("# {NAME}\ncut: {{{{PizzaCutter.True}}}}\n")
    );
}

/// Memory filesystem whose `rename` always fails.
struct RenameFails(MemoryFilesystem);

impl Filesystem for RenameFails {
    fn exists(&self, path: &Path) -> bool {
        self.0.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.0.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.0.is_file(path)
    }

    fn read_dir(&self, path: &Path) -> CutterResult<Vec<PathBuf>> {
        self.0.read_dir(path)
    }

    fn walk(&self, path: &Path) -> CutterResult<Vec<PathBuf>> {
        self.0.walk(path)
    }

    fn create_dir_all(&self, path: &Path) -> CutterResult<()> {
        self.0.create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> CutterResult<()> {
        self.0.copy_file(from, to)
    }

    fn remove_file(&self, path: &Path) -> CutterResult<()> {
        self.0.remove_file(path)
    }

    fn rename(&self, from: &Path, _to: &Path) -> CutterResult<()> {
        Err(ApplicationError::FilesystemError {
            path: from.to_path_buf(),
            reason: "rename refused".into(),
        }
        .into())
    }

    fn open_read(&self, path: &Path) -> CutterResult<Box<dyn BufRead>> {
        self.0.open_read(path)
    }

    fn create_write(&self, path: &Path) -> CutterResult<Box<dyn Write>> {
        self.0.create_write(path)
    }

    fn read_bytes(&self, path: &Path) -> CutterResult<Vec<u8>> {
        self.0.read_bytes(path)
    }
}

#[test]
fn failed_swap_removes_temp_and_keeps_copied_file() {
    let fs = MemoryFilesystem::new();
    fs.add_file(format!("/tpl/{PROJECT}/a.txt"), format!("{NAME}\n"));

    let err = BuildService::new(Box::new(RenameFails(fs.clone())))
        .build(&mut config(), &mut NoHooks)
        .unwrap_err();

    assert!(matches!(
        err,
        CutterError::Application(ApplicationError::RewriteFailed { .. })
    ));
    assert!(!fs.exists(Path::new(&format!("/out/demo/a.txt{TEMP_SUFFIX}"))));
    assert_eq!(text(&fs, "/out/demo/a.txt"), format!("{NAME}\n"));
}

#[test]
fn pattern_cycle_aborts_before_writing() {
    let fs = template_fs();
    let mut config = config()
        .with_text("{{PizzaCutter.a}}", "{{PizzaCutter.b}}")
        .with_text("{{PizzaCutter.b}}", "{{PizzaCutter.a}}");

    let err = build(&fs, &mut config).unwrap_err();
    assert!(err.to_string().contains("refers back to"));
    assert!(!fs.exists(Path::new("/out")));
}

// ── hooks ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingHooks {
    calls: Vec<&'static str>,
    created: usize,
}

impl BuildHooks for RecordingHooks {
    fn before_build(&mut self, config: &mut BuildConfig) {
        self.calls.push("before");
        config.patterns.insert(NAME, PatternValue::text("from_hook"));
    }

    fn after_build(&mut self, _config: &mut BuildConfig, report: &BuildReport) {
        self.calls.push("after");
        self.created = report.files_created;
    }
}

#[test]
fn hooks_wrap_the_build() {
    let fs = template_fs();
    let mut hooks = RecordingHooks::default();
    BuildService::new(Box::new(fs.clone()))
        .build(&mut config(), &mut hooks)
        .unwrap();

    assert_eq!(hooks.calls, ["before", "after"]);
    assert_eq!(hooks.created, 2);
    assert!(fs.exists(Path::new("/out/demo/src/from_hook.rs")));
}

// ── local filesystem end to end ───────────────────────────────────────────

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn local_build_from_conf_file_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let tpl = temp.path().join("template");
    write(
        &tpl.join("pizzacutter.toml"),
        r#"
[settings]
allow_overwrite = true
target_dir = "../work"

[patterns]
"{{PizzaCutter.project_dir}}" = "demo"
"{{PizzaCutter.name}}" = "widget"
"{{PizzaCutter.docs}}" = { path = "docs/api" }
"#,
    );
    write(
        &tpl.join(PROJECT).join("{{PizzaCutter.docs}}/index.md"),
        "docs for {{PizzaCutter.name}} in {{PizzaCutter.docs}}\n",
    );
    write(&tpl.join(PROJECT).join("bin.dat"), "\u{0}\u{1}{{PizzaCutter.name}}");

    let load = || {
        ConfigLoader::new(tpl.join("pizzacutter.toml"))
            .cwd(temp.path())
            .load()
            .unwrap()
    };
    let service = BuildService::new(Box::new(LocalFilesystem::new()));

    let report = service.build(&mut load(), &mut NoHooks).unwrap();
    assert_eq!(report.files_created, 2);

    let work = fs::canonicalize(temp.path().join("work")).unwrap();
    let index = work.join("demo/docs/api/index.md");
    assert_eq!(
        fs::read_to_string(&index).unwrap(),
        "docs for widget in docs/api\n"
    );
    assert_eq!(
        fs::read(work.join("demo/bin.dat")).unwrap(),
        b"\x00\x01widget".to_vec()
    );

    let first = fs::read(&index).unwrap();
    let report = service.build(&mut load(), &mut NoHooks).unwrap();
    assert_eq!(report.files_overwritten, 2);
    assert_eq!(fs::read(&index).unwrap(), first);

    let leftovers: Vec<_> = walk(&work)
        .into_iter()
        .filter(|p| p.to_string_lossy().ends_with(TEMP_SUFFIX))
        .collect();
    assert!(leftovers.is_empty());
    assert!(LocalFilesystem.is_dir(&work.join("demo/docs")));
}

fn walk(root: &Path) -> Vec<PathBuf> {
    LocalFilesystem.walk(root).unwrap()
}
