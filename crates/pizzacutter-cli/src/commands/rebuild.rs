//! Implementation of the `pizzacutter rebuild` command.
//!
//! Responsibility: turn the conf file and flags into a `BuildConfig`, run
//! the build service against the local filesystem, and display the report.

use tracing::{debug, instrument};

use pizzacutter_adapters::LocalFilesystem;
use pizzacutter_core::{
    application::BuildService,
    domain::{BuildConfig, NoHooks},
};

use crate::{
    cli::{RebuildArgs, global::GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute the `pizzacutter rebuild` command.
///
/// Switch precedence: CLI flag > preferences > conf file `[settings]`.
#[instrument(skip_all, fields(conf = %args.conf_file.display()))]
pub fn execute(
    args: RebuildArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut build = super::load_build_config(&args.conf_file, &args.dirs, &config)?;
    apply_flags(&args, &global, &mut build);

    debug!(
        template = %build.template_root.display(),
        target = %build.target_root.display(),
        overwrite = build.allow_overwrite,
        outside = build.allow_outside_write,
        dry_run = build.dry_run,
        "Build configured"
    );

    let service = BuildService::new(Box::new(LocalFilesystem::new()));
    let report = service.build(&mut build, &mut NoHooks)?;

    output.report(&report)
}

/// Flags only ever switch a behavior on.
fn apply_flags(args: &RebuildArgs, global: &GlobalArgs, build: &mut BuildConfig) {
    if args.overwrite {
        build.allow_overwrite = true;
    }
    if args.write_outside {
        build.allow_outside_write = true;
    }
    if args.dry_run {
        build.dry_run = true;
    }
    if global.quiet {
        build.quiet = true;
    }
}
