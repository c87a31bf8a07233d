//! `pizzacutter info` - show what a conf file resolves to.

use std::path::Path;

use serde::Serialize;

use pizzacutter_core::{
    domain::{BuildConfig, PatternValue, ResolvedPatterns, resolve},
    error::CutterError,
};

use crate::{
    cli::{InfoArgs, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct InfoView<'a> {
    conf_file: &'a Path,
    template_root: &'a Path,
    target_root: &'a Path,
    allow_overwrite: bool,
    allow_outside_write: bool,
    dry_run: bool,
    quiet: bool,
    options: Vec<OptionView<'a>>,
    audit_prefixes: &'a [String],
    patterns: Vec<PatternView<'a>>,
}

#[derive(Debug, Serialize)]
struct OptionView<'a> {
    role: &'static str,
    marker: &'a str,
}

#[derive(Debug, Serialize)]
struct PatternView<'a> {
    token: &'a str,
    kind: &'static str,
    value: String,
}

pub fn execute(args: InfoArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let build = super::load_build_config(&args.conf_file, &args.dirs, &config)?;
    let patterns = resolve(&build.patterns).map_err(CutterError::from)?;
    let view = view(&args.conf_file, &build, &patterns);

    if output.format() == OutputFormat::Json {
        return output.json(&view);
    }

    output.header("Roots")?;
    output.print(&format!("  conf file: {}", view.conf_file.display()))?;
    output.print(&format!("  template:  {}", view.template_root.display()))?;
    output.print(&format!("  target:    {}", view.target_root.display()))?;

    output.header("Settings")?;
    for (name, value) in [
        ("allow_overwrite", view.allow_overwrite),
        ("allow_outside_write", view.allow_outside_write),
        ("dry_run", view.dry_run),
        ("quiet", view.quiet),
    ] {
        output.print(&format!("  {name} = {value}"))?;
    }

    output.header("Options")?;
    for option in &view.options {
        output.print(&format!("  {} = {}", option.role, option.marker))?;
    }

    output.header("Patterns (resolved)")?;
    for pattern in &view.patterns {
        output.print(&format!(
            "  {} = {} ({})",
            pattern.token, pattern.value, pattern.kind
        ))?;
    }
    Ok(())
}

fn view<'a>(
    conf_file: &'a Path,
    build: &'a BuildConfig,
    patterns: &'a ResolvedPatterns,
) -> InfoView<'a> {
    InfoView {
        conf_file,
        template_root: &build.template_root,
        target_root: &build.target_root,
        allow_overwrite: build.allow_overwrite,
        allow_outside_write: build.allow_outside_write,
        dry_run: build.dry_run,
        quiet: build.quiet,
        options: build
            .options
            .iter()
            .map(|(role, marker)| OptionView {
                role: role.as_str(),
                marker,
            })
            .collect(),
        audit_prefixes: &build.audit_prefixes,
        patterns: patterns
            .iter()
            .map(|(token, value)| PatternView {
                token: token.as_str(),
                kind: match value {
                    PatternValue::Text(_) => "text",
                    PatternValue::Path(_) => "path",
                },
                value: value.to_content_string(),
            })
            .collect(),
    }
}
