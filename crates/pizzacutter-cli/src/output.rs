//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use pizzacutter_core::domain::BuildReport;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::CliResult;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Auto: Human on a TTY, Plain when piped.
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON on stdout. Printed even in quiet mode: it was asked for.
    pub fn json<T: Serialize>(&self, value: &T) -> CliResult<()> {
        let rendered = serde_json::to_string_pretty(value)?;
        self.term.write_line(&rendered)?;
        Ok(())
    }

    /// Summary of a finished build, or the report itself as JSON.
    pub fn report(&self, report: &BuildReport) -> CliResult<()> {
        if self.resolved_format == OutputFormat::Json {
            return self.json(report);
        }

        let verb = if report.dry_run { "Dry run of" } else { "Built" };
        self.success(&format!(
            "{verb} {} from {}",
            report.target_root.display(),
            report.template_root.display()
        ))?;
        for line in summary_lines(report) {
            self.print(&format!("  {line}"))?;
        }
        for record in &report.audit {
            self.warning(&format!("{}: {}", record.path.display(), record.finding))?;
        }
        if report.dry_run {
            self.info("Dry run: nothing was written")?;
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

/// Counter lines for the human summary.
pub fn summary_lines(report: &BuildReport) -> Vec<String> {
    let skipped = &report.skipped;
    vec![
        format!("objects:     {}", report.objects),
        format!(
            "created:     {} files, {} directories",
            report.files_created, report.directories_created
        ),
        format!("overwritten: {} files", report.files_overwritten),
        format!("rewritten:   {} files", report.files_rewritten),
        format!(
            "skipped:     {} (no-copy {}, outside {}, no-overwrite {}, existing {})",
            skipped.total(),
            skipped.no_copy,
            skipped.outside_target,
            skipped.no_overwrite,
            skipped.existing_target
        ),
        format!("unfilled:    {}", report.audit.len()),
    ]
}

// ── tests ─────────────────────────────────────────────────────────────────────
