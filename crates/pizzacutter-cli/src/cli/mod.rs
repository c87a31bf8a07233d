//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "pizzacutter",
    bin_name = "pizzacutter",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Create and update projects from directory templates",
    long_about = "PizzaCutter copies a template directory into a project \
                  directory, replacing placeholder patterns in paths and file \
                  contents. Re-running it updates an existing project.",
    after_help = "EXAMPLES:\n\
        \x20 pizzacutter rebuild ./template/pizzacutter.toml\n\
        \x20 pizzacutter rebuild ./template/pizzacutter.toml -p ./my_project --overwrite\n\
        \x20 pizzacutter info ./template/pizzacutter.toml\n\
        \x20 pizzacutter completions bash > /usr/share/bash-completion/completions/pizzacutter",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build or update a project from a template.
    #[command(
        visible_alias = "build",
        about = "Build or update a project from a template",
        after_help = "EXAMPLES:\n\
            \x20 pizzacutter rebuild pizzacutter.toml\n\
            \x20 pizzacutter rebuild pizzacutter.toml --dry-run\n\
            \x20 pizzacutter rebuild pizzacutter.toml -t ./template -p ./out -o -w"
    )]
    Rebuild(RebuildArgs),

    /// Show what a conf file resolves to, without building.
    #[command(
        about = "Show resolved roots, settings and patterns",
        after_help = "EXAMPLES:\n\
            \x20 pizzacutter info pizzacutter.toml\n\
            \x20 pizzacutter info pizzacutter.toml --output-format json"
    )]
    Info(InfoArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 pizzacutter completions bash > ~/.local/share/bash-completion/completions/pizzacutter\n\
            \x20 pizzacutter completions zsh  > ~/.zfunc/_pizzacutter\n\
            \x20 pizzacutter completions fish > ~/.config/fish/completions/pizzacutter.fish"
    )]
    Completions(CompletionsArgs),
}

// ── rebuild ───────────────────────────────────────────────────────────────────

/// Arguments for `pizzacutter rebuild`.
#[derive(Debug, Args)]
pub struct RebuildArgs {
    /// PizzaCutter conf file.
    #[arg(value_name = "CONF_FILE", help = "PizzaCutter conf file (TOML)")]
    pub conf_file: PathBuf,

    #[command(flatten)]
    pub dirs: DirArgs,

    /// Report what would happen without writing anything.
    #[arg(
        short = 'd',
        long = "dry-run",
        help = "Show what would be written without writing"
    )]
    pub dry_run: bool,

    /// Overwrite files that already exist in the project.
    #[arg(short = 'o', long = "overwrite", help = "Overwrite existing files")]
    pub overwrite: bool,

    /// Allow writing outside the project directory.
    #[arg(
        short = 'w',
        long = "write-outside",
        help = "Allow writes outside the project directory"
    )]
    pub write_outside: bool,
}

// ── info ──────────────────────────────────────────────────────────────────────

/// Arguments for `pizzacutter info`.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// PizzaCutter conf file.
    #[arg(value_name = "CONF_FILE", help = "PizzaCutter conf file (TOML)")]
    pub conf_file: PathBuf,

    #[command(flatten)]
    pub dirs: DirArgs,
}

/// Directory overrides shared by `rebuild` and `info`.
#[derive(Debug, Args)]
pub struct DirArgs {
    /// Template directory; defaults to the conf file's directory.
    #[arg(
        short = 't',
        long = "template-dir",
        value_name = "DIR",
        help = "Template directory (default: conf file directory)"
    )]
    pub template_dir: Option<PathBuf>,

    /// Project directory; defaults to the current directory.
    #[arg(
        short = 'p',
        long = "project-dir",
        value_name = "DIR",
        help = "Project directory (default: current directory)"
    )]
    pub project_dir: Option<PathBuf>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `pizzacutter completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
