//! User preferences.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  It is
//! not the template conf file: that one describes a template and is read by
//! `pizzacutter_adapters::ConfigLoader`.  Preferences only supply defaults
//! for the build switches.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `PIZZACUTTER_BUILD__ALLOW_OVERWRITE=true` etc.
//! 3. Preferences file (`--config`, or the platform config directory)
//! 4. The template conf file's `[settings]`
//! 5. `false`

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use pizzacutter_core::domain::BuildConfig;

const ENV_PREFIX: &str = "PIZZACUTTER";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for the build switches.
    pub build: BuildPreferences,
    /// Output settings.
    pub output: OutputConfig,
}

/// Build switches; `None` leaves the conf file's value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildPreferences {
    pub allow_overwrite: Option<bool>,
    pub allow_outside_write: Option<bool>,
    pub dry_run: Option<bool>,
    pub quiet: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl BuildPreferences {
    /// Override the values loaded from the conf file.
    pub fn apply(&self, config: &mut BuildConfig) {
        if let Some(v) = self.allow_overwrite {
            config.allow_overwrite = v;
        }
        if let Some(v) = self.allow_outside_write {
            config.allow_outside_write = v;
        }
        if let Some(v) = self.dry_run {
            config.dry_run = v;
        }
        if let Some(v) = self.quiet {
            config.quiet = v;
        }
    }
}

impl AppConfig {
    /// Load preferences from file and environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = config_file.cloned().unwrap_or_else(Self::config_path);
        Self::load_from(&path, config_file.is_some())
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("reading preferences from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid preferences in {}", path.display()))
    }

    /// Path to the default preferences file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.pizzacutter.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "pizzacutter", "pizzacutter")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".pizzacutter.toml"))
    }
}
