//! TOML configuration loader.
//!
//! Reads a PizzaCutter conf file and turns it into a [`BuildConfig`] with
//! absolute, canonical roots.
//!
//! # Conf file format
//!
//! ```toml
//! [settings]                  # all optional
//! allow_overwrite     = false
//! allow_outside_write = false
//! dry_run             = false
//! quiet               = false
//! template_dir        = "."   # relative to the conf file's directory
//! target_dir          = "out" # relative to the conf file's directory
//!
//! [options]                   # all optional
//! delete_line_if_empty = "{{PizzaCutter.option.delete_line_if_empty}}"
//! object_no_copy       = "{{PizzaCutter.option.no_copy}}"
//! object_no_overwrite  = "{{PizzaCutter.option.no_overwrite}}"
//!
//! audit_prefixes = ["{{PizzaCutter", "{{cookiecutter"]
//!
//! [patterns]
//! "{{PizzaCutter.project_dir}}" = "my_project"
//! "{{PizzaCutter.docs}}"        = { path = "docs/api" }
//! "{{PizzaCutter.shared}}"      = { path = "../shared", anchor = "config_dir" }
//! ```
//!
//! Path anchors: `none` (the fragment as written), `config_dir`,
//! `template_dir` or `target_dir` (the fragment joined onto that directory).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use pizzacutter_core::{
    application::ApplicationError,
    domain::{BuildConfig, OptionMarkers, OptionRole, PatternValue, normalize_lexically},
    error::CutterResult,
};

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a conf file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfFile {
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub options: OptionsSection,
    pub audit_prefixes: Option<Vec<String>>,
    /// Kept as a raw table so file order survives; entries are decoded one
    /// by one into [`PatternEntry`].
    #[serde(default)]
    pub patterns: toml::Table,
}

/// `[settings]` section.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    pub allow_overwrite: Option<bool>,
    pub allow_outside_write: Option<bool>,
    pub dry_run: Option<bool>,
    pub quiet: Option<bool>,
    pub template_dir: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,
}

/// `[options]` section: marker overrides.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct OptionsSection {
    pub delete_line_if_empty: Option<String>,
    pub object_no_copy: Option<String>,
    pub object_no_overwrite: Option<String>,
}

impl OptionsSection {
    fn apply(self, mut markers: OptionMarkers) -> OptionMarkers {
        for (role, marker) in [
            (OptionRole::DeleteLineIfEmpty, self.delete_line_if_empty),
            (OptionRole::ObjectNoCopy, self.object_no_copy),
            (OptionRole::ObjectNoOverwrite, self.object_no_overwrite),
        ] {
            if let Some(marker) = marker {
                markers = markers.with_marker(role, marker);
            }
        }
        markers
    }
}

/// One value under `[patterns]`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PatternEntry {
    Text(String),
    Path {
        path: PathBuf,
        #[serde(default)]
        anchor: PathAnchor,
    },
}

/// What a relative path pattern is joined onto.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PathAnchor {
    #[default]
    None,
    ConfigDir,
    TemplateDir,
    TargetDir,
}

#[derive(Debug, Error)]
enum ConfError {
    #[error("cannot read file: {0}")]
    Read(#[from] io::Error),

    #[error("{0}")]
    Parse(#[from] toml::de::Error),

    #[error("pattern \"{token}\" must be a string or a table with a `path` key: {reason}")]
    Pattern { token: String, reason: String },
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads a conf file into a [`BuildConfig`].
///
/// # Example
///
/// ```no_run
/// use pizzacutter_adapters::config_loader::ConfigLoader;
///
/// let config = ConfigLoader::new("./template/pizzacutter.toml")
///     .template_dir(None)
///     .target_dir(Some("./my_project".into()))
///     .load()?;
/// println!("target: {}", config.target_root.display());
/// # Ok::<(), pizzacutter_core::error::CutterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    conf_file: PathBuf,
    template_dir: Option<PathBuf>,
    target_dir: Option<PathBuf>,
    cwd: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(conf_file: impl Into<PathBuf>) -> Self {
        Self {
            conf_file: conf_file.into(),
            template_dir: None,
            target_dir: None,
            cwd: None,
        }
    }

    /// Template directory override (relative paths resolve against the
    /// working directory). Wins over `settings.template_dir`.
    pub fn template_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.template_dir = dir;
        self
    }

    /// Target directory override (relative paths resolve against the
    /// working directory). Wins over `settings.target_dir`.
    pub fn target_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.target_dir = dir;
        self
    }

    /// Working directory used for relative overrides and as the default
    /// target. Defaults to the process working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Parse the conf file without resolving any directory.
    pub fn read(&self) -> CutterResult<ConfFile> {
        if !self.conf_file.is_file() {
            return Err(ApplicationError::ConfigurationNotFound {
                path: self.conf_file.clone(),
            }
            .into());
        }
        read_conf(&self.conf_file).map_err(|e| self.invalid(e))
    }

    /// Load and resolve everything into a ready-to-build configuration.
    #[instrument(skip(self), fields(conf = %self.conf_file.display()))]
    pub fn load(&self) -> CutterResult<BuildConfig> {
        let conf = self.read()?;
        let cwd = self.working_dir()?;

        let conf_file = canonicalize(&self.conf_file)?;
        let config_dir = conf_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        let template_root = match (&self.template_dir, &conf.settings.template_dir) {
            (Some(dir), _) => cwd.join(dir),
            (None, Some(dir)) => config_dir.join(dir),
            (None, None) => config_dir.clone(),
        };
        if !template_root.is_dir() {
            return Err(ApplicationError::TemplateDirNotFound {
                path: template_root,
            }
            .into());
        }
        let template_root = canonicalize(&template_root)?;

        let target_root = match (&self.target_dir, &conf.settings.target_dir) {
            (Some(dir), _) => cwd.join(dir),
            (None, Some(dir)) => config_dir.join(dir),
            (None, None) => cwd.clone(),
        };
        let target_root = canonicalize_lenient(&target_root);

        debug!(
            template = %template_root.display(),
            target = %target_root.display(),
            "Roots resolved"
        );

        let settings = &conf.settings;
        let mut config = BuildConfig::new(template_root, target_root)
            .allow_overwrite(settings.allow_overwrite.unwrap_or(false))
            .allow_outside_write(settings.allow_outside_write.unwrap_or(false))
            .dry_run(settings.dry_run.unwrap_or(false))
            .quiet(settings.quiet.unwrap_or(false));

        config.options = conf.options.clone().apply(config.options);
        if let Some(prefixes) = &conf.audit_prefixes {
            config.audit_prefixes = prefixes.clone();
        }

        for (token, value) in &conf.patterns {
            let entry = value.clone().try_into::<PatternEntry>().map_err(|e| {
                self.invalid(ConfError::Pattern {
                    token: token.clone(),
                    reason: e.to_string(),
                })
            })?;
            let value = match entry {
                PatternEntry::Text(text) => PatternValue::Text(text),
                PatternEntry::Path { path, anchor } => {
                    PatternValue::Path(anchored(&path, anchor, &config_dir, &config))
                }
            };
            config.patterns.insert(token.as_str(), value);
        }

        debug!(patterns = config.patterns.len(), "Configuration loaded");
        Ok(config)
    }

    fn working_dir(&self) -> CutterResult<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().map_err(|e| {
                ApplicationError::FilesystemError {
                    path: PathBuf::from("."),
                    reason: format!("Failed to read working directory: {e}"),
                }
                .into()
            }),
        }
    }

    fn invalid(&self, e: ConfError) -> pizzacutter_core::error::CutterError {
        ApplicationError::ConfigurationInvalid {
            path: self.conf_file.clone(),
            reason: e.to_string(),
        }
        .into()
    }
}

fn read_conf(path: &Path) -> Result<ConfFile, ConfError> {
    let raw = fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

fn anchored(path: &Path, anchor: PathAnchor, config_dir: &Path, config: &BuildConfig) -> PathBuf {
    let base = match anchor {
        PathAnchor::None => return path.to_path_buf(),
        PathAnchor::ConfigDir => config_dir,
        PathAnchor::TemplateDir => &config.template_root,
        PathAnchor::TargetDir => &config.target_root,
    };
    normalize_lexically(&base.join(path))
}

fn canonicalize(path: &Path) -> CutterResult<PathBuf> {
    fs::canonicalize(path).map_err(|e| {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: format!("Failed to resolve path: {e}"),
        }
        .into()
    })
}

/// Canonicalize the longest existing ancestor and append the rest, so a
/// target that does not exist yet still gets a stable absolute path.
fn canonicalize_lenient(path: &Path) -> PathBuf {
    let path = normalize_lexically(path);
    let mut existing = path.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return rest
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => return path,
        }
    }
}
