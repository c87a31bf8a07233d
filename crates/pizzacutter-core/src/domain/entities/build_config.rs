use std::path::{Path, PathBuf};

use crate::domain::{
    entities::{build_report::BuildReport, pattern_store::RawPatterns},
    value_objects::{OptionMarkers, PatternValue, Token, default_audit_prefixes},
};

/// Everything one build needs, fully resolved by the caller.
///
/// Roots are expected to be absolute; the build service validates this
/// before touching the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub template_root: PathBuf,
    pub target_root: PathBuf,
    pub allow_overwrite: bool,
    pub allow_outside_write: bool,
    pub dry_run: bool,
    pub quiet: bool,
    pub patterns: RawPatterns,
    pub options: OptionMarkers,
    pub audit_prefixes: Vec<String>,
}

impl BuildConfig {
    /// Defaults: no overwrite, no outside writes, default patterns, markers
    /// and audit prefixes.
    pub fn new(template_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            template_root: template_root.into(),
            target_root: target_root.into(),
            allow_overwrite: false,
            allow_outside_write: false,
            dry_run: false,
            quiet: false,
            patterns: RawPatterns::with_defaults(),
            options: OptionMarkers::default(),
            audit_prefixes: default_audit_prefixes(),
        }
    }

    pub fn allow_overwrite(mut self, allow: bool) -> Self {
        self.allow_overwrite = allow;
        self
    }

    pub fn allow_outside_write(mut self, allow: bool) -> Self {
        self.allow_outside_write = allow;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_text(mut self, token: impl Into<Token>, text: impl Into<String>) -> Self {
        self.patterns.insert(token, PatternValue::text(text));
        self
    }

    pub fn with_path(mut self, token: impl Into<Token>, path: impl AsRef<Path>) -> Self {
        self.patterns
            .insert(token, PatternValue::path(path.as_ref()));
        self
    }

    pub fn with_options(mut self, options: OptionMarkers) -> Self {
        self.options = options;
        self
    }

    pub fn with_audit_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audit_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

/// Lifecycle callbacks around a build.
///
/// `before_build` runs before patterns are resolved and may still change the
/// configuration; `after_build` runs once auditing is done.
#[cfg_attr(test, mockall::automock)]
pub trait BuildHooks {
    fn before_build(&mut self, _config: &mut BuildConfig) {}

    fn after_build(&mut self, _config: &mut BuildConfig, _report: &BuildReport) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl BuildHooks for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TRUE_TOKEN;

    #[test]
    fn new_config_carries_defaults() {
        let config = BuildConfig::new("/tpl", "/out");
        assert!(!config.allow_overwrite);
        assert!(!config.dry_run);
        assert!(config.patterns.contains(TRUE_TOKEN));
        assert_eq!(config.audit_prefixes, default_audit_prefixes());
    }

    #[test]
    fn builder_methods_set_fields() {
        let config = BuildConfig::new("/tpl", "/out")
            .allow_overwrite(true)
            .allow_outside_write(true)
            .dry_run(true)
            .quiet(true)
            .with_text("{{a}}", "1")
            .with_path("{{b}}", "/abs")
            .with_audit_prefixes(["{{X"]);

        assert!(config.allow_overwrite && config.allow_outside_write);
        assert!(config.dry_run && config.quiet);
        assert_eq!(config.patterns.len(), 3);
        assert_eq!(config.audit_prefixes, vec!["{{X".to_string()]);
    }
}
