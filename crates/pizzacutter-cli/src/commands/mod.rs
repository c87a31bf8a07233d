//! Command handlers. Each translates arguments into core calls and renders
//! the result; no business logic lives here.

use pizzacutter_adapters::ConfigLoader;
use pizzacutter_core::domain::BuildConfig;

use crate::{
    cli::DirArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
};

pub mod completions;
pub mod info;
pub mod rebuild;

/// Read the conf file and layer the user preferences on top.
fn load_build_config(
    conf_file: &std::path::Path,
    dirs: &DirArgs,
    config: &AppConfig,
) -> CliResult<BuildConfig> {
    if conf_file.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!(
                "{} is a directory, expected a PizzaCutter conf file",
                conf_file.display()
            ),
        });
    }
    let mut build = ConfigLoader::new(conf_file)
        .template_dir(dirs.template_dir.clone())
        .target_dir(dirs.project_dir.clone())
        .load()
        .with_cli_context(|| format!("loading {}", conf_file.display()))?;
    config.build.apply(&mut build);
    Ok(build)
}
