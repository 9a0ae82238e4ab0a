//! `portico init`: create a default configuration file.

use std::path::PathBuf;

use crate::{
    cli::InitArgs,
    config::{AppConfig, LOCAL_CONFIG},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Create a default Portico configuration file.
pub fn execute(args: InitArgs, output: &OutputManager) -> CliResult<()> {
    output.info("Initialising configuration...")?;

    let config_path = target_path(&args)?;

    // Bail early if the file already exists and --force was not given.
    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    let toml = default_toml()?;

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| CliError::IoError {
                message: format!("Failed to create config directory '{}'", parent.display()),
                source: e,
            })?;
        }
    }

    std::fs::write(&config_path, &toml).map_err(|e| CliError::IoError {
        message: format!("Failed to write config to '{}'", config_path.display()),
        source: e,
    })?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;
    output.info("Set project.remote to your workspace module path before running create")?;

    Ok(())
}

fn target_path(args: &InitArgs) -> CliResult<PathBuf> {
    if args.local {
        return Ok(PathBuf::from(LOCAL_CONFIG));
    }
    AppConfig::global_path().ok_or_else(|| CliError::ConfigError {
        message: "No home directory found; use --local instead".into(),
        source: None,
    })
}

fn default_toml() -> CliResult<String> {
    toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise default config: {e}"),
        source: Some(Box::new(e)),
    })
}
