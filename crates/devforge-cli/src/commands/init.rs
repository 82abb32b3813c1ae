//! `devforge init`: write a default configuration file.

use std::path::PathBuf;

use crate::{
    cli::InitArgs,
    commands::Context,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliError, CliResult},
};

/// Write the default configuration to `.devforge.toml`, or the global file
/// with `--global`, and install bundled templates missing from the registry.
pub fn execute(args: InitArgs, ctx: &Context) -> CliResult<()> {
    let out = &ctx.output;

    let config_path = if args.global {
        AppConfig::global_path().ok_or_else(|| CliError::ConfigError {
            message: "no configuration directory on this platform".into(),
            source: None,
        })?
    } else {
        PathBuf::from(LOCAL_CONFIG_FILE)
    };

    if config_path.exists() && !args.force {
        return Err(CliError::ConfigExists { path: config_path });
    }

    AppConfig::default()
        .save(&config_path)
        .map_err(CliError::config)?;

    out.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;
    for name in ctx.install_bundled()? {
        out.print(&format!("Installed template '{name}'"))?;
    }
    out.print(&format!(
        "Templates are read from {}",
        ctx.templates_dir().display()
    ))?;

    Ok(())
}
