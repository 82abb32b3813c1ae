//! `devforge config`: read and write configuration values.

use crate::{
    cli::ConfigCommands,
    commands::Context,
    config::{self, KNOWN_KEYS},
    error::{CliError, CliResult},
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, ctx: &Context) -> CliResult<()> {
    let out = &ctx.output;

    match cmd {
        ConfigCommands::Get { key } => {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                return Err(CliError::InvalidInput {
                    message: format!(
                        "unknown config key '{key}', expected one of: {}",
                        KNOWN_KEYS.join(", ")
                    ),
                });
            }
            // Unset optional keys print nothing.
            if let Some(value) = ctx.config.get(&key) {
                out.data(&value)?;
            }
        }

        ConfigCommands::Set { key, value } => {
            let path = ctx.sources.active_file().ok_or_else(|| CliError::ConfigError {
                message: "no configuration directory on this platform; pass --config".into(),
                source: None,
            })?;
            config::set_value(&path, &key, &value).map_err(CliError::config)?;
            out.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if out.is_json() {
                out.json(&ctx.config)?;
            } else {
                let serialised = ctx.config.to_toml().map_err(CliError::config)?;
                out.data(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => match ctx.sources.active_file() {
            Some(path) => out.data(&path.display().to_string())?,
            None => out.warning("no configuration directory on this platform")?,
        },
    }

    Ok(())
}
