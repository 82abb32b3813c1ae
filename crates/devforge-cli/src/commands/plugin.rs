//! `devforge plugin list`: the built-in hooks and whether each is enabled.

use serde::Serialize;

use devforge_adapters::{BUILTIN_HOOKS, HookStage};

use crate::{cli::PluginCommands, commands::Context, error::CliResult};

#[derive(Debug, Serialize, PartialEq, Eq)]
struct PluginRow {
    name: &'static str,
    stage: HookStage,
    description: &'static str,
    enabled: bool,
}

pub fn execute(cmd: PluginCommands, ctx: &Context) -> CliResult<()> {
    match cmd {
        PluginCommands::List => list(ctx),
    }
}

fn list(ctx: &Context) -> CliResult<()> {
    let rows = rows(&ctx.config.plugins.enabled);
    let out = &ctx.output;

    if out.is_json() {
        out.json(&rows)?;
        return Ok(());
    }

    out.header("Plugins:")?;
    for row in &rows {
        let mark = if row.enabled { "enabled" } else { "disabled" };
        out.print(&format!(
            "  {:<14} {:<12} {:<9} {}",
            row.name,
            row.stage.to_string(),
            mark,
            row.description
        ))?;
    }

    let unknown: Vec<&str> = ctx
        .config
        .plugins
        .enabled
        .iter()
        .map(String::as_str)
        .filter(|name| !BUILTIN_HOOKS.iter().any(|h| h.name == *name))
        .collect();
    if !unknown.is_empty() {
        out.warning(&format!(
            "plugins.enabled names unknown plugins: {}",
            unknown.join(", ")
        ))?;
    }
    Ok(())
}

fn rows(enabled: &[String]) -> Vec<PluginRow> {
    BUILTIN_HOOKS
        .iter()
        .map(|hook| PluginRow {
            name: hook.name,
            stage: hook.stage,
            description: hook.description,
            enabled: enabled.iter().any(|e| e == hook.name),
        })
        .collect()
}
