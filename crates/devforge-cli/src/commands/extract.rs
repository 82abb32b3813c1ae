//! `devforge extract`: turn an existing project into a registry template.

use std::path::PathBuf;

use tracing::{debug, instrument};

use devforge_adapters::IgnoreRules;
use devforge_core::application::{DEFAULT_PLACEHOLDER, ExtractOptions};

use crate::{cli::ExtractArgs, commands::Context, error::CliResult};

#[instrument(skip_all)]
pub fn execute(args: ExtractArgs, ctx: &Context) -> CliResult<()> {
    let source = args.source.clone().unwrap_or_else(|| PathBuf::from("."));
    ctx.prepare_registry()?;
    let fs = ctx.fs();
    let rules = IgnoreRules::load(fs.as_ref(), &source)?;
    debug!(patterns = rules.pattern_count(), "ignore rules ready");

    let report = ctx
        .extractor()
        .extract(&source, &options(args), &rules)?;

    let out = &ctx.output;
    if out.is_json() {
        out.json(&report)?;
        return Ok(());
    }

    out.success(&format!(
        "Extracted template '{}' to {}",
        report.name,
        report.path.display()
    ))?;
    out.kv("copied", &report.copied.len().to_string())?;
    out.kv("templatized", &report.templatized.len().to_string())?;
    for file in &report.templatized {
        out.print(&format!("    {file}.hbs"))?;
    }
    out.print("")?;
    out.print(&format!("Use it with: devforge create <name> --template {}", report.name))?;
    Ok(())
}

fn options(args: ExtractArgs) -> ExtractOptions {
    ExtractOptions {
        name: args.name,
        description: args.description,
        templatize: args.templatize,
        placeholder: args
            .placeholder
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
    }
}
