//! `devforge template`: list, add and remove registry templates.

use tracing::instrument;

use devforge_core::application::ports::TemplateSummary;

use crate::{
    cli::{ListFormat, TemplateCommands},
    commands::Context,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(cmd: TemplateCommands, ctx: &Context) -> CliResult<()> {
    ctx.prepare_registry()?;
    let service = ctx.templates();
    let out = &ctx.output;

    match cmd {
        TemplateCommands::List { format } => {
            let templates = service.list()?;
            // `--output-format json` also selects JSON.
            let format = if out.is_json() { ListFormat::Json } else { format };
            print_list(&templates, format, ctx, out)?;
        }

        TemplateCommands::Add { name, path } => {
            let dest = service.add(&name, &path)?;
            out.success(&format!("Added template '{name}' at {}", dest.display()))?;
        }

        TemplateCommands::Remove { name } => {
            service.remove(&name)?;
            out.success(&format!("Removed template '{name}'"))?;
        }
    }

    Ok(())
}

fn print_list(
    templates: &[TemplateSummary],
    format: ListFormat,
    ctx: &Context,
    out: &OutputManager,
) -> CliResult<()> {
    match format {
        ListFormat::Json => out.json(templates)?,

        ListFormat::List => {
            for t in templates {
                out.data(&t.name)?;
            }
        }

        ListFormat::Table => {
            if templates.is_empty() {
                out.info(&format!(
                    "No templates in {}. Add one with 'devforge template add <name> <dir>'.",
                    ctx.templates_dir().display()
                ))?;
                return Ok(());
            }
            out.header("Available Templates:")?;
            for line in table_rows(templates) {
                out.print(&line)?;
            }
        }
    }
    Ok(())
}

/// Name column padded to the longest name.
fn table_rows(templates: &[TemplateSummary]) -> Vec<String> {
    let width = templates.iter().map(|t| t.name.len()).max().unwrap_or(0);
    templates
        .iter()
        .map(|t| match &t.description {
            Some(description) => format!("  {:width$}  {description}", t.name),
            None => format!("  {}", t.name),
        })
        .collect()
}
