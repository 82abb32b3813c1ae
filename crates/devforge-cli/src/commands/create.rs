//! Implementation of the `devforge create` command.
//!
//! Responsibility: turn CLI arguments into a render configuration, call the
//! renderer, and display results.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use devforge_core::{
    application::{RenderReport, VariableResolver},
    domain::{RenderConfig, keys, validate_project_name},
    error::ForgeError,
};

use crate::{
    cli::CreateArgs,
    commands::Context,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Execute `devforge create`.
///
/// 1. Validate the project name (nothing touches the disk before this)
/// 2. Resolve variables from defaults, config, flags and `--set`
/// 3. Render (or preview with `--dry-run`)
/// 4. Print next steps
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(args: CreateArgs, ctx: &Context) -> CliResult<()> {
    validate_project_name(&args.name).map_err(ForgeError::from)?;

    let template = args
        .template
        .clone()
        .unwrap_or_else(|| ctx.config.defaults.template.clone());
    let variables = resolve_variables(&args, &ctx.config)?;

    let cwd = std::env::current_dir().with_cli_context(|| "reading the current directory")?;
    let project_path = project_path(args.output.as_deref(), &cwd, &args.name);
    debug!(template = %template, path = %project_path.display(), "create resolved");

    ctx.prepare_registry()?;
    let renderer = ctx.renderer()?;
    let out = &ctx.output;

    let spinner = out.spinner(&format!("Rendering '{template}'..."));
    let result = if args.dry_run {
        renderer.preview(&template, &project_path, variables)
    } else {
        renderer.render(&template, &project_path, variables)
    };
    spinner.finish_and_clear();
    let report = result?;

    info!(
        project = %args.name,
        files = report.file_count(),
        dry_run = report.dry_run,
        "create finished"
    );

    if out.is_json() {
        out.json(&report)?;
        return Ok(());
    }

    if report.dry_run {
        print_preview(&report, out)?;
        return Ok(());
    }

    out.success(&format!(
        "Created '{}' from '{}' ({} files)",
        args.name,
        report.template,
        report.file_count()
    ))?;
    out.print("")?;
    out.print("Next steps:")?;
    for step in next_steps(&args.name, args.no_git, args.no_install) {
        out.print(&format!("  {step}"))?;
    }
    Ok(())
}

/// Build the render configuration.
///
/// Boolean flags are only recorded when given, so configured values and
/// `--set` can still decide them.
fn resolve_variables(args: &CreateArgs, config: &AppConfig) -> Result<RenderConfig, ForgeError> {
    let mut resolver = VariableResolver::new(args.name.as_str())
        .configured_default(keys::AUTHOR, config.defaults.author.as_deref())
        .configured_default(keys::LICENSE, config.defaults.license.as_deref())
        .configured_default(keys::DESCRIPTION, config.defaults.description.as_deref())
        .explicit_opt(keys::DESCRIPTION, args.description.clone())
        .explicit_opt(keys::AUTHOR, args.author.clone())
        .explicit_opt(keys::LICENSE, args.license.clone())
        .explicit_opt(keys::TYPESCRIPT, args.typescript.then_some(true))
        .explicit_opt(keys::TESTING, args.testing.then_some(true))
        .explicit_opt(keys::CI, args.ci.then_some(true));

    for assignment in &args.set {
        resolver = resolver.assign(assignment)?;
    }
    Ok(resolver.resolve())
}

/// `<output or cwd>/<name>`; a relative `--output` is taken from `cwd`.
fn project_path(output: Option<&Path>, cwd: &Path, name: &str) -> PathBuf {
    match output {
        Some(dir) => cwd.join(dir).join(name),
        None => cwd.join(name),
    }
}

/// Commands the user may want to run next; never run by DevForge.
fn next_steps(name: &str, no_git: bool, no_install: bool) -> Vec<String> {
    let mut steps = vec![format!("cd {name}")];
    if !no_git {
        steps.push("git init && git add -A && git commit -m \"Initial commit from DevForge\"".into());
    }
    if !no_install {
        steps.push("npm install".into());
    }
    steps.push("npm run dev".into());
    steps
}

fn print_preview(report: &RenderReport, out: &OutputManager) -> CliResult<()> {
    out.info(&format!(
        "Dry run: would create {} files in {}",
        report.file_count(),
        report.output_root.display()
    ))?;
    for dir in &report.directories {
        out.print(&format!("  {dir}/"))?;
    }
    for file in report.files() {
        out.print(&format!("  {file}"))?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn create_args(argv: &[&str]) -> CreateArgs {
        let mut full = vec!["devforge", "create"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Create(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn project_path_defaults_to_cwd() {
        assert_eq!(
            project_path(None, Path::new("/work"), "demo"),
            PathBuf::from("/work/demo")
        );
    }

    #[test]
    fn project_path_under_output() {
        assert_eq!(
            project_path(Some(Path::new("apps")), Path::new("/work"), "demo"),
            PathBuf::from("/work/apps/demo")
        );
        assert_eq!(
            project_path(Some(Path::new("/srv")), Path::new("/work"), "demo"),
            PathBuf::from("/srv/demo")
        );
    }

    #[test]
    fn variables_layer_config_flags_and_sets() {
        let mut config = AppConfig::default();
        config.defaults.author = Some("Configured".into());
        config.defaults.license = Some("ISC".into());
        let args = create_args(&[
            "demo",
            "--license",
            "Apache-2.0",
            "--testing",
            "--set",
            "port=8080",
            "--set",
            "testing=false",
        ]);

        let vars = resolve_variables(&args, &config).unwrap();

        assert_eq!(vars.get_str("projectName"), Some("demo"));
        assert_eq!(vars.get_str("author"), Some("Configured"));
        assert_eq!(vars.get_str("license"), Some("Apache-2.0"));
        assert_eq!(vars.get_str("description"), Some("A new DevForge project"));
        assert_eq!(vars.get("port"), Some(&serde_json::json!(8080)));
        assert!(!vars.is_truthy("testing"));
        assert!(!vars.is_truthy("typescript"));
    }

    #[test]
    fn set_cannot_rename_the_project() {
        let args = create_args(&["demo", "--set", "projectName=other"]);
        let vars = resolve_variables(&args, &AppConfig::default()).unwrap();
        assert_eq!(vars.get_str("projectName"), Some("demo"));
    }

    #[test]
    fn malformed_set_is_rejected() {
        let args = create_args(&["demo", "--set", "novalue"]);
        assert!(resolve_variables(&args, &AppConfig::default()).is_err());
    }

    #[test]
    fn next_steps_respect_skips() {
        let all = next_steps("demo", false, false);
        assert_eq!(all.first().map(String::as_str), Some("cd demo"));
        assert!(all.iter().any(|s| s.starts_with("git init")));
        assert!(all.iter().any(|s| s == "npm install"));

        let bare = next_steps("demo", true, true);
        assert_eq!(bare, vec!["cd demo", "npm run dev"]);
    }
}
