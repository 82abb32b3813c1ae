//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "devforge",
    bin_name = "devforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Bootstrap projects from file-tree templates",
    long_about = "DevForge renders a registered template directory into a new \
                  project, substituting {{placeholders}} in files ending in .hbs.",
    after_help = "EXAMPLES:\n\
        \x20 devforge create my-app --template node-typescript --testing\n\
        \x20 devforge create my-app --set port=8080 --dry-run\n\
        \x20 devforge template list\n\
        \x20 devforge extract ./existing-project --name starter --templatize package.json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a template.
    #[command(
        visible_alias = "new",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 devforge create my-app\n\
            \x20 devforge create my-app -t node-typescript --typescript --testing --ci\n\
            \x20 devforge create my-app -o ~/code --author \"Ada\" --license Apache-2.0"
    )]
    Create(CreateArgs),

    /// Manage the template registry.
    #[command(
        subcommand,
        about = "Manage templates",
        after_help = "EXAMPLES:\n\
            \x20 devforge template list --format json\n\
            \x20 devforge template add api ./templates/api\n\
            \x20 devforge template remove api"
    )]
    Template(TemplateCommands),

    /// Turn an existing project into a template.
    #[command(
        about = "Create a template from an existing project",
        after_help = "EXAMPLES:\n\
            \x20 devforge extract\n\
            \x20 devforge extract ../my-app --name starter --templatize package.json --templatize README.md"
    )]
    Extract(ExtractArgs),

    /// Inspect built-in hooks.
    #[command(subcommand, about = "Inspect plugins")]
    Plugin(PluginCommands),

    /// Manage the DevForge configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 devforge config get defaults.author\n\
            \x20 devforge config set defaults.license Apache-2.0\n\
            \x20 devforge config list"
    )]
    Config(ConfigCommands),

    /// Write a configuration file with the default settings.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 devforge init           # .devforge.toml in the current directory\n\
            \x20 devforge init --global  # user-wide config"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 devforge completions bash > ~/.local/share/bash-completion/completions/devforge\n\
            \x20 devforge completions zsh  > ~/.zfunc/_devforge\n\
            \x20 devforge completions fish > ~/.config/fish/completions/devforge.fish"
    )]
    Completions(CompletionsArgs),
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `devforge create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Name of the project; also the name of the created directory.
    #[arg(value_name = "PROJECT_NAME")]
    pub name: String,

    /// Template to render (default: `defaults.template`).
    #[arg(short = 't', long = "template", value_name = "NAME")]
    pub template: Option<String>,

    /// Parent directory of the project (default: current directory).
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[arg(long = "description", value_name = "TEXT", help = "Project description")]
    pub description: Option<String>,

    #[arg(long = "author", value_name = "NAME", help = "Author name")]
    pub author: Option<String>,

    #[arg(long = "license", value_name = "SPDX", help = "License identifier")]
    pub license: Option<String>,

    #[arg(long = "typescript", help = "Enable TypeScript")]
    pub typescript: bool,

    #[arg(long = "testing", help = "Include a testing setup")]
    pub testing: bool,

    #[arg(long = "ci", help = "Include a CI pipeline")]
    pub ci: bool,

    /// Extra template variable; repeatable.
    ///
    /// `true`/`false` and integers are typed, anything else is a string.
    #[arg(long = "set", value_name = "KEY=VALUE", action = clap::ArgAction::Append)]
    pub set: Vec<String>,

    #[arg(long = "no-git", help = "Don't suggest initialising a git repository")]
    pub no_git: bool,

    #[arg(long = "no-install", help = "Don't suggest installing dependencies")]
    pub no_install: bool,

    /// Show what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── template ──────────────────────────────────────────────────────────────────

/// Subcommands for `devforge template`.
#[derive(Debug, Subcommand)]
pub enum TemplateCommands {
    /// List registered templates.
    #[command(visible_alias = "ls")]
    List {
        #[arg(long = "format", value_enum, default_value = "table", help = "Output format")]
        format: ListFormat,
    },
    /// Copy a directory into the registry.
    Add {
        /// Template name.
        name: String,
        /// Directory to copy.
        path: PathBuf,
    },
    /// Delete a template from the registry.
    #[command(visible_alias = "rm")]
    Remove {
        /// Template name.
        name: String,
    },
}

/// Output format for `template list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── extract ───────────────────────────────────────────────────────────────────

/// Arguments for `devforge extract`.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Project directory to extract (default: current directory).
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Template name (default: the source directory's name).
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    #[arg(long = "description", value_name = "TEXT", help = "Template description")]
    pub description: Option<String>,

    /// File to turn into a `.hbs` template; repeatable or comma separated.
    #[arg(
        long = "templatize",
        value_name = "FILE",
        action = clap::ArgAction::Append,
        value_delimiter = ','
    )]
    pub templatize: Vec<String>,

    /// Text that replaces the project name in templatized files.
    #[arg(long = "placeholder", value_name = "TEXT")]
    pub placeholder: Option<String>,
}

// ── plugin ────────────────────────────────────────────────────────────────────

/// Subcommands for `devforge plugin`.
#[derive(Debug, Subcommand)]
pub enum PluginCommands {
    /// List built-in hooks and whether each is enabled.
    #[command(visible_alias = "ls")]
    List,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `devforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the global config location instead of `.devforge.toml`.
    #[arg(long = "global", help = "Create global configuration")]
    pub global: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `devforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: clap_complete::Shell,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `devforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.author`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value; comma separated for `plugins.enabled`.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_create_command() {
        let cli = Cli::parse_from([
            "devforge",
            "create",
            "my-app",
            "-t",
            "node-typescript",
            "--testing",
            "--set",
            "port=8080",
            "--set",
            "strict=true",
        ]);
        let Commands::Create(args) = cli.command else {
            panic!("expected Create command");
        };
        assert_eq!(args.name, "my-app");
        assert_eq!(args.template.as_deref(), Some("node-typescript"));
        assert!(args.testing);
        assert!(!args.typescript);
        assert_eq!(args.set, vec!["port=8080", "strict=true"]);
    }

    #[test]
    fn new_is_an_alias_for_create() {
        let cli = Cli::parse_from(["devforge", "new", "demo"]);
        assert!(matches!(cli.command, Commands::Create(_)));
    }

    #[test]
    fn templatize_accepts_commas_and_repeats() {
        let cli = Cli::parse_from([
            "devforge",
            "extract",
            "--templatize",
            "package.json,README.md",
            "--templatize",
            "src/index.ts",
        ]);
        let Commands::Extract(args) = cli.command else {
            panic!("expected Extract command");
        };
        assert_eq!(args.templatize, vec!["package.json", "README.md", "src/index.ts"]);
        assert!(args.source.is_none());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::parse_from([
            "devforge",
            "template",
            "list",
            "--templates-dir",
            "/tmp/registry",
            "-vv",
        ]);
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.templates_dir, Some(PathBuf::from("/tmp/registry")));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["devforge", "--quiet", "--verbose", "plugin", "list"]);
        assert!(result.is_err());
    }
}
