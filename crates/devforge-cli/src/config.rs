//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `DEVFORGE_AUTHOR`, `DEVFORGE_LICENSE`, `DEVFORGE_TEMPLATE_DIR`
//! 3. `DEVFORGE_<SECTION>__<KEY>` environment variables
//! 4. The file passed with `--config`
//! 5. `.devforge.toml` in the current directory
//! 6. The global `config.toml` in the platform config directory
//! 7. Built-in defaults (always present)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".devforge.toml";

/// Template used by `create` when neither `-t` nor config names one.
pub const DEFAULT_TEMPLATE: &str = "node-typescript";

const ENV_PREFIX: &str = "DEVFORGE";

/// Environment shortcuts and the keys they set.
const ENV_SHORTCUTS: &[(&str, &str)] = &[
    ("DEVFORGE_AUTHOR", "defaults.author"),
    ("DEVFORGE_LICENSE", "defaults.license"),
    ("DEVFORGE_TEMPLATE_DIR", "templates.dir"),
];

/// Every key `config get` and `config set` understand.
pub const KNOWN_KEYS: &[&str] = &[
    "defaults.author",
    "defaults.license",
    "defaults.template",
    "defaults.description",
    "templates.dir",
    "plugins.enabled",
    "output.no_color",
    "output.format",
];

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Template registry settings.
    pub templates: TemplateConfig,
    /// Hooks to enable.
    pub plugins: PluginConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub template: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            author: None,
            license: None,
            description: None,
            template: DEFAULT_TEMPLATE.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub dir: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: default_templates_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub enabled: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

/// Where configuration is read from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub global: Option<PathBuf>,
    pub local: Option<PathBuf>,
    pub explicit: Option<PathBuf>,
    /// Environment to read instead of the process environment.
    pub env: Option<HashMap<String, String>>,
}

impl ConfigSources {
    /// The standard locations, plus `--config` if given.
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self {
            global: AppConfig::global_path(),
            local: Some(PathBuf::from(LOCAL_CONFIG_FILE)),
            explicit: explicit.map(Path::to_path_buf),
            env: None,
        }
    }

    fn env_var(&self, name: &str) -> Option<String> {
        match &self.env {
            Some(env) => env.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
        .filter(|v| !v.is_empty())
    }

    /// The file `config set` writes to and `config path` reports.
    pub fn active_file(&self) -> Option<PathBuf> {
        if let Some(explicit) = &self.explicit {
            return Some(explicit.clone());
        }
        if let Some(local) = self.local.as_ref().filter(|p| p.is_file()) {
            return Some(local.clone());
        }
        self.global.clone()
    }
}

impl AppConfig {
    /// Load configuration from `sources`, lowest priority first.
    pub fn load_from(sources: &ConfigSources) -> anyhow::Result<Self> {
        if let Some(explicit) = sources.explicit.as_ref().filter(|p| !p.is_file()) {
            bail!("config file {} does not exist", explicit.display());
        }

        let mut builder = Config::builder();
        for path in [&sources.global, &sources.local, &sources.explicit]
            .into_iter()
            .flatten()
        {
            if path.is_file() {
                debug!(path = %path.display(), "reading config file");
                builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("plugins.enabled")
                .try_parsing(true)
                .source(sources.env.clone()),
        );
        for (var, key) in ENV_SHORTCUTS {
            builder = builder.set_override_option(*key, sources.env_var(var))?;
        }

        builder
            .build()
            .context("reading configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the global configuration file.
    pub fn global_path() -> Option<PathBuf> {
        project_dirs().map(|d| d.config_dir().join("config.toml"))
    }

    /// Value of a dotted key, rendered for display.
    pub fn get(&self, key: &str) -> Option<String> {
        if !KNOWN_KEYS.contains(&key) {
            return None;
        }
        let json = serde_json::to_value(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&json, |node, part| node.get(part))?;
        Some(match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        })
    }

    /// Serialise as TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("serialising configuration")
    }

    /// Write this configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        write_file(path, &self.to_toml()?)
    }
}

/// Set `key` to `value` in the TOML file at `path`, keeping other entries.
///
/// The file is created if missing. The result must still be a valid
/// configuration.
pub fn set_value(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        bail!(
            "unknown config key '{key}', expected one of: {}",
            KNOWN_KEYS.join(", ")
        );
    }
    let Some((section, field)) = key.split_once('.') else {
        bail!("config keys have the form section.key");
    };

    let mut table: toml::Table = if path.is_file() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
    } else {
        toml::Table::new()
    };

    let typed = match key {
        "plugins.enabled" => toml::Value::Array(
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_string()))
                .collect(),
        ),
        "output.no_color" => toml::Value::Boolean(
            value
                .parse()
                .with_context(|| format!("'{value}' is not true or false"))?,
        ),
        _ => toml::Value::String(value.to_string()),
    };

    let section_table = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let Some(section_table) = section_table.as_table_mut() else {
        bail!("'{section}' in {} is not a table", path.display());
    };
    section_table.insert(field.to_string(), typed);

    toml::Value::Table(table.clone())
        .try_into::<AppConfig>()
        .context("the new value makes the configuration invalid")?;

    let text = toml::to_string_pretty(&table).context("serialising configuration")?;
    write_file(path, &text)
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "devforge", "devforge")
}

fn default_templates_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().join("templates"))
        .unwrap_or_else(|| PathBuf::from(".devforge").join("templates"))
}
