//! Command handlers.
//!
//! Each handler translates arguments into calls on the core services and
//! prints the outcome. No business logic lives here.

pub mod completions;
pub mod config;
pub mod create;
pub mod extract;
pub mod init;
pub mod plugin;
pub mod template;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use devforge_adapters::{DirectoryStore, LocalFilesystem, build_dispatcher, install_bundled};
use devforge_core::{
    application::{
        ExtractService, TemplateRenderer, TemplateService,
        ports::{Filesystem, TemplateStore},
    },
    domain::{RenderConfig, keys},
};

use crate::{
    cli::GlobalArgs,
    config::{AppConfig, ConfigSources},
    error::CliResult,
    output::OutputManager,
};

/// Everything a command needs, built once in `main`.
pub struct Context {
    pub global: GlobalArgs,
    pub config: AppConfig,
    pub sources: ConfigSources,
    pub output: OutputManager,
    fs: Arc<dyn Filesystem>,
    store: Arc<dyn TemplateStore>,
}

impl Context {
    pub fn new(
        global: GlobalArgs,
        config: AppConfig,
        sources: ConfigSources,
        output: OutputManager,
    ) -> Self {
        let fs: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
        let registry = templates_dir(&global, &config);
        let store: Arc<dyn TemplateStore> =
            Arc::new(DirectoryStore::new(registry, Arc::clone(&fs)));
        Self {
            global,
            config,
            sources,
            output,
            fs,
            store,
        }
    }

    pub fn fs(&self) -> Arc<dyn Filesystem> {
        Arc::clone(&self.fs)
    }

    /// Registry directory in effect: `--templates-dir`, else `templates.dir`.
    pub fn templates_dir(&self) -> PathBuf {
        templates_dir(&self.global, &self.config)
    }

    /// Install the bundled templates into a registry that does not exist yet.
    ///
    /// Only a missing registry is seeded, so removing a bundled template
    /// from an existing one sticks.
    pub fn prepare_registry(&self) -> CliResult<()> {
        let root = self.templates_dir();
        if self.fs.exists(&root) {
            return Ok(());
        }
        let installed = self.install_bundled()?;
        debug!(root = %root.display(), ?installed, "registry seeded");
        Ok(())
    }

    /// Install every bundled template missing from the registry.
    pub fn install_bundled(&self) -> CliResult<Vec<&'static str>> {
        Ok(install_bundled(self.fs.as_ref(), &self.templates_dir())?)
    }

    pub fn templates(&self) -> TemplateService {
        TemplateService::new(Arc::clone(&self.store))
    }

    pub fn extractor(&self) -> ExtractService {
        ExtractService::new(Arc::clone(&self.store), self.fs())
    }

    /// Renderer with the hooks named in `plugins.enabled`.
    ///
    /// An unknown plugin name is a configuration error.
    pub fn renderer(&self) -> CliResult<TemplateRenderer> {
        let hooks = build_dispatcher(
            &self.config.plugins.enabled,
            self.fs(),
            configured_defaults(&self.config),
        )?;
        Ok(TemplateRenderer::new(Arc::clone(&self.store), self.fs(), hooks))
    }
}

fn templates_dir(global: &GlobalArgs, config: &AppConfig) -> PathBuf {
    global
        .templates_dir
        .clone()
        .unwrap_or_else(|| config.templates.dir.clone())
}

/// Configured project defaults as render variables, for the `defaults` hook.
pub fn configured_defaults(config: &AppConfig) -> RenderConfig {
    [
        (keys::AUTHOR, &config.defaults.author),
        (keys::LICENSE, &config.defaults.license),
        (keys::DESCRIPTION, &config.defaults.description),
    ]
    .into_iter()
    .filter_map(|(key, value)| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| (key.to_string(), serde_json::Value::from(v)))
    })
    .collect()
}
