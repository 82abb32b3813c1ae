//! Template Service - registry management operations.
//!
//! Handles listing, adding and removing templates. Separated from the
//! renderer for single responsibility.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::ports::{TemplateStore, TemplateSummary},
    domain::TemplateName,
    error::ForgeResult,
};

/// Service for template operations.
#[derive(Clone)]
pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// List all templates, sorted by name.
    pub fn list(&self) -> ForgeResult<Vec<TemplateSummary>> {
        self.store.list()
    }

    /// Register the directory `source` as template `name`.
    #[instrument(skip(self, source), fields(source = %source.as_ref().display()))]
    pub fn add(&self, name: &str, source: impl AsRef<Path>) -> ForgeResult<PathBuf> {
        let name = TemplateName::parse(name)?;
        let path = self.store.add(&name, source.as_ref())?;
        info!(template = %name, "template added");
        Ok(path)
    }

    /// Remove a template from the registry.
    #[instrument(skip(self))]
    pub fn remove(&self, name: &str) -> ForgeResult<()> {
        let name = TemplateName::parse(name)?;
        self.store.remove(&name)?;
        info!(template = %name, "template removed");
        Ok(())
    }

    /// Root directory of a template.
    pub fn resolve(&self, name: &str) -> ForgeResult<PathBuf> {
        self.store.resolve(&TemplateName::parse(name)?)
    }
}
