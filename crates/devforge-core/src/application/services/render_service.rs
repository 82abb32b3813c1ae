//! Template Renderer - the main application orchestrator.
//!
//! This service coordinates a whole render:
//! 1. Resolve the template through the store
//! 2. Run pre-render hooks
//! 3. Lock the output root and create it
//! 4. Walk the template, evaluating `.hbs` files and copying the rest
//! 5. Run post-render hooks
//!
//! Writes are fail-fast without rollback: files written before an error
//! stay on disk. Rendering into an existing directory merges in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        hooks::HookDispatcher,
        locks::OutputLocks,
        ports::{EntryType, Filesystem, TemplateStore},
        walk::{FileVisit, TreeVisitor, walk_tree},
    },
    domain::{
        CompiledTemplate, DomainError, EntryKind, MANIFEST_FILE, RelativePath, RenderConfig,
        TemplateName, is_safe_component, output_name, render_str, syntax::has_expressions,
    },
    error::ForgeResult,
};

/// What a render produced. Paths are relative to `output_root`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderReport {
    pub template: String,
    pub output_root: PathBuf,
    /// `.hbs` files evaluated and written.
    pub rendered: Vec<RelativePath>,
    /// Static files copied verbatim.
    pub copied: Vec<RelativePath>,
    pub directories: Vec<RelativePath>,
    /// True when nothing was written.
    pub dry_run: bool,
    /// Configuration after pre-render hooks.
    pub config: RenderConfig,
}

impl RenderReport {
    pub fn file_count(&self) -> usize {
        self.rendered.len() + self.copied.len()
    }

    /// Every output file, in write order within each category.
    pub fn files(&self) -> impl Iterator<Item = &RelativePath> {
        self.rendered.iter().chain(self.copied.iter())
    }
}

/// Renders registry templates into output directories.
///
/// Clones share the output lock registry, so concurrent renders into the
/// same root from any clone are serialized.
#[derive(Clone)]
pub struct TemplateRenderer {
    store: Arc<dyn TemplateStore>,
    fs: Arc<dyn Filesystem>,
    hooks: HookDispatcher,
    locks: OutputLocks,
}

impl TemplateRenderer {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        fs: Arc<dyn Filesystem>,
        hooks: HookDispatcher,
    ) -> Self {
        Self {
            store,
            fs,
            hooks,
            locks: OutputLocks::new(),
        }
    }

    pub fn hooks(&self) -> &HookDispatcher {
        &self.hooks
    }

    /// Render `template` into `output_root`.
    #[instrument(
        skip_all,
        fields(template = %template, output = %output_root.as_ref().display())
    )]
    pub fn render(
        &self,
        template: &str,
        output_root: impl AsRef<Path>,
        config: RenderConfig,
    ) -> ForgeResult<RenderReport> {
        self.run(template, output_root.as_ref(), config, false)
    }

    /// Walk and evaluate everything `render` would, without writing.
    ///
    /// Pre-render hooks run; post-render hooks don't.
    #[instrument(
        skip_all,
        fields(template = %template, output = %output_root.as_ref().display())
    )]
    pub fn preview(
        &self,
        template: &str,
        output_root: impl AsRef<Path>,
        config: RenderConfig,
    ) -> ForgeResult<RenderReport> {
        self.run(template, output_root.as_ref(), config, true)
    }

    fn run(
        &self,
        template: &str,
        output_root: &Path,
        config: RenderConfig,
        dry_run: bool,
    ) -> ForgeResult<RenderReport> {
        let name = TemplateName::parse(template)?;
        let template_root = self.store.resolve(&name)?;
        debug!(root = %template_root.display(), "template resolved");

        let config = self.hooks.run_pre(&config)?;

        let lock = self.locks.handle(output_root)?;
        let _guard = lock.acquire()?;

        if !dry_run {
            self.fs.create_dir_all(output_root)?;
        }

        let mut visitor = RenderVisitor {
            fs: self.fs.as_ref(),
            config: &config,
            output_root,
            dry_run,
            rendered: Vec::new(),
            copied: Vec::new(),
            directories: Vec::new(),
        };
        walk_tree(self.fs.as_ref(), &template_root, output_root, &mut visitor)?;

        let RenderVisitor {
            rendered,
            copied,
            directories,
            ..
        } = visitor;

        if !dry_run {
            self.hooks.run_post(output_root, &config);
        }

        info!(
            files = rendered.len() + copied.len(),
            directories = directories.len(),
            dry_run,
            "render complete"
        );

        Ok(RenderReport {
            template: name.to_string(),
            output_root: output_root.to_path_buf(),
            rendered,
            copied,
            directories,
            dry_run,
            config,
        })
    }
}

struct RenderVisitor<'a> {
    fs: &'a dyn Filesystem,
    config: &'a RenderConfig,
    output_root: &'a Path,
    dry_run: bool,
    rendered: Vec<RelativePath>,
    copied: Vec<RelativePath>,
    directories: Vec<RelativePath>,
}

impl RenderVisitor<'_> {
    /// Evaluate placeholders in an entry name; the result must stay one
    /// component.
    fn entry_name(&self, name: &str, source: &RelativePath) -> ForgeResult<String> {
        if !has_expressions(name) {
            return Ok(name.to_string());
        }
        let rendered = render_str(name, self.config)
            .map_err(|e| rendering_failed(source, e))?;
        if !is_safe_component(&rendered) {
            return Err(rendering_failed(
                source,
                DomainError::UnsafeEntryName { name: rendered },
            ));
        }
        Ok(rendered)
    }

    fn output_relative(&self, dest: &Path) -> ForgeResult<RelativePath> {
        let relative = dest
            .strip_prefix(self.output_root)
            .map_err(|_| DomainError::PathEscapesRoot {
                path: dest.display().to_string(),
            })?;
        Ok(RelativePath::try_new(relative)?)
    }
}

impl TreeVisitor for RenderVisitor<'_> {
    fn ignore(&self, relative: &RelativePath, kind: EntryType) -> bool {
        kind == EntryType::File && relative.as_path() == Path::new(MANIFEST_FILE)
    }

    fn enter_dir(
        &mut self,
        parent_dest: &Path,
        name: &str,
        relative: &RelativePath,
    ) -> ForgeResult<PathBuf> {
        let dest = parent_dest.join(self.entry_name(name, relative)?);
        if !self.dry_run {
            self.fs.create_dir_all(&dest)?;
        }
        let relative = self.output_relative(&dest)?;
        debug!(dir = %relative, "directory");
        self.directories.push(relative);
        Ok(dest)
    }

    fn visit_file(&mut self, file: &FileVisit<'_>) -> ForgeResult<()> {
        let kind = EntryKind::classify(file.file_name);
        let dest = file
            .dest_dir
            .join(self.entry_name(output_name(file.file_name), file.relative)?);
        let relative = self.output_relative(&dest)?;

        match kind {
            EntryKind::Dynamic => {
                let source = self.fs.read_to_string(file.source)?;
                let compiled = CompiledTemplate::compile(&source)
                    .map_err(|e| rendering_failed(file.relative, e))?;
                let output = compiled.render(self.config);
                if !self.dry_run {
                    self.fs.write_atomic(&dest, output.as_bytes())?;
                    if self.fs.is_executable(file.source) {
                        self.fs.set_executable(&dest)?;
                    }
                }
                debug!(file = %relative, "rendered");
                self.rendered.push(relative);
            }
            EntryKind::Static => {
                if !self.dry_run {
                    self.fs.copy_file(file.source, &dest)?;
                }
                debug!(file = %relative, "copied");
                self.copied.push(relative);
            }
        }
        Ok(())
    }
}

fn rendering_failed(source: &RelativePath, err: DomainError) -> crate::error::ForgeError {
    ApplicationError::RenderingFailed {
        path: source.as_path().to_path_buf(),
        reason: err.to_string(),
    }
    .into()
}
