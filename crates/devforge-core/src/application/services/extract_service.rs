//! Extract Service - turns an existing project into a registry template.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        paths::base_name,
        ports::{EntryType, Filesystem, PathFilter, TemplateStore},
        walk::{FileVisit, TreeVisitor, walk_tree},
    },
    domain::{DYNAMIC_SUFFIX, MANIFEST_FILE, RelativePath, TemplateManifest, TemplateName},
    error::ForgeResult,
};

/// Placeholder written in place of the source project's name.
pub const DEFAULT_PLACEHOLDER: &str = "{{projectName}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Template name; defaults to the source directory's name.
    pub name: Option<String>,
    pub description: Option<String>,
    /// Files to turn into `.hbs` templates, by file name or by path
    /// relative to the source (`src/index.ts`).
    pub templatize: Vec<String>,
    pub placeholder: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            templatize: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractReport {
    pub name: String,
    pub path: PathBuf,
    pub copied: Vec<RelativePath>,
    pub templatized: Vec<RelativePath>,
    pub manifest: TemplateManifest,
}

#[derive(Clone)]
pub struct ExtractService {
    store: Arc<dyn TemplateStore>,
    fs: Arc<dyn Filesystem>,
}

impl ExtractService {
    pub fn new(store: Arc<dyn TemplateStore>, fs: Arc<dyn Filesystem>) -> Self {
        Self { store, fs }
    }

    /// Create a template from `source`, skipping whatever `filter` ignores.
    #[instrument(skip_all, fields(source = %source.display()))]
    pub fn extract(
        &self,
        source: &Path,
        options: &ExtractOptions,
        filter: &dyn PathFilter,
    ) -> ForgeResult<ExtractReport> {
        if !self.fs.is_dir(source) {
            return Err(ApplicationError::SourceNotFound {
                path: source.to_path_buf(),
            }
            .into());
        }

        let project_name = base_name(source)?.unwrap_or_default();
        let name = match &options.name {
            Some(name) => TemplateName::parse(name.as_str())?,
            None => TemplateName::parse(project_name.as_str())?,
        };
        if self.store.contains(&name) {
            return Err(ApplicationError::TemplateExists {
                name: name.to_string(),
            }
            .into());
        }

        let dest = self.store.path_for(&name);
        self.fs.create_dir_all(&dest)?;

        let mut visitor = ExtractVisitor {
            fs: self.fs.as_ref(),
            filter,
            options,
            project_name: &project_name,
            copied: Vec::new(),
            templatized: Vec::new(),
        };
        walk_tree(self.fs.as_ref(), source, &dest, &mut visitor)?;
        let ExtractVisitor {
            copied,
            templatized,
            ..
        } = visitor;

        let mut manifest = TemplateManifest::new(name.as_str());
        manifest.description = options.description.clone();
        manifest.files = templatized.iter().map(ToString::to_string).collect();
        let manifest_json = manifest.to_json_pretty()?;
        self.fs
            .write_atomic(&dest.join(MANIFEST_FILE), manifest_json.as_bytes())?;

        info!(
            template = %name,
            copied = copied.len(),
            templatized = templatized.len(),
            "template extracted"
        );
        Ok(ExtractReport {
            name: name.to_string(),
            path: dest,
            copied,
            templatized,
            manifest,
        })
    }
}

struct ExtractVisitor<'a> {
    fs: &'a dyn Filesystem,
    filter: &'a dyn PathFilter,
    options: &'a ExtractOptions,
    project_name: &'a str,
    copied: Vec<RelativePath>,
    templatized: Vec<RelativePath>,
}

impl ExtractVisitor<'_> {
    fn wants_template(&self, relative: &RelativePath, file_name: &str) -> bool {
        let relative = relative.to_string();
        self.options
            .templatize
            .iter()
            .any(|wanted| wanted == file_name || *wanted == relative)
    }
}

impl TreeVisitor for ExtractVisitor<'_> {
    fn ignore(&self, relative: &RelativePath, kind: EntryType) -> bool {
        if kind == EntryType::File && relative.as_path() == Path::new(MANIFEST_FILE) {
            return true;
        }
        self.filter
            .is_ignored(relative, kind == EntryType::Directory)
    }

    fn enter_dir(
        &mut self,
        parent_dest: &Path,
        name: &str,
        _relative: &RelativePath,
    ) -> ForgeResult<PathBuf> {
        let dest = parent_dest.join(name);
        self.fs.create_dir_all(&dest)?;
        Ok(dest)
    }

    fn visit_file(&mut self, file: &FileVisit<'_>) -> ForgeResult<()> {
        if self.wants_template(file.relative, file.file_name) {
            let mut contents = self.fs.read_to_string(file.source)?;
            if !self.project_name.is_empty() {
                contents = contents.replace(self.project_name, &self.options.placeholder);
            }
            let dest = file
                .dest_dir
                .join(format!("{}{}", file.file_name, DYNAMIC_SUFFIX));
            self.fs.write_atomic(&dest, contents.as_bytes())?;
            debug!(file = %file.relative, "templatized");
            self.templatized.push(file.relative.clone());
        } else {
            self.fs
                .copy_file(file.source, &file.dest_dir.join(file.file_name))?;
            self.copied.push(file.relative.clone());
        }
        Ok(())
    }
}
