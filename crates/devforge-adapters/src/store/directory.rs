//! Template registry backed by a directory: one subdirectory per template.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use devforge_core::{
    application::{
        ApplicationError, copy_tree,
        ports::{EntryType, Filesystem, KeepAll, TemplateStore, TemplateSummary},
    },
    domain::{MANIFEST_FILE, TemplateManifest, TemplateName},
    error::ForgeResult,
};

/// Directory-backed template store.
#[derive(Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    fs: Arc<dyn Filesystem>,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    /// Registry root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn description(&self, template_root: &Path) -> Option<String> {
        let manifest_path = template_root.join(MANIFEST_FILE);
        if !self.fs.exists(&manifest_path) {
            return None;
        }
        let parsed = self
            .fs
            .read_to_string(&manifest_path)
            .and_then(|text| Ok(TemplateManifest::from_json(&text)?));
        match parsed {
            Ok(manifest) => manifest.description,
            Err(e) => {
                warn!(path = %manifest_path.display(), error = %e, "ignoring unreadable manifest");
                None
            }
        }
    }
}

impl std::fmt::Debug for DirectoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryStore")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl TemplateStore for DirectoryStore {
    fn resolve(&self, name: &TemplateName) -> ForgeResult<PathBuf> {
        let path = self.path_for(name);
        if self.fs.is_dir(&path) {
            Ok(path)
        } else {
            Err(ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into())
        }
    }

    fn list(&self) -> ForgeResult<Vec<TemplateSummary>> {
        if !self.fs.is_dir(&self.root) {
            debug!(root = %self.root.display(), "registry root missing");
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = self
            .fs
            .read_dir(&self.root)?
            .into_iter()
            .filter(|entry| entry.kind == EntryType::Directory)
            .map(|entry| entry.name)
            .collect();
        names.sort();

        Ok(names
            .into_iter()
            .map(|name| {
                let path = self.root.join(&name);
                TemplateSummary {
                    description: self.description(&path),
                    name,
                    path,
                }
            })
            .collect())
    }

    fn add(&self, name: &TemplateName, source: &Path) -> ForgeResult<PathBuf> {
        if self.contains(name) {
            return Err(ApplicationError::TemplateExists {
                name: name.to_string(),
            }
            .into());
        }
        if !self.fs.is_dir(source) {
            return Err(ApplicationError::SourceNotFound {
                path: source.to_path_buf(),
            }
            .into());
        }

        let dest = self.path_for(name);
        let files = copy_tree(self.fs.as_ref(), source, &dest, &KeepAll)?;
        debug!(template = %name, files, "template copied into registry");
        Ok(dest)
    }

    fn remove(&self, name: &TemplateName) -> ForgeResult<()> {
        let path = self.resolve(name)?;
        self.fs.remove_dir_all(&path)
    }

    fn path_for(&self, name: &TemplateName) -> PathBuf {
        self.root.join(name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFilesystem;
    use devforge_core::error::{ErrorCategory, ForgeError};

    fn store() -> (MemoryFilesystem, DirectoryStore) {
        let fs = MemoryFilesystem::new();
        let store = DirectoryStore::new("/registry", Arc::new(fs.clone()));
        (fs, store)
    }

    fn name(s: &str) -> TemplateName {
        TemplateName::parse(s).unwrap()
    }

    #[test]
    fn missing_root_lists_nothing() {
        let (_fs, store) = store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn list_is_sorted_and_reads_descriptions() {
        let (fs, store) = store();
        fs.add_file("/registry/zeta/README.md", "z");
        fs.add_file(
            "/registry/alpha/template.json",
            r#"{"name":"alpha","description":"First one"}"#,
        );
        fs.add_file("/registry/stray-file.txt", "not a template");
        fs.add_file("/registry/broken/template.json", "{ nope");

        let listed = store.list().unwrap();
        let names: Vec<_> = listed.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "broken", "zeta"]);
        assert_eq!(listed[0].description.as_deref(), Some("First one"));
        assert_eq!(listed[1].description, None);
    }

    #[test]
    fn add_copies_and_rejects_duplicates() {
        let (fs, store) = store();
        fs.add_file("/src/project/package.json.hbs", "{}");
        fs.add_executable("/src/project/bin/run", "#!/bin/sh");

        let path = store.add(&name("mine"), Path::new("/src/project")).unwrap();
        assert_eq!(path, PathBuf::from("/registry/mine"));
        assert!(fs.exists(Path::new("/registry/mine/package.json.hbs")));
        assert!(fs.is_executable("/registry/mine/bin/run"));

        let err = store
            .add(&name("mine"), Path::new("/src/project"))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::AlreadyExists);
    }

    #[test]
    fn add_requires_source_directory() {
        let (_fs, store) = store();
        let err = store.add(&name("x"), Path::new("/does/not/exist")).unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Application(ApplicationError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn remove_requires_existing_template() {
        let (fs, store) = store();
        let err = store.remove(&name("ghost")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);

        fs.add_file("/registry/real/a.txt", "a");
        store.remove(&name("real")).unwrap();
        assert!(!fs.exists(Path::new("/registry/real")));
    }

    #[test]
    fn resolve_reports_not_found() {
        let (fs, store) = store();
        fs.add_file("/registry/node/a.txt", "a");
        assert_eq!(
            store.resolve(&name("node")).unwrap(),
            PathBuf::from("/registry/node")
        );
        assert!(matches!(
            store.resolve(&name("other")).unwrap_err(),
            ForgeError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }
}
