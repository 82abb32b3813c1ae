//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `devforge-adapters` crate provides implementations.

mod hooks;

pub use hooks::{HookResult, PostRenderHook, PreRenderHook};

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{RelativePath, TemplateName};
use crate::error::ForgeResult;

/// What a directory entry is, after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Directory,
    File,
    /// Sockets, FIFOs and the like. Walks skip these.
    Other,
    /// Present but unusable: a dangling symlink or a name that is not
    /// UTF-8. Walks fail when they reach one.
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryType,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, kind: EntryType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `devforge_adapters::filesystem::LocalFilesystem` (production)
/// - `devforge_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()>;

    /// Entries of a directory, in no particular order.
    fn read_dir(&self, path: &Path) -> ForgeResult<Vec<DirEntry>>;

    fn read_to_string(&self, path: &Path) -> ForgeResult<String>;

    /// Write a file so that `path` never holds partial contents.
    ///
    /// An existing file keeps its permissions; a new one gets the
    /// platform default for new files.
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> ForgeResult<()>;

    /// Copy bytes and executable bits.
    fn copy_file(&self, from: &Path, to: &Path) -> ForgeResult<()>;

    /// Whether `path` is a file with an executable bit set.
    fn is_executable(&self, path: &Path) -> bool;

    /// Add execute permission wherever read is allowed. Other permission
    /// bits are left alone.
    fn set_executable(&self, path: &Path) -> ForgeResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()>;
}

/// A registered template as shown by `template list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub description: Option<String>,
    pub path: PathBuf,
}

/// Port for the template registry.
///
/// Implemented by:
/// - `devforge_adapters::store::DirectoryStore` (a directory of templates)
pub trait TemplateStore: Send + Sync {
    /// Root directory of a template, or `TemplateNotFound`.
    fn resolve(&self, name: &TemplateName) -> ForgeResult<PathBuf>;

    /// All templates, sorted by name.
    fn list(&self) -> ForgeResult<Vec<TemplateSummary>>;

    /// Copy `source` into the registry under `name`.
    fn add(&self, name: &TemplateName, source: &Path) -> ForgeResult<PathBuf>;

    fn remove(&self, name: &TemplateName) -> ForgeResult<()>;

    /// Where a template with this name lives (or would live).
    fn path_for(&self, name: &TemplateName) -> PathBuf;

    fn contains(&self, name: &TemplateName) -> bool {
        self.resolve(name).is_ok()
    }
}

/// Decides which source entries a walk leaves out.
pub trait PathFilter: Send + Sync {
    fn is_ignored(&self, relative: &RelativePath, is_dir: bool) -> bool;
}

/// Filter that keeps everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl PathFilter for KeepAll {
    fn is_ignored(&self, _relative: &RelativePath, _is_dir: bool) -> bool {
        false
    }
}
