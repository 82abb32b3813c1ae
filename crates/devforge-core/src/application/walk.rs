//! Depth-first template tree walk shared by rendering, registry copies and
//! extraction.
//!
//! Order is deterministic: entries of a directory are sorted by name, every
//! subdirectory is entered and fully walked before that directory's files,
//! and a directory is always entered before anything inside it.
//! Special files are skipped; an unreadable entry fails the walk in its
//! place among the files.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::application::ApplicationError;
use crate::application::ports::{EntryType, Filesystem, PathFilter};
use crate::domain::RelativePath;
use crate::error::ForgeResult;

/// A file reached by the walk.
#[derive(Debug)]
pub struct FileVisit<'a> {
    /// Absolute source path.
    pub source: &'a Path,
    /// Source path relative to the walk root.
    pub relative: &'a RelativePath,
    /// Destination directory the file belongs in.
    pub dest_dir: &'a Path,
    pub file_name: &'a str,
}

/// Callbacks for [`walk_tree`].
pub trait TreeVisitor {
    /// Entries for which this returns true are skipped, directories
    /// including their contents.
    fn ignore(&self, _relative: &RelativePath, _kind: EntryType) -> bool {
        false
    }

    /// Called before the directory's contents. Returns the destination
    /// directory for them; writing visitors create it here.
    fn enter_dir(
        &mut self,
        parent_dest: &Path,
        name: &str,
        relative: &RelativePath,
    ) -> ForgeResult<PathBuf>;

    fn visit_file(&mut self, file: &FileVisit<'_>) -> ForgeResult<()>;
}

/// Walk `source_root`, mirroring into `dest_root`.
///
/// The root itself is not entered; callers create `dest_root` as they see
/// fit. The first error stops the walk.
pub fn walk_tree(
    fs: &dyn Filesystem,
    source_root: &Path,
    dest_root: &Path,
    visitor: &mut dyn TreeVisitor,
) -> ForgeResult<()> {
    walk_dir(fs, source_root, &RelativePath::root(), dest_root, visitor)
}

fn walk_dir(
    fs: &dyn Filesystem,
    source_dir: &Path,
    relative_dir: &RelativePath,
    dest_dir: &Path,
    visitor: &mut dyn TreeVisitor,
) -> ForgeResult<()> {
    let mut entries = fs.read_dir(source_dir)?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut files = Vec::new();
    for entry in entries {
        let relative = relative_dir.join(&entry.name)?;
        if visitor.ignore(&relative, entry.kind) {
            trace!(path = %relative, "ignored");
            continue;
        }
        let kind = entry.kind;
        match kind {
            EntryType::Directory => {
                let source = source_dir.join(&entry.name);
                let dest = visitor.enter_dir(dest_dir, &entry.name, &relative)?;
                walk_dir(fs, &source, &relative, &dest, visitor)?;
            }
            EntryType::File | EntryType::Unreadable => files.push((entry, relative)),
            EntryType::Other => trace!(path = %relative, "skipping special file"),
        }
    }

    for (entry, relative) in files {
        let name = entry.name;
        let source = source_dir.join(&name);
        if entry.kind == EntryType::Unreadable {
            return Err(ApplicationError::FilesystemError {
                path: source,
                reason: "entry cannot be read (dangling symbolic link or non-UTF-8 name)".into(),
            }
            .into());
        }
        visitor.visit_file(&FileVisit {
            source: &source,
            relative: &relative,
            dest_dir,
            file_name: &name,
        })?;
    }
    Ok(())
}

/// Plain recursive copy honouring a [`PathFilter`]. Returns the number of
/// files copied.
pub fn copy_tree(
    fs: &dyn Filesystem,
    source_root: &Path,
    dest_root: &Path,
    filter: &dyn PathFilter,
) -> ForgeResult<usize> {
    if !fs.is_dir(source_root) {
        return Err(ApplicationError::SourceNotFound {
            path: source_root.to_path_buf(),
        }
        .into());
    }
    fs.create_dir_all(dest_root)?;

    let mut copier = Copier {
        fs,
        filter,
        files: 0,
    };
    walk_tree(fs, source_root, dest_root, &mut copier)?;
    Ok(copier.files)
}

struct Copier<'a> {
    fs: &'a dyn Filesystem,
    filter: &'a dyn PathFilter,
    files: usize,
}

impl TreeVisitor for Copier<'_> {
    fn ignore(&self, relative: &RelativePath, kind: EntryType) -> bool {
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
        self.fs
            .copy_file(file.source, &file.dest_dir.join(file.file_name))?;
        self.files += 1;
        Ok(())
    }
}
