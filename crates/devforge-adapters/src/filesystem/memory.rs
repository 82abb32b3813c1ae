//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use devforge_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, EntryType, Filesystem},
    },
    error::ForgeResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state. Writes can be made to fail on demand to exercise
/// error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    executables: HashSet<PathBuf>,
    /// Writes to these file names fail.
    failing_names: HashSet<String>,
    /// Every successful write, in order.
    write_log: Vec<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a file, creating its parents (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut inner = self.write();
        if let Some(parent) = path.parent() {
            insert_ancestors(&mut inner.directories, parent);
        }
        inner.files.insert(path.to_path_buf(), contents.into());
    }

    /// Seed an executable file (testing helper).
    pub fn add_executable(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.add_file(&path, contents);
        self.write().executables.insert(path.as_ref().to_path_buf());
    }

    /// Read a file's content as text (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.read();
        inner
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: impl AsRef<Path>) -> bool {
        self.read().executables.contains(path.as_ref())
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    /// Paths written through `write_atomic` or `copy_file`, in order.
    pub fn write_log(&self) -> Vec<PathBuf> {
        self.read().write_log.clone()
    }

    /// Make every later write to a file with this name fail.
    pub fn fail_writes_to(&self, file_name: impl Into<String>) {
        self.write().failing_names.insert(file_name.into());
    }

    fn check_writable(inner: &MemoryFilesystemInner, path: &Path) -> ForgeResult<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if inner.failing_names.contains(&name) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "injected write failure".into(),
            }
            .into());
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) => {
                Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

fn insert_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

fn not_found(path: &Path) -> devforge_core::error::ForgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "No such file or directory".into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write();
        if inner.files.contains_key(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "A file exists at this path".into(),
            }
            .into());
        }
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> ForgeResult<Vec<DirEntry>> {
        let inner = self.read();
        if !inner.directories.contains(path) {
            return Err(not_found(path));
        }

        let child_name = |p: &PathBuf| -> Option<String> {
            (p.parent() == Some(path))
                .then(|| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .flatten()
        };

        let mut entries: Vec<DirEntry> = inner
            .directories
            .iter()
            .filter_map(|p| child_name(p).map(|n| DirEntry::new(n, EntryType::Directory)))
            .collect();
        entries.extend(
            inner
                .files
                .keys()
                .filter_map(|p| child_name(p).map(|n| DirEntry::new(n, EntryType::File))),
        );
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> ForgeResult<String> {
        let inner = self.read();
        let bytes = inner.files.get(path).ok_or_else(|| not_found(path))?;
        String::from_utf8(bytes.clone()).map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("Failed to read file: {}", e),
            }
            .into()
        })
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> ForgeResult<()> {
        let mut inner = self.write();
        Self::check_writable(&inner, path)?;
        // An overwritten file keeps its executable flag.
        inner.files.insert(path.to_path_buf(), contents.to_vec());
        inner.write_log.push(path.to_path_buf());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> ForgeResult<()> {
        let mut inner = self.write();
        let bytes = inner.files.get(from).cloned().ok_or_else(|| not_found(from))?;
        Self::check_writable(&inner, to)?;
        inner.files.insert(to.to_path_buf(), bytes);
        if inner.executables.contains(from) {
            inner.executables.insert(to.to_path_buf());
        } else {
            inner.executables.remove(to);
        }
        inner.write_log.push(to.to_path_buf());
        Ok(())
    }

    fn is_executable(&self, path: &Path) -> bool {
        self.read().executables.contains(path)
    }

    fn set_executable(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write();
        if !inner.files.contains_key(path) {
            return Err(not_found(path));
        }
        inner.executables.insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read().directories.contains(path)
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write();
        if !inner.directories.contains(path) {
            return Err(not_found(path));
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_files_are_listed_with_parents() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/t/src/index.ts", "x");
        fs.add_file("/t/README.md", "y");

        let mut entries = fs.read_dir(Path::new("/t")).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            entries,
            vec![
                DirEntry::new("README.md", EntryType::File),
                DirEntry::new("src", EntryType::Directory),
            ]
        );
    }

    #[test]
    fn writes_need_a_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_atomic(Path::new("/nope/file"), b"x").is_err());
        fs.create_dir_all(Path::new("/yes")).unwrap();
        fs.write_atomic(Path::new("/yes/file"), b"x").unwrap();
        assert_eq!(fs.read_file("/yes/file").as_deref(), Some("x"));
    }

    #[test]
    fn injected_failures_hit_matching_names_only() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out")).unwrap();
        fs.fail_writes_to("b.txt");
        fs.write_atomic(Path::new("/out/a.txt"), b"a").unwrap();
        assert!(fs.write_atomic(Path::new("/out/b.txt"), b"b").is_err());
        assert_eq!(fs.write_log(), vec![PathBuf::from("/out/a.txt")]);
    }

    #[test]
    fn copy_carries_executable_flag() {
        let fs = MemoryFilesystem::new();
        fs.add_executable("/t/run.sh", "#!/bin/sh");
        fs.create_dir_all(Path::new("/out")).unwrap();
        fs.copy_file(Path::new("/t/run.sh"), Path::new("/out/run.sh"))
            .unwrap();
        assert!(fs.is_executable("/out/run.sh"));
    }

    #[test]
    fn overwriting_keeps_executable_flag() {
        let fs = MemoryFilesystem::new();
        fs.add_executable("/out/run.sh", "old");
        fs.write_atomic(Path::new("/out/run.sh"), b"new").unwrap();
        assert!(fs.is_executable("/out/run.sh"));
    }

    #[test]
    fn set_executable_needs_an_existing_file() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/out/run.sh", "x");

        fs.set_executable(Path::new("/out/run.sh")).unwrap();
        assert!(fs.is_executable("/out/run.sh"));
        assert!(fs.set_executable(Path::new("/out/missing.sh")).is_err());
    }

    #[test]
    fn remove_dir_all_drops_subtree() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/r/a/b.txt", "x");
        fs.add_file("/r/keep.txt", "y");
        fs.remove_dir_all(Path::new("/r/a")).unwrap();
        assert!(!fs.exists(Path::new("/r/a")));
        assert!(!fs.exists(Path::new("/r/a/b.txt")));
        assert!(fs.exists(Path::new("/r/keep.txt")));
    }
}
