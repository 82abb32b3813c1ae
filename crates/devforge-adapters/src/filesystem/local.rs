//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::Path;

use tracing::trace;

use devforge_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, EntryType, Filesystem},
    },
    error::{ForgeError, ForgeResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_dir(&self, path: &Path) -> ForgeResult<Vec<DirEntry>> {
        let reader = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;

        let mut entries = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|e| map_io_error(path, e, "read directory"))?;
            let (name, utf8) = match entry.file_name().into_string() {
                Ok(name) => (name, true),
                Err(raw) => (raw.to_string_lossy().into_owned(), false),
            };
            let kind = if utf8 {
                entry_type(&entry.path())
            } else {
                EntryType::Unreadable
            };
            trace!(name = %name, ?kind, "entry");
            entries.push(DirEntry { name, kind });
        }
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> ForgeResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> ForgeResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let existing = std::fs::metadata(path).ok().map(|meta| meta.permissions());

        let mut temp = temp_builder()
            .tempfile_in(dir)
            .map_err(|e| map_io_error(path, e, "create temp file"))?;
        temp.write_all(contents)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| map_io_error(path, e, "write file"))?;
        temp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;

        if let Some(permissions) = existing {
            std::fs::set_permissions(path, permissions)
                .map_err(|e| map_io_error(path, e, "restore permissions"))?;
        }
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> ForgeResult<()> {
        // std::fs::copy carries permission bits, executable bits included.
        std::fs::copy(from, to).map_err(|e| map_io_error(to, e, "copy file"))?;
        Ok(())
    }

    #[cfg(unix)]
    fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_executable(&self, _path: &Path) -> bool {
        false
    }

    #[cfg(unix)]
    fn set_executable(&self, path: &Path) -> ForgeResult<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut permissions = std::fs::metadata(path)
            .map_err(|e| map_io_error(path, e, "stat file"))?
            .permissions();
        let mode = permissions.mode();
        // Like `chmod +x` under a umask.
        permissions.set_mode(mode | ((mode & 0o444) >> 2));
        std::fs::set_permissions(path, permissions)
            .map_err(|e| map_io_error(path, e, "set permissions"))
    }

    #[cfg(not(unix))]
    fn set_executable(&self, _path: &Path) -> ForgeResult<()> {
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

/// Follows symlinks. A link whose target is missing is `Unreadable`.
fn entry_type(path: &Path) -> EntryType {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => EntryType::Directory,
        Ok(meta) if meta.is_file() => EntryType::File,
        Ok(_) => EntryType::Other,
        Err(_) if std::fs::symlink_metadata(path).is_ok() => EntryType::Unreadable,
        Err(_) => EntryType::Other,
    }
}

/// Temp files default to 0600. New files ask for 0666 instead, which
/// `open(2)` narrows by the process umask.
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ForgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let fs = LocalFilesystem::new();

        fs.write_atomic(&path, b"first").unwrap();
        fs.write_atomic(&path, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "temp file left behind");
    }

    #[test]
    fn write_atomic_fails_without_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = LocalFilesystem::new().write_atomic(&path, b"x").unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn read_dir_classifies_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("file.txt"), "x").unwrap();

        let mut entries = LocalFilesystem::new().read_dir(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            entries,
            vec![
                DirEntry::new("file.txt", EntryType::File),
                DirEntry::new("sub", EntryType::Directory),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlinks_are_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("link")).unwrap();

        let entries = LocalFilesystem::new().read_dir(dir.path()).unwrap();
        assert_eq!(entries, vec![DirEntry::new("link", EntryType::Unreadable)]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_unreadable() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.txt")), "x").unwrap();

        let entries = LocalFilesystem::new().read_dir(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryType::Unreadable);
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_keeps_mode_of_replaced_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.sh");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o750)).unwrap();

        LocalFilesystem::new().write_atomic(&path, b"new").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn new_files_are_not_private_temp_files() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, "x").unwrap();
        let expected = std::fs::metadata(&plain).unwrap().permissions().mode() & 0o777;

        let written = dir.path().join("written.txt");
        LocalFilesystem::new().write_atomic(&written, b"x").unwrap();

        let mode = std::fs::metadata(&written).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected);
    }

    #[cfg(unix)]
    #[test]
    fn set_executable_follows_read_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("run.sh.hbs");
        let dest = dir.path().join("run.sh");
        std::fs::write(&source, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&source, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::fs::write(&dest, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&dest, std::fs::Permissions::from_mode(0o640)).unwrap();

        let fs = LocalFilesystem::new();
        assert!(fs.is_executable(&source));
        assert!(!fs.is_executable(&dest));
        assert!(!fs.is_executable(dir.path()));
        fs.set_executable(&dest).unwrap();

        let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[cfg(unix)]
    #[test]
    fn copy_preserves_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("hook.sh");
        let to = dir.path().join("copy.sh");
        std::fs::write(&from, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&from, std::fs::Permissions::from_mode(0o755)).unwrap();

        LocalFilesystem::new().copy_file(&from, &to).unwrap();

        let mode = std::fs::metadata(&to).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
