use std::path::{Component, Path, PathBuf};

use crate::application::ApplicationError;
use crate::error::ForgeResult;

/// Absolute form of `path` with `.` and `..` resolved lexically.
///
/// Symlinks are not followed, and the path does not need to exist.
pub fn absolute_normalized(path: &Path) -> ForgeResult<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| ApplicationError::filesystem(path, e))?;
    Ok(normalize(&absolute))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Last component of `path` once made absolute, e.g. the directory name of `.`.
pub fn base_name(path: &Path) -> ForgeResult<Option<String>> {
    let absolute = absolute_normalized(path)?;
    Ok(absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_dots_lexically() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn equivalent_spellings_normalize_equal() {
        let a = absolute_normalized(Path::new("out/app")).unwrap();
        let b = absolute_normalized(Path::new("./out/x/../app/")).unwrap();
        assert_eq!(a, b);
        assert!(a.is_absolute());
    }

    #[test]
    fn base_name_of_current_dir() {
        let name = base_name(Path::new(".")).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            name.as_deref(),
            cwd.file_name().map(|n| n.to_str().unwrap())
        );
    }
}
