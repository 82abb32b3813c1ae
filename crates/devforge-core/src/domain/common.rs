use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Serialize, Serializer};

use super::DomainError;

/// A template-relative path that can never leave its root.
///
/// Invariant: never absolute and never contains `..`. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// The empty path, naming the root itself.
    pub fn root() -> Self {
        Self(PathBuf::new())
    }

    /// Fallible constructor. `.` components are dropped.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let mut clean = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => clean.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::PathEscapesRoot {
                        path: path.display().to_string(),
                    });
                }
            }
        }
        Ok(Self(clean))
    }

    /// Join a single name, rejecting anything that is not one safe component.
    pub fn join(&self, name: &str) -> Result<Self, DomainError> {
        if !is_safe_component(name) {
            return Err(DomainError::UnsafeEntryName {
                name: name.to_string(),
            });
        }
        Ok(Self(self.0.join(name)))
    }

    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Number of components below the root.
    pub fn depth(&self) -> usize {
        self.0.components().count()
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolve against `root`; the result is always below `root`.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Forward slashes on every platform so reports and logs are stable.
        let mut first = true;
        for component in self.0.components() {
            if !first {
                f.write_str("/")?;
            }
            first = false;
            write!(f, "{}", component.as_os_str().to_string_lossy())?;
        }
        Ok(())
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// True when `name` is usable as exactly one path component.
pub fn is_safe_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_parent_components() {
        assert!(RelativePath::try_new("a/../b").is_err());
        assert!(RelativePath::try_new("../x").is_err());
    }

    #[test]
    fn rejects_absolute_paths() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
    }

    #[test]
    fn drops_current_dir_components() {
        let path = RelativePath::try_new("./src/./lib").unwrap();
        assert_eq!(path.to_string(), "src/lib");
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn join_accepts_plain_names_only() {
        let base = RelativePath::root();
        assert!(base.is_root());

        let src = base.join("src").unwrap();
        assert_eq!(src.join("index.ts").unwrap().to_string(), "src/index.ts");

        for bad in ["", ".", "..", "a/b", "a\\b", "nul\0"] {
            assert!(src.join(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn under_stays_below_root() {
        let path = RelativePath::try_new("src/main.rs").unwrap();
        let root = Path::new("/out");
        assert!(path.under(root).starts_with(root));
    }
}
