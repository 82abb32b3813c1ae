//! `.gitignore`-style rules used when extracting a template from a project.

use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use thiserror::Error;
use tracing::debug;

use devforge_core::{
    application::ports::{Filesystem, PathFilter},
    domain::RelativePath,
    error::{ForgeError, ForgeResult},
};

/// Names skipped at any depth, whatever `.gitignore` says.
pub const ALWAYS_IGNORED: &[&str] = &["node_modules", ".git", "dist", "build", "coverage", "target"];

#[derive(Debug, Error)]
pub enum IgnoreError {
    #[error("invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to build ignore rules: {0}")]
    Build(#[from] globset::Error),
}

impl From<IgnoreError> for ForgeError {
    fn from(err: IgnoreError) -> Self {
        ForgeError::Configuration {
            message: err.to_string(),
        }
    }
}

/// Compiled ignore rules.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    /// Patterns matching files and directories.
    any: GlobSet,
    /// Patterns written with a trailing `/`.
    dirs_only: GlobSet,
    patterns: usize,
}

impl IgnoreRules {
    /// Only the [`ALWAYS_IGNORED`] names.
    pub fn builtin() -> Self {
        Self {
            any: GlobSet::empty(),
            dirs_only: GlobSet::empty(),
            patterns: 0,
        }
    }

    /// Rules from `.gitignore` text.
    ///
    /// Blank lines and `#` comments are skipped. Negations (`!pattern`) are
    /// not supported and skipped. A pattern containing `/` is anchored to
    /// the source root; otherwise it matches a name at any depth.
    pub fn parse(text: &str) -> Result<Self, IgnoreError> {
        let mut any = GlobSetBuilder::new();
        let mut dirs_only = GlobSetBuilder::new();
        let mut patterns = 0;

        for line in text.lines() {
            let Some(rule) = Rule::parse(line) else {
                continue;
            };
            let glob = GlobBuilder::new(&rule.glob)
                .literal_separator(true)
                .build()
                .map_err(|source| IgnoreError::Pattern {
                    pattern: line.to_string(),
                    source,
                })?;
            if rule.dir_only {
                dirs_only.add(glob);
            } else {
                any.add(glob);
            }
            patterns += 1;
        }

        Ok(Self {
            any: any.build()?,
            dirs_only: dirs_only.build()?,
            patterns,
        })
    }

    /// Rules for a source directory: its `.gitignore` if present, else
    /// just the built-ins.
    pub fn load(fs: &dyn Filesystem, source: &Path) -> ForgeResult<Self> {
        let gitignore = source.join(".gitignore");
        if !fs.exists(&gitignore) {
            return Ok(Self::builtin());
        }
        let rules = Self::parse(&fs.read_to_string(&gitignore)?)?;
        debug!(patterns = rules.patterns, "loaded .gitignore");
        Ok(rules)
    }

    /// Number of patterns taken from `.gitignore`.
    pub fn pattern_count(&self) -> usize {
        self.patterns
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PathFilter for IgnoreRules {
    fn is_ignored(&self, relative: &RelativePath, is_dir: bool) -> bool {
        let builtin = relative
            .as_path()
            .components()
            .any(|c| ALWAYS_IGNORED.iter().any(|name| c.as_os_str() == *name));
        if builtin {
            return true;
        }

        let path = relative.to_string();
        self.any.is_match(&path) || (is_dir && self.dirs_only.is_match(&path))
    }
}

struct Rule {
    glob: String,
    dir_only: bool,
}

impl Rule {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        if line.starts_with('!') {
            debug!(pattern = line, "negated ignore patterns are not supported");
            return None;
        }

        let dir_only = line.ends_with('/');
        let pattern = line.trim_end_matches('/');
        let anchored = pattern.contains('/');
        let pattern = pattern.trim_start_matches('/');
        if pattern.is_empty() {
            return None;
        }

        let glob = if anchored {
            pattern.to_string()
        } else {
            format!("**/{pattern}")
        };
        Some(Self { glob, dir_only })
    }
}
