//! Project-name validation.
//!
//! A project name becomes a directory name, a package manifest `name` and a
//! path component under version control, so it has to satisfy all three at
//! once. Rules are checked in a fixed order and the first violation wins.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

/// Longest name accepted by npm.
pub const MAX_NAME_LEN: usize = 214;

const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const RESERVED_NAMES: &[&str] = &[
    "node_modules",
    "favicon.ico",
    "con",
    "prn",
    "aux",
    "nul",
    "com1",
    "com2",
    "com3",
    "com4",
    "com5",
    "com6",
    "com7",
    "com8",
    "com9",
    "lpt1",
    "lpt2",
    "lpt3",
    "lpt4",
    "lpt5",
    "lpt6",
    "lpt7",
    "lpt8",
    "lpt9",
];

static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@[a-z0-9\-*~][a-z0-9\-*._~]*/)?[a-z0-9\-~][a-z0-9\-._~]*$")
        .expect("package name pattern is valid")
});

/// The first rule a rejected name broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameViolation {
    Empty,
    TooLong,
    InvalidCharacters,
    LeadingDotOrUnderscore,
    TrailingDot,
    Reserved,
    NotPackageName,
}

impl NameViolation {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Empty => "Project name cannot be empty",
            Self::TooLong => "Project name cannot be longer than 214 characters",
            Self::InvalidCharacters => "Project name contains invalid characters",
            Self::LeadingDotOrUnderscore => "Project name cannot start with a dot or underscore",
            Self::TrailingDot => "Project name cannot end with a dot",
            Self::Reserved => "Project name is a reserved name",
            Self::NotPackageName => "Project name must follow npm naming conventions",
        }
    }
}

impl fmt::Display for NameViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Check `name` against every rule, returning the first violation.
pub fn check_project_name(name: &str) -> Result<(), NameViolation> {
    if name.trim().is_empty() {
        return Err(NameViolation::Empty);
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(NameViolation::TooLong);
    }

    if name
        .chars()
        .any(|c| c.is_control() || FORBIDDEN_CHARS.contains(&c))
    {
        return Err(NameViolation::InvalidCharacters);
    }

    if name.starts_with('.') || name.starts_with('_') {
        return Err(NameViolation::LeadingDotOrUnderscore);
    }

    if name.ends_with('.') {
        return Err(NameViolation::TrailingDot);
    }

    let lowered = name.to_lowercase();
    if RESERVED_NAMES.contains(&lowered.as_str()) {
        return Err(NameViolation::Reserved);
    }

    if !PACKAGE_NAME.is_match(name) {
        return Err(NameViolation::NotPackageName);
    }

    Ok(())
}

/// Validate a project name, wrapping the violation in a [`DomainError`].
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    check_project_name(name).map_err(|violation| DomainError::InvalidProjectName {
        name: name.to_string(),
        violation,
    })
}
