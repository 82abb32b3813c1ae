//! Templates as the renderer sees them: a name, a tree of entries, and an
//! optional manifest.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DomainError;
use super::common::is_safe_component;

/// File-name suffix marking a file whose contents are evaluated.
pub const DYNAMIC_SUFFIX: &str = ".hbs";

/// Registry metadata file at a template root. Never rendered.
pub const MANIFEST_FILE: &str = "template.json";

/// Name of a template inside the registry.
///
/// Invariant: a single safe path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateName(String);

impl TemplateName {
    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTemplateName {
                name,
                reason: "name cannot be empty".into(),
            });
        }
        if trimmed != name || !is_safe_component(&name) {
            return Err(DomainError::InvalidTemplateName {
                name,
                reason: "name must be a single directory name".into(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TemplateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How a template file is turned into output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Contents evaluated, suffix stripped from the output name.
    Dynamic,
    /// Bytes copied verbatim under the same name.
    Static,
}

impl EntryKind {
    pub fn classify(file_name: &str) -> Self {
        if is_dynamic(file_name) {
            Self::Dynamic
        } else {
            Self::Static
        }
    }
}

fn is_dynamic(file_name: &str) -> bool {
    file_name.len() > DYNAMIC_SUFFIX.len() && file_name.ends_with(DYNAMIC_SUFFIX)
}

/// Output file name for a template file name.
///
/// A bare `.hbs` has nothing left after stripping and is treated as static.
pub fn output_name(file_name: &str) -> &str {
    if is_dynamic(file_name) {
        &file_name[..file_name.len() - DYNAMIC_SUFFIX.len()]
    } else {
        file_name
    }
}

/// Contents of `template.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateManifest {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
    pub created: Option<DateTime<Utc>>,
    pub files: Vec<String>,
}

impl TemplateManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "1.0.0".into(),
            created: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text).map_err(|e| DomainError::InvalidManifest(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(self).map_err(|e| DomainError::InvalidManifest(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_suffix() {
        assert_eq!(EntryKind::classify("package.json.hbs"), EntryKind::Dynamic);
        assert_eq!(EntryKind::classify("logo.png"), EntryKind::Static);
        assert_eq!(EntryKind::classify("notes.hbs.txt"), EntryKind::Static);
        assert_eq!(EntryKind::classify(".hbs"), EntryKind::Static);
    }

    #[test]
    fn strips_only_the_marker() {
        assert_eq!(output_name("package.json.hbs"), "package.json");
        assert_eq!(output_name("a.hbs.hbs"), "a.hbs");
        assert_eq!(output_name("README.md"), "README.md");
    }

    #[test]
    fn template_names_are_single_components() {
        assert!(TemplateName::parse("node-typescript").is_ok());
        for bad in ["", "  ", "..", "a/b", "a\\b", " padded "] {
            assert!(TemplateName::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn manifest_tolerates_missing_fields() {
        let manifest = TemplateManifest::from_json(r#"{"description":"Node starter"}"#).unwrap();
        assert_eq!(manifest.description.as_deref(), Some("Node starter"));
        assert!(manifest.files.is_empty());
        assert!(manifest.created.is_none());
    }

    #[test]
    fn manifest_reads_iso_timestamps() {
        let manifest = TemplateManifest::from_json(
            r#"{"name":"x","version":"1.0.0","created":"2024-05-01T12:00:00.000Z","files":["package.json"]}"#,
        )
        .unwrap();
        assert!(manifest.created.is_some());
        assert_eq!(manifest.files, vec!["package.json".to_string()]);
    }

    #[test]
    fn manifest_rejects_garbage() {
        assert!(matches!(
            TemplateManifest::from_json("not json"),
            Err(DomainError::InvalidManifest(_))
        ));
    }
}
