//! The variables a template is rendered with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys the bundled templates and built-in hooks understand.
pub mod keys {
    pub const PROJECT_NAME: &str = "projectName";
    pub const DESCRIPTION: &str = "description";
    pub const AUTHOR: &str = "author";
    pub const LICENSE: &str = "license";
    pub const TYPESCRIPT: &str = "typescript";
    pub const TESTING: &str = "testing";
    pub const CI: &str = "ci";
}

/// Mapping from variable name to JSON-like value.
///
/// A render never mutates the configuration it was given; hooks produce new
/// values that are merged into a copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderConfig(Map<String, Value>);

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Top-level string value, if the key holds a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn project_name(&self) -> Option<&str> {
        self.get_str(keys::PROJECT_NAME)
    }

    /// Resolve a dotted path.
    ///
    /// Segments walk nested mappings; numeric segments index lists.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Truthiness of the value at `path`; absent paths are falsy.
    pub fn is_truthy(&self, path: &str) -> bool {
        self.lookup(path).is_some_and(is_truthy)
    }

    /// Shallow merge: every key of `other` overwrites the key here.
    #[must_use]
    pub fn merged(mut self, other: RenderConfig) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RenderConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RenderConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Truthiness used by `#if` / `#unless`.
///
/// Falsy: null, `false`, zero, empty string, empty list. Mappings are
/// always truthy, including empty ones.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Text form of a value when substituted into output.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}
