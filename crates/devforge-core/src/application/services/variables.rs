//! Builds the [`RenderConfig`] for a render from layered sources.

use serde_json::Value;

use crate::domain::{DomainError, RenderConfig, keys};

/// Layered variable sources, lowest priority first:
/// built-in defaults, configured defaults, explicit values, `--set` pairs.
/// `projectName` always ends up as the project name given to [`new`].
///
/// [`new`]: VariableResolver::new
#[derive(Debug, Clone)]
pub struct VariableResolver {
    project_name: String,
    configured: RenderConfig,
    explicit: RenderConfig,
    overrides: RenderConfig,
}

impl VariableResolver {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            configured: RenderConfig::new(),
            explicit: RenderConfig::new(),
            overrides: RenderConfig::new(),
        }
    }

    /// Defaults from the application configuration. Empty strings are
    /// treated as unset so they don't shadow built-ins.
    #[must_use]
    pub fn configured_default(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.configured.insert(key, value);
        }
        self
    }

    /// A value given explicitly for this render, e.g. a command-line flag.
    #[must_use]
    pub fn explicit(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.explicit.insert(key, value);
        self
    }

    /// Like [`explicit`](Self::explicit) but skips `None`.
    #[must_use]
    pub fn explicit_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.explicit(key, value),
            None => self,
        }
    }

    /// A free-form `KEY=VALUE` assignment.
    pub fn assign(mut self, assignment: &str) -> Result<Self, DomainError> {
        let (key, value) = parse_assignment(assignment)?;
        self.overrides.insert(key, value);
        Ok(self)
    }

    pub fn resolve(self) -> RenderConfig {
        builtin_defaults()
            .merged(self.configured)
            .merged(self.explicit)
            .merged(self.overrides)
            .with(keys::PROJECT_NAME, self.project_name)
    }
}

/// Built-in values for the recognised keys.
pub fn builtin_defaults() -> RenderConfig {
    RenderConfig::new()
        .with(keys::DESCRIPTION, "A new DevForge project")
        .with(keys::AUTHOR, "")
        .with(keys::LICENSE, "MIT")
        .with(keys::TYPESCRIPT, false)
        .with(keys::TESTING, false)
        .with(keys::CI, false)
}

/// Split `key=value`, typing the value as bool, then integer, then string.
pub fn parse_assignment(input: &str) -> Result<(String, Value), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidAssignment {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| invalid("expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(invalid("key cannot be empty"));
    }
    if key.contains('.') {
        return Err(invalid("nested keys are not supported"));
    }

    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
    };
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builtins_fill_recognised_keys() {
        let config = VariableResolver::new("demo").resolve();
        assert_eq!(config.project_name(), Some("demo"));
        assert_eq!(config.get("description"), Some(&json!("A new DevForge project")));
        assert_eq!(config.get("license"), Some(&json!("MIT")));
        assert_eq!(config.get("typescript"), Some(&json!(false)));
        assert_eq!(config.get("author"), Some(&json!("")));
    }

    #[test]
    fn layers_apply_in_priority_order() {
        let config = VariableResolver::new("demo")
            .configured_default("author", Some("Config Author"))
            .configured_default("license", Some("ISC"))
            .explicit("license", "Apache-2.0")
            .assign("license=BSD-3-Clause")
            .unwrap()
            .resolve();
        assert_eq!(config.get_str("author"), Some("Config Author"));
        assert_eq!(config.get_str("license"), Some("BSD-3-Clause"));
    }

    #[test]
    fn empty_configured_defaults_are_ignored() {
        let config = VariableResolver::new("demo")
            .configured_default("license", Some(""))
            .configured_default("author", None)
            .resolve();
        assert_eq!(config.get_str("license"), Some("MIT"));
    }

    #[test]
    fn project_name_cannot_be_overridden() {
        let config = VariableResolver::new("demo")
            .assign("projectName=other")
            .unwrap()
            .resolve();
        assert_eq!(config.project_name(), Some("demo"));
    }

    #[test]
    fn assignments_are_typed() {
        assert_eq!(parse_assignment("ci=true").unwrap().1, json!(true));
        assert_eq!(parse_assignment("port=8080").unwrap().1, json!(8080));
        assert_eq!(parse_assignment("name=a=b").unwrap().1, json!("a=b"));
        assert_eq!(parse_assignment("empty=").unwrap().1, json!(""));
        assert_eq!(parse_assignment("v=1.5").unwrap().1, json!("1.5"));
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        for bad in ["novalue", "=x", " =x", "a.b=c"] {
            assert!(
                matches!(parse_assignment(bad), Err(DomainError::InvalidAssignment { .. })),
                "accepted {bad:?}"
            );
        }
    }
}
