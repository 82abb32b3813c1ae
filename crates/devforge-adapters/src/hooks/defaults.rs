use serde_json::Value;

use devforge_core::{
    application::ports::{HookResult, PreRenderHook},
    domain::RenderConfig,
};

/// Fills keys that are missing or empty with fallback values.
///
/// Never touches a key that already has a non-empty value.
#[derive(Debug, Clone, Default)]
pub struct DefaultsHook {
    fallbacks: RenderConfig,
}

impl DefaultsHook {
    pub const NAME: &'static str = "defaults";

    pub fn new(fallbacks: RenderConfig) -> Self {
        Self { fallbacks }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

impl PreRenderHook for DefaultsHook {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn before_create(&self, config: &RenderConfig) -> HookResult<RenderConfig> {
        Ok(self
            .fallbacks
            .iter()
            .filter(|(key, _)| is_blank(config.get(key)))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn fills_only_blank_keys() {
        let hook = DefaultsHook::new(
            RenderConfig::new()
                .with("author", "Fallback Author")
                .with("license", "ISC")
                .with("repository", "https://example.invalid/repo"),
        );
        let config = RenderConfig::new()
            .with("author", "  ")
            .with("license", "MIT");

        let partial = hook.before_create(&config).unwrap();

        assert_eq!(partial.get("author"), Some(&json!("Fallback Author")));
        assert_eq!(partial.get("repository"), Some(&json!("https://example.invalid/repo")));
        assert!(!partial.contains_key("license"));
    }

    #[test]
    fn false_is_not_blank() {
        let hook = DefaultsHook::new(RenderConfig::new().with("ci", true));
        let partial = hook
            .before_create(&RenderConfig::new().with("ci", false))
            .unwrap();
        assert!(partial.is_empty());
    }
}
