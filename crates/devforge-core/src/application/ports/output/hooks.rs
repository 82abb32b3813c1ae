use std::path::Path;

use crate::domain::RenderConfig;

/// Result type returned by hooks.
///
/// Hooks are third-party-shaped code, so they report with any error type.
pub type HookResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Runs before anything is written.
///
/// Returns the keys it wants to set; the dispatcher merges them over the
/// caller's configuration.
pub trait PreRenderHook: Send + Sync {
    fn name(&self) -> &str;

    fn before_create(&self, config: &RenderConfig) -> HookResult<RenderConfig>;
}

/// Runs after the tree has been written. Side effects only.
pub trait PostRenderHook: Send + Sync {
    fn name(&self) -> &str;

    fn after_create(&self, output_root: &Path, config: &RenderConfig) -> HookResult<()>;
}
