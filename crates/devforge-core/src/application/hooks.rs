//! Dispatch of the two render extension points.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::ApplicationError;
use crate::application::ports::{PostRenderHook, PreRenderHook};
use crate::domain::RenderConfig;
use crate::error::ForgeResult;

/// Registered hooks, run in registration order.
///
/// Cheap to clone; hooks are shared.
#[derive(Clone, Default)]
pub struct HookDispatcher {
    pre: Vec<Arc<dyn PreRenderHook>>,
    post: Vec<Arc<dyn PostRenderHook>>,
}

impl HookDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_pre(&mut self, hook: Arc<dyn PreRenderHook>) {
        self.pre.push(hook);
    }

    pub fn register_post(&mut self, hook: Arc<dyn PostRenderHook>) {
        self.post.push(hook);
    }

    #[must_use]
    pub fn with_pre(mut self, hook: Arc<dyn PreRenderHook>) -> Self {
        self.register_pre(hook);
        self
    }

    #[must_use]
    pub fn with_post(mut self, hook: Arc<dyn PostRenderHook>) -> Self {
        self.register_post(hook);
        self
    }

    pub fn pre_hook_names(&self) -> Vec<&str> {
        self.pre.iter().map(|h| h.name()).collect()
    }

    pub fn post_hook_names(&self) -> Vec<&str> {
        self.post.iter().map(|h| h.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }

    /// Run every pre-render hook against `config`.
    ///
    /// Each hook sees the caller's configuration, not its predecessors'
    /// output. Results are merged over `config` in registration order, so
    /// later hooks win on conflicting keys. The first failure aborts.
    pub fn run_pre(&self, config: &RenderConfig) -> ForgeResult<RenderConfig> {
        let mut merged = config.clone();
        for hook in &self.pre {
            debug!(hook = hook.name(), "running pre-render hook");
            let partial = hook
                .before_create(config)
                .map_err(|e| ApplicationError::HookFailed {
                    hook: hook.name().to_string(),
                    reason: e.to_string(),
                })?;
            merged = merged.merged(partial);
        }
        Ok(merged)
    }

    /// Run every post-render hook. Failures are logged and otherwise ignored.
    pub fn run_post(&self, output_root: &Path, config: &RenderConfig) {
        for hook in &self.post {
            debug!(hook = hook.name(), "running post-render hook");
            if let Err(e) = hook.after_create(output_root, config) {
                warn!(hook = hook.name(), error = %e, "post-render hook failed");
            }
        }
    }
}

impl fmt::Debug for HookDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDispatcher")
            .field("pre", &self.pre_hook_names())
            .field("post", &self.post_hook_names())
            .finish()
    }
}
