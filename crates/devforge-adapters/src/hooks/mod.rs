//! Built-in render hooks.
//!
//! Hooks are compiled in and enabled by name; nothing is loaded at runtime.

mod defaults;
mod readme_notes;

pub use defaults::DefaultsHook;
pub use readme_notes::{ReadmeNotesHook, getting_started};

use std::sync::Arc;

use serde::Serialize;

use devforge_core::{
    application::{HookDispatcher, ports::Filesystem},
    domain::RenderConfig,
    error::{ForgeError, ForgeResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookStage {
    PreRender,
    PostRender,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::PreRender => "pre-render",
            Self::PostRender => "post-render",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HookInfo {
    pub name: &'static str,
    pub stage: HookStage,
    pub description: &'static str,
}

/// Every hook that can be enabled.
pub const BUILTIN_HOOKS: &[HookInfo] = &[
    HookInfo {
        name: DefaultsHook::NAME,
        stage: HookStage::PreRender,
        description: "Fill empty variables from configured defaults",
    },
    HookInfo {
        name: ReadmeNotesHook::NAME,
        stage: HookStage::PostRender,
        description: "Append a Getting started section to README.md",
    },
];

pub fn find_hook(name: &str) -> Option<&'static HookInfo> {
    BUILTIN_HOOKS.iter().find(|h| h.name == name)
}

/// Build a dispatcher with the named hooks, in the order given.
///
/// `fallbacks` feeds the `defaults` hook. Unknown names are an error.
pub fn build_dispatcher(
    enabled: &[String],
    fs: Arc<dyn Filesystem>,
    fallbacks: RenderConfig,
) -> ForgeResult<HookDispatcher> {
    let mut dispatcher = HookDispatcher::new();
    for name in enabled {
        match name.as_str() {
            DefaultsHook::NAME => {
                dispatcher.register_pre(Arc::new(DefaultsHook::new(fallbacks.clone())))
            }
            ReadmeNotesHook::NAME => {
                dispatcher.register_post(Arc::new(ReadmeNotesHook::new(Arc::clone(&fs))))
            }
            other => {
                return Err(ForgeError::Configuration {
                    message: format!(
                        "unknown plugin '{}', available: {}",
                        other,
                        BUILTIN_HOOKS
                            .iter()
                            .map(|h| h.name)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                });
            }
        }
    }
    Ok(dispatcher)
}
