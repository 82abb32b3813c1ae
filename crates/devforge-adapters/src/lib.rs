//! Infrastructure adapters for DevForge.
//!
//! This crate implements the ports defined in `devforge-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod hooks;
pub mod ignore;
pub mod store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use hooks::{BUILTIN_HOOKS, DefaultsHook, HookInfo, HookStage, ReadmeNotesHook, build_dispatcher};
pub use ignore::IgnoreRules;
pub use store::{BUNDLED_TEMPLATES, DirectoryStore, install_bundled};
