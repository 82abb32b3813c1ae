//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `devforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateStore`: Template registry
//!   - `PathFilter`: Ignore rules for tree walks
//!   - `PreRenderHook` / `PostRenderHook`: Render extension points
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    DirEntry, EntryType, Filesystem, HookResult, KeepAll, PathFilter, PostRenderHook,
    PreRenderHook, TemplateStore, TemplateSummary,
};
