//! DevForge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the DevForge
//! project scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           devforge-cli (CLI)            │
//! │     (Builds config, hooks, adapters)    │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (TemplateRenderer, TemplateService,    │
//! │   ExtractService, HookDispatcher)       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, TemplateStore, Pre/Post    │
//! │  render hooks)                          │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    devforge-adapters (Infrastructure)   │
//! │ (LocalFilesystem, DirectoryStore, ...)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (RenderConfig, syntax evaluator, name   │
//! │  validation, entry classification)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use devforge_core::prelude::*;
//!
//! # fn demo(store: Arc<dyn TemplateStore>, fs: Arc<dyn Filesystem>) -> ForgeResult<()> {
//! // 1. Validate the project name before touching the disk
//! validate_project_name("my-app")?;
//!
//! // 2. Resolve the variables used by the template
//! let config = VariableResolver::new("my-app").resolve();
//!
//! // 3. Render with injected adapters
//! let renderer = TemplateRenderer::new(store, fs, HookDispatcher::new());
//! let report = renderer.render("node-typescript", "./my-app", config)?;
//! println!("{} files written", report.file_count());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ExtractOptions, ExtractService, HookDispatcher, RenderReport, TemplateRenderer,
        TemplateService, VariableResolver,
        ports::{
            DirEntry, EntryType, Filesystem, HookResult, PostRenderHook, PreRenderHook,
            TemplateStore, TemplateSummary,
        },
    };
    pub use crate::domain::{
        DYNAMIC_SUFFIX, EntryKind, RelativePath, RenderConfig, TemplateManifest, TemplateName,
        validate_project_name,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
