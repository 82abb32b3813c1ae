//! Application layer for DevForge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (TemplateRenderer, TemplateService,
//!   ExtractService, VariableResolver)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Hooks**: Dispatch of the pre/post render extension points
//! - **Walk**: The one tree walk every service uses
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod hooks;
pub mod locks;
pub mod paths;
pub mod ports;
pub mod services;
pub mod walk;

// Re-export main services
pub use services::{
    DEFAULT_PLACEHOLDER, ExtractOptions, ExtractReport, ExtractService, RenderReport,
    TemplateRenderer, TemplateService, VariableResolver,
};

pub use hooks::HookDispatcher;
pub use locks::{OutputLock, OutputLocks};
pub use walk::{FileVisit, TreeVisitor, copy_tree, walk_tree};

pub use error::ApplicationError;
