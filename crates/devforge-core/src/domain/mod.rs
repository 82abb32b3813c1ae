// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for DevForge.
//!
//! Pure logic only: project-name rules, the render configuration, template
//! entry classification, and the substitution language. All I/O goes
//! through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: No filesystem, network, or process calls
//! - **Immutable values**: domain objects are Clone + PartialEq
//! - **Errors carry positions**: malformed templates report line and column

pub mod common;
pub mod error;
pub mod project_name;
pub mod render_config;
pub mod syntax;
pub mod template;

pub use common::{RelativePath, is_safe_component};
pub use error::DomainError;
pub use project_name::{MAX_NAME_LEN, NameViolation, check_project_name, validate_project_name};
pub use render_config::{RenderConfig, display_value, is_truthy, keys};
pub use syntax::{CompiledTemplate, render_str};
pub use template::{
    DYNAMIC_SUFFIX, EntryKind, MANIFEST_FILE, TemplateManifest, TemplateName, output_name,
};
