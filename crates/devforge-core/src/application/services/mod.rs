//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "render a template" or "extract a template".

pub mod extract_service;
pub mod render_service;
pub mod template_service;
pub mod variables;

pub use extract_service::{DEFAULT_PLACEHOLDER, ExtractOptions, ExtractReport, ExtractService};
pub use render_service::{RenderReport, TemplateRenderer};
pub use template_service::TemplateService;
pub use variables::{VariableResolver, builtin_defaults, parse_assignment};
