//! The substitution language used inside `.hbs` files and entry names.
//!
//! Four constructs, nothing else:
//!
//! - `{{path}}` inserts a value (dotted paths walk mappings and lists)
//! - `{{#if path}}...{{else}}...{{/if}}`
//! - `{{#unless path}}...{{else}}...{{/unless}}`
//! - `{{kebabCase arg}}` / `{{camelCase arg}}`, `arg` being a path or a
//!   quoted literal
//!
//! Output is never HTML-escaped. A block tag alone on its line removes the
//! line. Anything outside the grammar is a [`DomainError::MalformedTemplate`]
//! with the line and column of the offending tag.

mod eval;
mod helpers;
mod lexer;
mod parser;

pub use helpers::{Helper, camel_case, kebab_case};

use crate::domain::{DomainError, RenderConfig};

/// A parsed template body, reusable across configurations.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    nodes: Vec<parser::Node>,
}

impl CompiledTemplate {
    pub fn compile(source: &str) -> Result<Self, DomainError> {
        Ok(Self {
            nodes: parser::parse(source)?,
        })
    }

    pub fn render(&self, config: &RenderConfig) -> String {
        let mut out = String::new();
        eval::render_nodes(&self.nodes, config, &mut out);
        out
    }
}

/// Compile and render in one step.
pub fn render_str(source: &str, config: &RenderConfig) -> Result<String, DomainError> {
    Ok(CompiledTemplate::compile(source)?.render(config))
}

/// True when `text` contains anything the evaluator would act on.
pub fn has_expressions(text: &str) -> bool {
    text.contains("{{")
}
