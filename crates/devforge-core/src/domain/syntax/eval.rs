use super::parser::{Arg, BlockKind, Node};
use crate::domain::render_config::{RenderConfig, display_value};

pub(super) fn render_nodes(nodes: &[Node], config: &RenderConfig, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Value(path) => {
                if let Some(value) = config.lookup(path) {
                    out.push_str(&display_value(value));
                }
            }
            Node::Helper { helper, arg } => {
                let input = match arg {
                    Arg::Literal(text) => text.clone(),
                    Arg::Path(path) => config.lookup(path).map(display_value).unwrap_or_default(),
                };
                out.push_str(&helper.apply(&input));
            }
            Node::Block {
                kind,
                condition,
                body,
                otherwise,
            } => {
                let truthy = config.is_truthy(condition);
                let take_body = match kind {
                    BlockKind::If => truthy,
                    BlockKind::Unless => !truthy,
                };
                render_nodes(if take_body { body } else { otherwise }, config, out);
            }
        }
    }
}
