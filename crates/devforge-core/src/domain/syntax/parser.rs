//! Turns tokens into a tree of [`Node`]s.

use super::helpers::Helper;
use super::lexer::{Span, Token, tokenize};
use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Node {
    Text(String),
    Value(String),
    Helper { helper: Helper, arg: Arg },
    Block {
        kind: BlockKind,
        condition: String,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Arg {
    Path(String),
    Literal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BlockKind {
    If,
    Unless,
}

impl BlockKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "if" => Some(Self::If),
            "unless" => Some(Self::Unless),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Unless => "unless",
        }
    }
}

/// A classified tag.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Tag {
    Value(String),
    Helper { helper: Helper, arg: Arg },
    Open { kind: BlockKind, condition: String },
    Else,
    Close(BlockKind),
}

impl Tag {
    fn is_block(&self) -> bool {
        matches!(self, Tag::Open { .. } | Tag::Else | Tag::Close(_))
    }
}

pub(super) fn parse(source: &str) -> Result<Vec<Node>, DomainError> {
    let tokens = tokenize(source)?;

    let mut items = Vec::with_capacity(tokens.len());
    for token in &tokens {
        items.push(match *token {
            Token::Text(span) => Item::Text {
                start: span.start,
                end: span.end,
            },
            Token::Tag { inner, span } => Item::Tag {
                tag: classify(inner, span)?,
                span,
            },
        });
    }

    strip_standalone_lines(source, &mut items);
    build_tree(source, items)
}

enum Item {
    Text { start: usize, end: usize },
    Tag { tag: Tag, span: Span },
}

/// Block tags alone on their line take the whole line with them.
///
/// Decisions are made against the untouched source so that adjacent
/// standalone lines don't affect each other.
fn strip_standalone_lines(source: &str, items: &mut [Item]) {
    let mut cuts = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let Item::Tag { tag, span } = item else {
            continue;
        };
        if !tag.is_block() {
            continue;
        }

        let line_start = source[..span.start].rfind('\n').map_or(0, |n| n + 1);
        let line_end = source[span.end..]
            .find('\n')
            .map_or(source.len(), |n| span.end + n + 1);
        let head = &source[line_start..span.start];
        let tail = source[span.end..line_end].trim_end_matches('\n');
        if is_blank(head) && is_blank(tail) {
            cuts.push((i, line_start, line_end));
        }
    }

    for (i, line_start, line_end) in cuts {
        if let Some(Item::Text { end, .. }) = i.checked_sub(1).and_then(|p| items.get_mut(p)) {
            *end = (*end).min(line_start);
        }
        if let Some(Item::Text { start, .. }) = items.get_mut(i + 1) {
            *start = (*start).max(line_end);
        }
    }
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c == ' ' || c == '\t' || c == '\r')
}

struct Frame {
    kind: BlockKind,
    condition: String,
    span: Span,
    body: Vec<Node>,
    otherwise: Vec<Node>,
    in_else: bool,
}

impl Frame {
    fn current(&mut self) -> &mut Vec<Node> {
        if self.in_else {
            &mut self.otherwise
        } else {
            &mut self.body
        }
    }
}

fn build_tree(source: &str, items: Vec<Item>) -> Result<Vec<Node>, DomainError> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for item in items {
        let (tag, span) = match item {
            Item::Text { start, end } => {
                if start < end {
                    let text = source[start..end].to_string();
                    current(&mut stack, &mut root).push(Node::Text(text));
                }
                continue;
            }
            Item::Tag { tag, span } => (tag, span),
        };

        match tag {
            Tag::Value(path) => current(&mut stack, &mut root).push(Node::Value(path)),
            Tag::Helper { helper, arg } => {
                current(&mut stack, &mut root).push(Node::Helper { helper, arg })
            }
            Tag::Open { kind, condition } => stack.push(Frame {
                kind,
                condition,
                span,
                body: Vec::new(),
                otherwise: Vec::new(),
                in_else: false,
            }),
            Tag::Else => {
                let Some(frame) = stack.last_mut() else {
                    return Err(error_at("{{else}} outside of a block", span));
                };
                if frame.in_else {
                    return Err(error_at(
                        format!("duplicate {{{{else}}}} in {{{{#{}}}}} block", frame.kind.name()),
                        span,
                    ));
                }
                frame.in_else = true;
            }
            Tag::Close(kind) => {
                let Some(frame) = stack.pop() else {
                    return Err(error_at(
                        format!("unexpected {{{{/{}}}}} with no open block", kind.name()),
                        span,
                    ));
                };
                if frame.kind != kind {
                    return Err(error_at(
                        format!(
                            "{{{{/{}}}}} does not close {{{{#{}}}}} opened at line {}, column {}",
                            kind.name(),
                            frame.kind.name(),
                            frame.span.line,
                            frame.span.column
                        ),
                        span,
                    ));
                }
                let node = Node::Block {
                    kind: frame.kind,
                    condition: frame.condition,
                    body: frame.body,
                    otherwise: frame.otherwise,
                };
                current(&mut stack, &mut root).push(node);
            }
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(error_at(
            format!("unclosed {{{{#{}}}}}", frame.kind.name()),
            frame.span,
        ));
    }
    Ok(root)
}

fn current<'a>(stack: &'a mut [Frame], root: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => frame.current(),
        None => root,
    }
}

fn error_at(reason: impl Into<String>, span: Span) -> DomainError {
    DomainError::malformed(reason, span.line, span.column)
}

fn classify(inner: &str, span: Span) -> Result<Tag, DomainError> {
    let content = inner.trim();
    if content.is_empty() {
        return Err(error_at("empty expression", span));
    }

    if let Some(rest) = content.strip_prefix('#') {
        let words = split_words(rest, span)?;
        let (name, args) = words.split_first().ok_or_else(|| error_at("missing block name", span))?;
        let name = word_text(name);
        let kind = BlockKind::from_name(name)
            .ok_or_else(|| error_at(format!("unknown block helper '#{name}'"), span))?;
        let condition = match args {
            [Word::Bare(path)] => validate_path(path, span)?,
            [] => return Err(error_at(format!("#{name} requires a condition"), span)),
            [Word::Quoted(_)] => {
                return Err(error_at(
                    format!("#{name} condition must be a variable"),
                    span,
                ));
            }
            _ => return Err(error_at(format!("too many arguments to #{name}"), span)),
        };
        return Ok(Tag::Open { kind, condition });
    }

    if let Some(rest) = content.strip_prefix('/') {
        let name = rest.trim();
        return BlockKind::from_name(name)
            .map(Tag::Close)
            .ok_or_else(|| error_at(format!("unknown closing tag '/{name}'"), span));
    }

    if content == "else" {
        return Ok(Tag::Else);
    }

    let words = split_words(content, span)?;
    match words.as_slice() {
        [Word::Bare(name)] => {
            if Helper::from_name(name).is_some() {
                return Err(error_at(
                    format!("helper '{name}' expects one argument"),
                    span,
                ));
            }
            Ok(Tag::Value(validate_path(name, span)?))
        }
        [Word::Quoted(_)] => Err(error_at("expected a variable name, found a string", span)),
        [name, arg] => {
            let name = word_text(name);
            let helper = Helper::from_name(name)
                .ok_or_else(|| error_at(format!("unknown helper '{name}'"), span))?;
            let arg = match arg {
                Word::Bare(path) => Arg::Path(validate_path(path, span)?),
                Word::Quoted(text) => Arg::Literal(text.clone()),
            };
            Ok(Tag::Helper { helper, arg })
        }
        _ => Err(error_at("too many arguments", span)),
    }
}

#[derive(Debug)]
enum Word {
    Bare(String),
    Quoted(String),
}

fn word_text(word: &Word) -> &str {
    match word {
        Word::Bare(s) | Word::Quoted(s) => s,
    }
}

/// Whitespace-separated words; `"..."` and `'...'` may contain spaces.
fn split_words(text: &str, span: Span) -> Result<Vec<Word>, DomainError> {
    let mut words = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' || c == '\'' {
            chars.next();
            let mut literal = String::new();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == c {
                    closed = true;
                    break;
                }
                literal.push(next);
            }
            if !closed {
                return Err(error_at("unterminated string literal", span));
            }
            words.push(Word::Quoted(literal));
            continue;
        }
        let mut bare = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_whitespace() {
                break;
            }
            bare.push(next);
            chars.next();
        }
        words.push(Word::Bare(bare));
    }
    Ok(words)
}

fn validate_path(path: &str, span: Span) -> Result<String, DomainError> {
    let valid = path.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '-'))
    });
    if valid {
        Ok(path.to_string())
    } else {
        Err(error_at(format!("invalid variable path '{path}'"), span))
    }
}
