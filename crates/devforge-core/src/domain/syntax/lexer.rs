//! Splits template source into literal text and `{{ ... }}` tags.

use crate::domain::DomainError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Byte range of a token in the source, plus the human position of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token<'a> {
    /// Literal text; the span covers it exactly.
    Text(Span),
    /// A tag; `inner` is the text between the delimiters, the span covers
    /// the delimiters too.
    Tag { inner: &'a str, span: Span },
}

pub(super) fn tokenize(source: &str) -> Result<Vec<Token<'_>>, DomainError> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = source[cursor..].find(OPEN) {
        let open = cursor + offset;
        if open > cursor {
            tokens.push(Token::Text(span(source, cursor, open)));
        }

        let body = open + OPEN.len();
        let Some(len) = source[body..].find(CLOSE) else {
            let (line, column) = position(source, open);
            return Err(DomainError::malformed(
                "unterminated expression, expected '}}'",
                line,
                column,
            ));
        };
        let end = body + len + CLOSE.len();
        tokens.push(Token::Tag {
            inner: &source[body..body + len],
            span: span(source, open, end),
        });
        cursor = end;
    }

    if cursor < source.len() {
        tokens.push(Token::Text(span(source, cursor, source.len())));
    }
    Ok(tokens)
}

fn span(source: &str, start: usize, end: usize) -> Span {
    let (line, column) = position(source, start);
    Span {
        start,
        end,
        line,
        column,
    }
}

/// 1-based line and column (in characters) of a byte offset.
pub(super) fn position(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_and_tags() {
        let tokens = tokenize("Hello {{ name }}!").unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0], Token::Text(Span { start: 0, end: 6, .. })));
        assert!(matches!(tokens[1], Token::Tag { inner: " name ", .. }));
        assert!(matches!(tokens[2], Token::Text(Span { start: 16, end: 17, .. })));
    }

    #[test]
    fn lone_closing_braces_are_text() {
        let tokens = tokenize("fn main() {}}").unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn unterminated_tag_reports_its_start() {
        let err = tokenize("line one\n  {{ name").unwrap_err();
        assert_eq!(
            err,
            DomainError::MalformedTemplate {
                reason: "unterminated expression, expected '}}'".into(),
                line: 2,
                column: 3,
            }
        );
    }

    #[test]
    fn columns_count_characters() {
        assert_eq!(position("héllo {{", 7), (1, 7));
    }
}
