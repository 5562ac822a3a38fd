//! Trivia-preserving lexer for environment lists
//!
//! Every byte of the input ends up in exactly one token, so concatenating
//! token texts reproduces the source. The lexer never fails: anything that
//! is not punctuation, whitespace or a comment is factor text.

use crate::cst::EnvSyntaxKind;
use std::ops::Range;

/// Byte range of a token in the source
pub type CstSpan = Range<usize>;

/// A token with its syntax kind, exact text and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: EnvSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl Token {
    pub fn new(kind: EnvSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Lex input into tokens, keeping whitespace, newlines and comments
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let len = input.len();
    let mut i = 0usize;

    while let Some((current, size)) = next_char(input, i) {
        let start = i;

        let (kind, end) = match current {
            '\n' => (EnvSyntaxKind::Newline, i + size),
            '\r' => {
                // \r\n is a single newline
                let mut end = i + size;
                if let Some(('\n', nl_size)) = next_char(input, end) {
                    end += nl_size;
                }
                (EnvSyntaxKind::Newline, end)
            }
            '{' => (EnvSyntaxKind::LBrace, i + size),
            '}' => (EnvSyntaxKind::RBrace, i + size),
            ',' => (EnvSyntaxKind::Comma, i + size),
            '-' => (EnvSyntaxKind::Hyphen, i + size),
            ':' => (EnvSyntaxKind::Colon, i + size),
            '#' if at_comment_start(input, start) => {
                let mut end = i + size;
                while let Some((c, step)) = next_char(input, end) {
                    if c == '\n' || c == '\r' {
                        break;
                    }
                    end += step;
                }
                (EnvSyntaxKind::Comment, end)
            }
            c if is_inline_whitespace(c) => {
                let mut end = i + size;
                while let Some((c, step)) = next_char(input, end) {
                    if !is_inline_whitespace(c) {
                        break;
                    }
                    end += step;
                }
                (EnvSyntaxKind::Whitespace, end)
            }
            _ => {
                let mut end = i + size;
                while end < len {
                    match next_char(input, end) {
                        Some((c, step)) if !is_delimiter(c) => end += step,
                        _ => break,
                    }
                }
                (EnvSyntaxKind::Word, end)
            }
        };

        tokens.push(Token::new(kind, &input[start..end], start..end));
        i = end;
    }

    tokens
}

fn next_char(input: &str, index: usize) -> Option<(char, usize)> {
    input
        .get(index..)
        .and_then(|rest| rest.chars().next())
        .map(|c| (c, c.len_utf8()))
}

fn is_inline_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\n' && c != '\r'
}

/// Characters that end a run of factor text
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '}' | ',' | '-' | ':')
}

/// `#` opens a comment at input start or after whitespace; elsewhere it is
/// part of a factor name
fn at_comment_start(input: &str, index: usize) -> bool {
    input[..index]
        .chars()
        .next_back()
        .is_none_or(char::is_whitespace)
}
