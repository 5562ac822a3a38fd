//! Recursive-descent parser for environment lists
//!
//! Builds a lossless CST from the token stream:
//!
//! ```text
//! envlist  ::= entry (separator entry)*
//! entry    ::= trivia* sequence (':' payload)? trivia*
//! sequence ::= factor ('-' factor)*
//! factor   ::= (literal | group)*
//! group    ::= '{' sequence (',' sequence)* '}'
//! ```
//!
//! Every token lands in the tree, so `parse(source).text() == source`.
//! Unbalanced braces are the only syntax errors.

use tracing::trace;

use super::ast::EnvList;
use super::{CstBuilder, EnvSyntaxKind, Token, tokenize};
use crate::error::EnvlistError;
use crate::result::Result;

/// Parse envlist source into a tree
///
/// # Example
///
/// ```rust,ignore
/// use envlist_core::cst::parse;
///
/// let list = parse("py{37,38}-django, lint")?;
/// assert_eq!(list.syntax().text().to_string(), "py{37,38}-django, lint");
/// ```
pub fn parse(source: &str) -> Result<EnvList> {
    let tokens = tokenize(source);
    parse_tokens(&tokens)
}

/// Parse a token stream into a tree
pub fn parse_tokens(tokens: &[Token]) -> Result<EnvList> {
    let mut parser = Parser::new(tokens);
    parser.parse_envlist()?;
    let root = parser.finish();
    trace!(len = u32::from(root.text_range().len()), "parsed envlist");
    Ok(EnvList::from_root(root))
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    builder: CstBuilder,
    /// Brace nesting depth; newlines and comments are trivia inside groups
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: CstBuilder::new(),
            depth: 0,
        }
    }

    fn finish(self) -> super::EnvSyntaxNode {
        self.builder.finish()
    }

    /// Parse the top-level list of entries
    fn parse_envlist(&mut self) -> Result<()> {
        self.builder.start_node(EnvSyntaxKind::EnvList);

        while !self.at_end() {
            match self.current_kind() {
                EnvSyntaxKind::Newline | EnvSyntaxKind::Comma | EnvSyntaxKind::Comment => {
                    self.bump();
                }
                EnvSyntaxKind::Whitespace => {
                    // Indentation belongs to the entry it precedes
                    if Self::starts_entry(self.nth_non_trivia_kind()) {
                        self.parse_entry()?;
                    } else {
                        self.bump();
                    }
                }
                EnvSyntaxKind::RBrace => return Err(self.error_here("unmatched `}`")),
                _ => self.parse_entry()?,
            }
        }

        self.builder.finish_node(); // ENVLIST
        Ok(())
    }

    /// Parse one entry: indentation, sequence, optional payload, trailing trivia
    fn parse_entry(&mut self) -> Result<()> {
        self.builder.start_node(EnvSyntaxKind::Entry);

        while self.at(EnvSyntaxKind::Whitespace) {
            self.bump();
        }

        self.parse_sequence()?;

        if self.at(EnvSyntaxKind::RBrace) {
            return Err(self.error_here("unmatched `}`"));
        }

        if self.nth_non_trivia_kind() == EnvSyntaxKind::Colon {
            while self.at(EnvSyntaxKind::Whitespace) {
                self.bump();
            }
            self.bump(); // COLON
            while self.at(EnvSyntaxKind::Whitespace) {
                self.bump();
            }
            self.parse_payload();
        }

        while self.at(EnvSyntaxKind::Whitespace) || self.at(EnvSyntaxKind::Comment) {
            self.bump();
        }

        self.builder.finish_node(); // ENTRY
        Ok(())
    }

    /// Payload runs to the end of the line and is kept opaque
    fn parse_payload(&mut self) {
        let mut end = self.pos;
        while end < self.tokens.len() && self.tokens[end].kind != EnvSyntaxKind::Newline {
            end += 1;
        }
        // Trailing whitespace and comment stay with the entry
        while end > self.pos
            && matches!(
                self.tokens[end - 1].kind,
                EnvSyntaxKind::Whitespace | EnvSyntaxKind::Comment
            )
        {
            end -= 1;
        }

        self.builder.start_node(EnvSyntaxKind::Payload);
        while self.pos < end {
            self.bump();
        }
        self.builder.finish_node(); // PAYLOAD
    }

    /// Parse hyphen-joined factors; may be empty
    fn parse_sequence(&mut self) -> Result<()> {
        self.builder.start_node(EnvSyntaxKind::Sequence);

        if self.at_sequence_start() {
            self.parse_factor()?;
            loop {
                if self.at(EnvSyntaxKind::Hyphen) {
                    self.bump();
                    self.parse_factor()?;
                } else if self.at_trivia() && self.nth_non_trivia_kind() == EnvSyntaxKind::Hyphen {
                    self.bump();
                } else {
                    break;
                }
            }
        }

        self.builder.finish_node(); // SEQUENCE
        Ok(())
    }

    /// Parse the atoms between two hyphens; may be empty
    fn parse_factor(&mut self) -> Result<()> {
        self.builder.start_node(EnvSyntaxKind::Factor);

        loop {
            let kind = self.current_kind();
            if kind == EnvSyntaxKind::LBrace {
                self.parse_group()?;
            } else if self.is_literal_kind(kind) {
                self.builder.start_node(EnvSyntaxKind::Literal);
                self.bump();
                self.builder.finish_node(); // LITERAL
            } else if self.at_trivia() && self.starts_atom(self.nth_non_trivia_kind()) {
                self.bump();
            } else {
                break;
            }
        }

        self.builder.finish_node(); // FACTOR
        Ok(())
    }

    /// Parse `{ alternative, ... }`
    fn parse_group(&mut self) -> Result<()> {
        let open = self.current_offset();
        self.builder.start_node(EnvSyntaxKind::Group);
        self.bump(); // LBRACE
        self.depth += 1;

        loop {
            self.consume_trivia();
            self.parse_sequence()?;
            self.consume_trivia();

            match self.current_kind() {
                EnvSyntaxKind::Comma => self.bump(),
                EnvSyntaxKind::RBrace => {
                    self.bump();
                    break;
                }
                EnvSyntaxKind::Eof => {
                    return Err(EnvlistError::syntax(open, "unclosed group: expected `}`"));
                }
                _ => return Err(self.error_here("unexpected token in group")),
            }
        }

        self.depth -= 1;
        self.builder.finish_node(); // GROUP
        Ok(())
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> EnvSyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(EnvSyntaxKind::Eof)
    }

    fn current_offset(&self) -> usize {
        self.current()
            .map(|t| t.span.start)
            .or_else(|| self.tokens.last().map(|t| t.span.end))
            .unwrap_or(0)
    }

    fn at(&self, kind: EnvSyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn is_trivia_kind(&self, kind: EnvSyntaxKind) -> bool {
        match kind {
            EnvSyntaxKind::Whitespace => true,
            EnvSyntaxKind::Newline | EnvSyntaxKind::Comment => self.depth > 0,
            _ => false,
        }
    }

    fn at_trivia(&self) -> bool {
        self.is_trivia_kind(self.current_kind())
    }

    /// Colons are factor text inside braces and a payload marker outside
    fn is_literal_kind(&self, kind: EnvSyntaxKind) -> bool {
        kind == EnvSyntaxKind::Word || (kind == EnvSyntaxKind::Colon && self.depth > 0)
    }

    fn starts_atom(&self, kind: EnvSyntaxKind) -> bool {
        kind == EnvSyntaxKind::LBrace || self.is_literal_kind(kind)
    }

    fn at_sequence_start(&self) -> bool {
        let kind = self.current_kind();
        self.starts_atom(kind) || kind == EnvSyntaxKind::Hyphen
    }

    fn starts_entry(kind: EnvSyntaxKind) -> bool {
        !matches!(
            kind,
            EnvSyntaxKind::Newline
                | EnvSyntaxKind::Comma
                | EnvSyntaxKind::Comment
                | EnvSyntaxKind::Whitespace
                | EnvSyntaxKind::Eof
        )
    }

    /// Kind of the next token that is not trivia in the current context
    fn nth_non_trivia_kind(&self) -> EnvSyntaxKind {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .find(|&kind| !self.is_trivia_kind(kind))
            .unwrap_or(EnvSyntaxKind::Eof)
    }

    fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.add_token(token);
            self.pos += 1;
        }
    }

    fn consume_trivia(&mut self) {
        while self.at_trivia() {
            self.bump();
        }
    }

    fn error_here(&self, message: &str) -> EnvlistError {
        EnvlistError::syntax(self.current_offset(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::AstNode;
    use crate::error::ErrorKind;

    fn kinds_of(source: &str) -> Vec<EnvSyntaxKind> {
        parse(source)
            .expect("parse")
            .syntax()
            .descendants()
            .map(|n| n.kind())
            .collect()
    }

    #[test]
    fn test_parse_simple_entry() {
        use EnvSyntaxKind::*;
        assert_eq!(
            kinds_of("py37"),
            vec![EnvList, Entry, Sequence, Factor, Literal]
        );
    }

    #[test]
    fn test_parse_group_inside_factor() {
        use EnvSyntaxKind::*;
        assert_eq!(
            kinds_of("py{37,38}"),
            vec![
                EnvList, Entry, Sequence, Factor, Literal, Group, Sequence, Factor, Literal,
                Sequence, Factor, Literal
            ]
        );
    }

    #[test]
    fn test_parse_is_lossless() {
        let sources = [
            "py{37,38}-django",
            "a , b{c,d},",
            "\n    py37\n    # lint is slow\n    lint\n",
            "py37: pytest>=3, <4  # pinned\nlint",
            "{ a ,\n  b }- c",
            "{a,,b}",
            "-a--b-",
            "",
        ];
        for source in sources {
            let list = parse(source).expect("parse");
            assert_eq!(list.syntax().text().to_string(), source);
        }
    }

    #[test]
    fn test_parse_payload_is_opaque() {
        let list = parse("django: Django>=1.0,<2 {weird").expect("parse");
        let entries: Vec<_> = list.entries().collect();
        assert_eq!(entries.len(), 1);
        let payload = entries[0].payload().expect("payload");
        assert_eq!(payload.text(), "Django>=1.0,<2 {weird");
    }

    #[test]
    fn test_parse_trailing_comment_stays_on_entry() {
        let list = parse("py37: pytest  # pinned").expect("parse");
        let entry = list.entries().next().expect("entry");
        assert_eq!(entry.payload().expect("payload").text(), "pytest");
        assert!(entry.syntax().text().to_string().ends_with("# pinned"));
    }

    #[test]
    fn test_parse_empty_alternative() {
        let list = parse("{a,,b}").expect("parse");
        let entry = list.entries().next().expect("entry");
        let group = entry
            .syntax()
            .descendants()
            .find(|n| n.kind() == EnvSyntaxKind::Group)
            .expect("group");
        let alternatives: Vec<_> = group
            .children()
            .filter(|n| n.kind() == EnvSyntaxKind::Sequence)
            .collect();
        assert_eq!(alternatives.len(), 3);
        assert_eq!(alternatives[1].text().to_string(), "");
    }

    #[test]
    fn test_unclosed_group_reports_open_brace() {
        let err = parse("lint, py{37,38").expect_err("unclosed");
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.offset(), Some(8));
    }

    #[test]
    fn test_unmatched_close_brace() {
        let err = parse("py37}, lint").expect_err("unmatched");
        assert_eq!(err.offset(), Some(4));

        let err = parse("lint\n}").expect_err("unmatched");
        assert_eq!(err.offset(), Some(5));
    }

    #[test]
    fn test_nested_unclosed_group() {
        let err = parse("{a,{b,c}").expect_err("unclosed");
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn test_colon_inside_group_is_factor_text() {
        let list = parse("{a:b,c}: payload").expect("parse");
        let entry = list.entries().next().expect("entry");
        assert_eq!(entry.payload().expect("payload").text(), "payload");
    }
}
