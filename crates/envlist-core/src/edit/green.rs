//! Green tree assembly helpers
//!
//! Edits rebuild only the nodes on the path to a change. Every untouched
//! child is carried over as the same `Arc`-backed green node, so the old
//! and new trees share it.

use rowan::{GreenNode, GreenToken, NodeOrToken};

use crate::cst::{EnvSyntaxElement, EnvSyntaxKind, EnvSyntaxNode, GreenElement, tokenize};

pub(crate) fn node(kind: EnvSyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(kind.into(), children)
}

pub(crate) fn token(kind: EnvSyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

/// `Literal(Word(text))`
pub(crate) fn literal(text: &str) -> GreenElement {
    NodeOrToken::Node(node(EnvSyntaxKind::Literal, vec![token(EnvSyntaxKind::Word, text)]))
}

/// The green behind a red element; shares the underlying allocation
pub(crate) fn green_of(element: &EnvSyntaxElement) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.green().into_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
    }
}

pub(crate) fn children(node: &EnvSyntaxNode) -> Vec<GreenElement> {
    node.children_with_tokens().map(|e| green_of(&e)).collect()
}

/// Red view over a detached green node
pub(crate) fn view(green: GreenNode) -> EnvSyntaxNode {
    EnvSyntaxNode::new_root(green)
}

/// Lex a fixed snippet (separators, spacing) into green tokens
pub(crate) fn tokens(text: &str) -> Vec<GreenElement> {
    tokenize(text)
        .iter()
        .map(|t| token(t.kind, &t.text))
        .collect()
}

/// Whitespace tokens at the start of `node`
pub(crate) fn leading_whitespace(node: &EnvSyntaxNode) -> Vec<GreenElement> {
    node.children_with_tokens()
        .take_while(|e| e.kind() == EnvSyntaxKind::Whitespace)
        .map(|e| green_of(&e))
        .collect()
}

/// Rebuild `node` with its leading whitespace replaced by `whitespace`
pub(crate) fn with_leading_whitespace(
    node: &EnvSyntaxNode,
    whitespace: Vec<GreenElement>,
) -> GreenNode {
    let mut out = whitespace;
    out.extend(
        node.children_with_tokens()
            .skip_while(|e| e.kind() == EnvSyntaxKind::Whitespace)
            .map(|e| green_of(&e)),
    );
    self::node(node.kind(), out)
}

pub(crate) fn is_kind(element: &GreenElement, kind: EnvSyntaxKind) -> bool {
    let raw = match element {
        NodeOrToken::Node(node) => node.kind(),
        NodeOrToken::Token(token) => token.kind(),
    };
    raw == kind.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::AstNode;
    use crate::cst::parse;

    #[test]
    fn test_green_of_shares_allocation() {
        let list = parse("a, b").expect("parse");
        let entry = list.syntax().first_child().expect("entry");
        let NodeOrToken::Node(green) = green_of(&NodeOrToken::Node(entry.clone())) else {
            panic!("expected node");
        };
        assert!(std::ptr::eq(&*entry.green(), &*green));
    }

    #[test]
    fn test_with_leading_whitespace() {
        let list = parse("   a").expect("parse");
        let entry = list.syntax().first_child().expect("entry");
        assert_eq!(leading_whitespace(&entry).len(), 1);

        let rebuilt = view(with_leading_whitespace(&entry, tokens("\t")));
        assert_eq!(rebuilt.text().to_string(), "\ta");
    }

    #[test]
    fn test_literal_element() {
        let NodeOrToken::Node(green) = literal("py37") else {
            panic!("expected node");
        };
        assert_eq!(view(green).text().to_string(), "py37");
    }
}
