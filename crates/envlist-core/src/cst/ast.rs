//! Typed AST layer over CST
//!
//! This module provides ergonomic, type-safe wrappers over the raw CST nodes.
//! Each wrapper implements a `cast()` method to safely convert from CST nodes.
//!
//! # Example
//!
//! ```ignore
//! use envlist_core::cst::parse;
//!
//! let list = parse("py{37,38}-django: pytest")?;
//! let entry = list.entries().next().unwrap();
//!
//! assert_eq!(entry.sequence().unwrap().factors().count(), 2);
//! assert_eq!(entry.payload().unwrap().text(), "pytest");
//! ```

use rowan::GreenNode;

use super::{EnvSyntaxKind, EnvSyntaxNode, EnvSyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: EnvSyntaxKind) -> bool;
    fn cast(node: EnvSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &EnvSyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: EnvSyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: EnvSyntaxKind) -> bool {
                kind == EnvSyntaxKind::$kind
            }

            fn cast(node: EnvSyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &EnvSyntaxNode {
                &self.syntax
            }
        }
    };
}

/// Concatenated text of the non-trivia tokens below `node`
///
/// Two nodes with equal structural text expand identically.
pub fn structural_text(node: &EnvSyntaxNode) -> String {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
        .map(|t| t.text().to_string())
        .collect()
}

// ============================================================================
// EnvList
// ============================================================================

ast_node!(
    /// Root: entries plus the separators and trivia between them
    EnvList => EnvList
);

impl EnvList {
    /// Wrap a freshly built root; the parser and editor only build `EnvList` roots
    pub(crate) fn from_root(syntax: EnvSyntaxNode) -> Self {
        debug_assert_eq!(syntax.kind(), EnvSyntaxKind::EnvList);
        Self { syntax }
    }

    /// Rebuild a tree from a green root, e.g. one moved across threads
    pub fn from_green(green: GreenNode) -> Option<Self> {
        Self::cast(EnvSyntaxNode::new_root(green))
    }

    /// The immutable, thread-safe green tree backing this list
    pub fn green(&self) -> GreenNode {
        self.syntax.green().into_owned()
    }

    pub fn entries(&self) -> impl Iterator<Item = Entry> {
        self.syntax.children().filter_map(Entry::cast)
    }

    /// Render back to text
    pub fn text(&self) -> String {
        self.syntax.text().to_string()
    }
}

// ============================================================================
// Entry
// ============================================================================

ast_node!(
    /// One environment declaration with its indentation and trailing trivia
    Entry => Entry
);

impl Entry {
    pub fn sequence(&self) -> Option<Sequence> {
        self.syntax.children().find_map(Sequence::cast)
    }

    /// Conditional-setting text after the colon, if any
    pub fn payload(&self) -> Option<Payload> {
        self.syntax.children().find_map(Payload::cast)
    }

    /// Whitespace before the sequence
    pub fn leading_trivia(&self) -> Vec<EnvSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .take_while(|e| e.as_token().is_some())
            .filter_map(|e| e.into_token())
            .collect()
    }

    /// Trivia-free text of the sequence, used for structural matching
    pub fn key(&self) -> String {
        self.sequence()
            .map(|s| structural_text(s.syntax()))
            .unwrap_or_default()
    }
}

// ============================================================================
// Sequence
// ============================================================================

ast_node!(
    /// Hyphen-joined factors, e.g. `py{37,38}-django`
    Sequence => Sequence
);

impl Sequence {
    pub fn factors(&self) -> impl Iterator<Item = Factor> {
        self.syntax.children().filter_map(Factor::cast)
    }
}

// ============================================================================
// Factor
// ============================================================================

ast_node!(
    /// Atoms between two hyphens, concatenated without separator
    Factor => Factor
);

impl Factor {
    pub fn atoms(&self) -> impl Iterator<Item = Atom> {
        self.syntax.children().filter_map(Atom::cast)
    }

    /// The literal when the factor is exactly one literal atom
    pub fn single_literal(&self) -> Option<Literal> {
        let mut atoms = self.atoms();
        match (atoms.next(), atoms.next()) {
            (Some(Atom::Literal(literal)), None) => Some(literal),
            _ => None,
        }
    }
}

// ============================================================================
// Group
// ============================================================================

ast_node!(
    /// Brace-delimited alternatives, `{a,b-c,}`
    Group => Group
);

impl Group {
    pub fn alternatives(&self) -> impl Iterator<Item = Sequence> {
        self.syntax.children().filter_map(Sequence::cast)
    }
}

// ============================================================================
// Literal
// ============================================================================

ast_node!(
    /// A bare factor name fragment
    Literal => Literal
);

impl Literal {
    pub fn token(&self) -> Option<EnvSyntaxToken> {
        self.syntax.first_token()
    }

    pub fn text(&self) -> String {
        self.token().map(|t| t.text().to_string()).unwrap_or_default()
    }
}

// ============================================================================
// Payload
// ============================================================================

ast_node!(
    /// Opaque conditional setting after `:`
    Payload => Payload
);

impl Payload {
    pub fn text(&self) -> String {
        self.syntax.text().to_string()
    }
}

// ============================================================================
// Atom
// ============================================================================

/// Anything that can appear inside a factor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Literal(Literal),
    Group(Group),
}

impl AstNode for Atom {
    fn can_cast(kind: EnvSyntaxKind) -> bool {
        Literal::can_cast(kind) || Group::can_cast(kind)
    }

    fn cast(node: EnvSyntaxNode) -> Option<Self> {
        match node.kind() {
            EnvSyntaxKind::Literal => Literal::cast(node).map(Atom::Literal),
            EnvSyntaxKind::Group => Group::cast(node).map(Atom::Group),
            _ => None,
        }
    }

    fn syntax(&self) -> &EnvSyntaxNode {
        match self {
            Atom::Literal(it) => it.syntax(),
            Atom::Group(it) => it.syntax(),
        }
    }
}
