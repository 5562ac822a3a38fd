//! Rowan language implementation for envlists
//!
//! This module implements the `rowan::Language` trait, which connects
//! our EnvSyntaxKind enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::EnvSyntaxKind;

/// Language implementation for environment lists
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvLanguage;

impl Language for EnvLanguage {
    type Kind = EnvSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => EnvSyntaxKind::Whitespace,
            1 => EnvSyntaxKind::Comment,
            2 => EnvSyntaxKind::Newline,

            // Punctuation (100-149)
            100 => EnvSyntaxKind::LBrace,
            101 => EnvSyntaxKind::RBrace,
            102 => EnvSyntaxKind::Comma,
            103 => EnvSyntaxKind::Hyphen,
            104 => EnvSyntaxKind::Colon,

            // Factor text
            150 => EnvSyntaxKind::Word,

            // Structure nodes (200-299)
            200 => EnvSyntaxKind::EnvList,
            201 => EnvSyntaxKind::Entry,
            202 => EnvSyntaxKind::Sequence,
            203 => EnvSyntaxKind::Factor,
            204 => EnvSyntaxKind::Group,
            205 => EnvSyntaxKind::Literal,
            206 => EnvSyntaxKind::Payload,

            401 => EnvSyntaxKind::Eof,

            // Only kinds produced by this crate ever reach a tree
            _ => {
                tracing::warn!("Unknown syntax kind: {}", raw.0);
                EnvSyntaxKind::Eof
            }
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}
