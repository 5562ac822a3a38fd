//! Syntax kinds for the envlist CST
//!
//! Tokens are leaves (factor text, punctuation, trivia); nodes are the
//! composite structures built by the parser.

/// All syntax kinds (tokens and nodes) of the envlist language
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum EnvSyntaxKind {
    // Trivia
    Whitespace = 0,
    Comment = 1,
    Newline = 2,

    // Punctuation (100-149)
    LBrace = 100,
    RBrace = 101,
    Comma = 102,
    Hyphen = 103,
    Colon = 104,

    // Factor text (150-199)
    Word = 150,

    // Structure nodes (200-299)
    EnvList = 200,
    Entry = 201,
    Sequence = 202,
    Factor = 203,
    Group = 204,
    Literal = 205,
    Payload = 206,

    // Special tokens (400+)
    Eof = 401,
}

impl EnvSyntaxKind {
    /// Whitespace, newlines and comments
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            EnvSyntaxKind::Whitespace | EnvSyntaxKind::Comment | EnvSyntaxKind::Newline
        )
    }

    /// Tokens that separate entries at the top level
    pub fn is_separator(self) -> bool {
        matches!(self, EnvSyntaxKind::Comma | EnvSyntaxKind::Newline)
    }
}

impl From<EnvSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: EnvSyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

impl std::fmt::Display for EnvSyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
