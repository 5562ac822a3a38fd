//! Thin wrapper over `rowan::GreenNodeBuilder` speaking envlist kinds

use rowan::GreenNodeBuilder;

use super::{EnvSyntaxKind, EnvSyntaxNode, Token};

/// Incremental green tree builder used by the parser
pub struct CstBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: EnvSyntaxKind) {
        self.inner.start_node(kind.into());
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn token(&mut self, kind: EnvSyntaxKind, text: &str) {
        self.inner.token(kind.into(), text);
    }

    /// Add a lexed token verbatim
    pub fn add_token(&mut self, token: &Token) {
        self.token(token.kind, &token.text);
    }

    pub fn finish(self) -> EnvSyntaxNode {
        EnvSyntaxNode::new_root(self.inner.finish())
    }
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
