//! Rowan type aliases bound to the envlist language

use rowan::{GreenNode, GreenToken, NodeOrToken};

use super::EnvLanguage;

pub type EnvSyntaxNode = rowan::SyntaxNode<EnvLanguage>;
pub type EnvSyntaxToken = rowan::SyntaxToken<EnvLanguage>;
pub type EnvSyntaxElement = rowan::SyntaxElement<EnvLanguage>;

/// Owned green child, the unit edits are assembled from
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;
