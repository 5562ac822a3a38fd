//! Concrete Syntax Tree (CST) for environment lists
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST keeps every byte of the source, including whitespace, newlines,
//! comments and separator style, which is what makes local edits possible.
//!
//! ## Architecture
//!
//! - **Green Tree**: immutable, position-independent and `Send + Sync`.
//!   Edits rebuild only the spine from the changed node to the root and
//!   share every untouched subtree with the input.
//! - **Red Tree**: the `SyntaxNode` view with parent pointers, built on
//!   demand for traversal and wrapped by the typed layer in [`ast`].
//!
//! ## Trivia Handling
//!
//! - Indentation before an entry belongs to that entry.
//! - Whitespace and a comment after an entry stay on the entry.
//! - Separators (`,` and newlines) and blank lines live on the root.
//! - Inside braces, newlines and comments are ordinary trivia.
//!
//! This enables lossless representation: `parse(source).text() == source`
//!
//! ## Example
//!
//! ```rust,ignore
//! use envlist_core::cst::{parse, EnvSyntaxKind};
//!
//! let list = parse("py{37,38}-django # matrix\nlint")?;
//! assert_eq!(list.text(), "py{37,38}-django # matrix\nlint");
//!
//! for element in list.syntax().descendants_with_tokens() {
//!     if let Some(token) = element.as_token() {
//!         if token.kind() == EnvSyntaxKind::Comment {
//!             println!("Found comment: {}", token.text());
//!         }
//!     }
//! }
//! ```

mod builder;
mod language;
mod lexer;
mod nodes;
mod parser;
mod syntax_kind;

pub mod ast;
pub mod round_trip;

pub use builder::CstBuilder;
pub use language::EnvLanguage;
pub use lexer::{CstSpan, Token, tokenize};
pub use nodes::*;
pub use parser::{parse, parse_tokens};
pub use round_trip::{RoundTripValidator, ValidationResult};
pub use syntax_kind::EnvSyntaxKind;
