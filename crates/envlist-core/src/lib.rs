//! Envlist Core
//!
//! Lossless parser, expander and structural editor for tox-style environment
//! lists such as `py{37,38}-django, lint`.
//! Edits return new trees that render byte-identical to the input everywhere
//! except the edited spans.

pub mod conditional;
pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod edit;
pub mod error;
pub mod expand;
pub mod render;
pub mod result;

// Re-export commonly used types
pub use conditional::{Condition, ConditionalLine, ConditionalSetting};
pub use config::{EditOptions, SeparatorStyle};
pub use cst::ast::{Atom, AstNode, Entry, EnvList, Factor, Group, Literal, Payload, Sequence};
pub use cst::{RoundTripValidator, Token, ValidationResult, parse, parse_tokens, tokenize};
pub use edit::{
    Editor, EntryPredicate, Position, add_environment, add_to_entry, hoist_prefix, insert_factor,
    insert_factor_variant, remove_environment, remove_factor, rename_factor,
};
pub use error::{EnvlistError, ErrorKind};
pub use expand::{Expand, expand};
pub use render::{ChangedSpan, changed_spans, render};
pub use result::{Result, ResultExt};
