//! Structural edits over envlist trees
//!
//! Every operation takes a tree and returns a new one; the input stays valid.
//! Only the path from the root to each changed node is rebuilt, so untouched
//! entries are shared with the input and render byte-identical.
//!
//! An edit whose target matches nothing fails with
//! [`EnvlistError::NotFound`](crate::error::EnvlistError::NotFound), which
//! callers can fold into `Ok(None)` with [`ResultExt::found`](crate::result::ResultExt::found).
//!
//! # Example
//!
//! ```rust,ignore
//! use envlist_core::{Editor, parse, render};
//!
//! let list = parse("py{37,38}-django, lint")?;
//! let edited = Editor::new().remove_factor(&list, "lint")?;
//! assert_eq!(render(&edited), "py{37,38}-django");
//! ```

mod environment;
mod factor;
pub(crate) mod green;
mod hoist;
mod merge;

use std::fmt;

use crate::config::EditOptions;
use crate::cst::ast::{EnvList, Entry};
use crate::cst::{EnvSyntaxKind, tokenize};
use crate::error::EnvlistError;
use crate::expand::Expand;
use crate::result::Result;

/// Where `insert_factor` places the new factor within a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Start,
    #[default]
    End,
}

/// Selects the entries an edit applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPredicate {
    /// Every entry
    All,
    /// Entries structurally equal to this spec, ignoring whitespace
    Matches(String),
    /// Entries where some expanded name contains this factor
    HasFactor(String),
    /// Entries whose expanded names all start with this prefix
    StartsWith(String),
}

impl EntryPredicate {
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            EntryPredicate::All => true,
            EntryPredicate::Matches(spec) => entry.key() == structural_key(spec),
            EntryPredicate::HasFactor(factor) => entry
                .expand()
                .iter()
                .any(|name| name.split('-').any(|f| f == factor)),
            EntryPredicate::StartsWith(prefix) => entry.starts_with(prefix),
        }
    }
}

impl fmt::Display for EntryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPredicate::All => write!(f, "any entry"),
            EntryPredicate::Matches(spec) => write!(f, "entry '{spec}'"),
            EntryPredicate::HasFactor(factor) => write!(f, "entries with factor '{factor}'"),
            EntryPredicate::StartsWith(prefix) => write!(f, "entries starting with '{prefix}'"),
        }
    }
}

/// Applies structural edits with a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct Editor {
    options: EditOptions,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EditOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EditOptions {
        &self.options
    }
}

/// Trivia-free text of an entry spec, comparable with [`Entry::key`]
fn structural_key(spec: &str) -> String {
    tokenize(spec)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| t.text)
        .collect()
}

/// A factor name must lex as exactly one word
fn validate_factor(text: &str) -> Result<()> {
    let tokens = tokenize(text);
    match tokens.as_slice() {
        [token] if token.kind == EnvSyntaxKind::Word => Ok(()),
        [] => Err(EnvlistError::invalid_fragment(text, "factor name is empty")),
        _ => Err(EnvlistError::invalid_fragment(
            text,
            "factor name must not contain whitespace, braces, commas, hyphens or colons",
        )),
    }
}

/// Insert `factor` into every entry matching `predicate`, with default options
pub fn insert_factor(
    tree: &EnvList,
    predicate: &EntryPredicate,
    factor: &str,
    position: Position,
) -> Result<EnvList> {
    Editor::new().insert_factor(tree, predicate, factor, position)
}

/// Make `factor` optional in every entry matching `predicate`, with default options
pub fn insert_factor_variant(
    tree: &EnvList,
    predicate: &EntryPredicate,
    factor: &str,
    position: Position,
) -> Result<EnvList> {
    Editor::new().insert_factor_variant(tree, predicate, factor, position)
}

/// Remove every literal factor equal to `factor`, with default options
pub fn remove_factor(tree: &EnvList, factor: &str) -> Result<EnvList> {
    Editor::new().remove_factor(tree, factor)
}

/// Rename every literal equal to `old` to `new`
pub fn rename_factor(tree: &EnvList, old: &str, new: &str) -> Result<EnvList> {
    Editor::new().rename_factor(tree, old, new)
}

/// Append an entry, matching the list's separator style
pub fn add_environment(tree: &EnvList, spec: &str) -> Result<EnvList> {
    Editor::new().add_environment(tree, spec)
}

/// Remove every entry structurally equal to `spec`
pub fn remove_environment(tree: &EnvList, spec: &str) -> Result<EnvList> {
    Editor::new().remove_environment(tree, spec)
}

/// Fold `name` into every matching entry as a new alternative, with default options
pub fn add_to_entry(tree: &EnvList, predicate: &EntryPredicate, name: &str) -> Result<EnvList> {
    Editor::new().add_to_entry(tree, predicate, name)
}

/// Move `prefix` out of the leading group of every matching entry
pub fn hoist_prefix(tree: &EnvList, predicate: &EntryPredicate, prefix: &str) -> Result<EnvList> {
    Editor::new().hoist_prefix(tree, predicate, prefix)
}
