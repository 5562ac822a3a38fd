//! Moving a shared prefix out of a leading group
//!
//! `{py27,py36}-django` hoisting `py` becomes `py{27,36}-django`. Only the
//! first factor of an entry is rewritten; everything after the point where
//! the prefix is used up is kept verbatim.

use rowan::{GreenNode, NodeOrToken};
use tracing::debug;

use super::environment::rewrite_sequences;
use super::green::{self, green_of};
use super::{Editor, EntryPredicate};
use crate::cst::ast::{Atom, AstNode, EnvList, Group};
use crate::cst::{EnvSyntaxElement, EnvSyntaxKind, EnvSyntaxNode, GreenElement};
use crate::error::EnvlistError;
use crate::expand::{Expand, shared_prefix};
use crate::result::Result;

/// Rewrite the atoms of `factor` so that `prefix` leads as a literal
fn hoist_factor(factor: &EnvSyntaxNode, prefix: &str) -> Result<GreenNode> {
    let children: Vec<EnvSyntaxElement> = factor.children_with_tokens().collect();
    let mut remaining = prefix.to_string();
    let mut hoisted = String::new();
    let mut extra: Option<GreenNode> = None;
    let mut rest_from = children.len();

    for (i, child) in children.iter().enumerate() {
        if remaining.is_empty() {
            rest_from = i;
            break;
        }
        let Some(atom) = child.as_node().cloned().and_then(Atom::cast) else {
            continue;
        };
        match atom {
            Atom::Literal(literal) => {
                let text = literal.text();
                if text.starts_with(remaining.as_str()) {
                    rest_from = i;
                    remaining.clear();
                    break;
                } else if remaining.starts_with(text.as_str()) {
                    remaining.replace_range(..text.len(), "");
                    hoisted.push_str(&text);
                } else {
                    return Err(EnvlistError::hoist(
                        prefix,
                        format!("'{text}' cannot take '{remaining}'"),
                    ));
                }
            }
            Atom::Group(group) => {
                if group.starts_with(&remaining) {
                    let stripped = strip_group(&group, &remaining)?;
                    hoisted.push_str(&remaining);
                    remaining.clear();
                    let blank = Group::cast(green::view(stripped.clone()))
                        .is_some_and(|g| Expand::is_empty(&g));
                    if !blank {
                        extra = Some(stripped);
                    }
                    rest_from = i + 1;
                    break;
                }

                // Degenerate groups like `{y}` or `{y,y}` can still give up a prefix
                let common = group.common_prefix().unwrap_or_default();
                let shared = shared_prefix(&common, &remaining);
                if shared.len() != common.len().min(remaining.len()) {
                    return Err(EnvlistError::hoist(
                        prefix,
                        format!("'{}' cannot take '{remaining}'", group.syntax().text()),
                    ));
                }
                if !group.only(shared) {
                    return Err(EnvlistError::hoist(
                        prefix,
                        format!("leftover unmatched '{remaining}'"),
                    ));
                }
                let shared = shared.to_string();
                hoisted.push_str(&shared);
                remaining.replace_range(..shared.len(), "");
            }
        }
    }

    if !remaining.is_empty() {
        return Err(EnvlistError::hoist(prefix, "ran off the end of the factor"));
    }

    let mut out: Vec<GreenElement> = Vec::new();
    let mut rest = children[rest_from..].iter().peekable();
    match extra {
        Some(group) => {
            out.push(green::literal(&hoisted));
            out.push(NodeOrToken::Node(group));
        }
        None => {
            // Merge into a literal that directly follows
            let next_literal = rest
                .peek()
                .and_then(|e| e.as_node())
                .filter(|n| n.kind() == EnvSyntaxKind::Literal)
                .map(|n| n.text().to_string());
            match next_literal {
                Some(text) => {
                    out.push(green::literal(&format!("{hoisted}{text}")));
                    rest.next();
                }
                None if !hoisted.is_empty() => out.push(green::literal(&hoisted)),
                None => {}
            }
        }
    }
    out.extend(rest.map(green_of));
    Ok(green::node(EnvSyntaxKind::Factor, out))
}

/// Remove `prefix` from every alternative of `group`
fn strip_group(group: &Group, prefix: &str) -> Result<GreenNode> {
    let mut green = group.syntax().green().into_owned();
    for alternative in group.alternatives() {
        let stripped = strip_sequence(alternative.syntax(), prefix)?;
        green = green.replace_child(alternative.syntax().index(), NodeOrToken::Node(stripped));
    }
    Ok(green)
}

fn strip_sequence(sequence: &EnvSyntaxNode, prefix: &str) -> Result<GreenNode> {
    let Some(first) = sequence.children().find(|n| n.kind() == EnvSyntaxKind::Factor) else {
        return Err(EnvlistError::hoist(prefix, "alternative is empty"));
    };
    let stripped = strip_factor(&first, prefix)?;
    Ok(sequence
        .green()
        .replace_child(first.index(), NodeOrToken::Node(stripped)))
}

/// Drop `prefix` from the leading atoms of a factor
fn strip_factor(factor: &EnvSyntaxNode, prefix: &str) -> Result<GreenNode> {
    let mut remaining = prefix;
    let mut out: Vec<GreenElement> = Vec::new();
    let mut children = factor.children_with_tokens();

    for child in children.by_ref() {
        if remaining.is_empty() {
            out.push(green_of(&child));
            break;
        }
        let Some(atom) = child.as_node().cloned().and_then(Atom::cast) else {
            out.push(green_of(&child));
            continue;
        };
        match atom {
            Atom::Literal(literal) => {
                let text = literal.text();
                if let Some(tail) = text.strip_prefix(remaining) {
                    if !tail.is_empty() {
                        out.push(green::literal(tail));
                    }
                    remaining = "";
                } else if let Some(rest) = remaining.strip_prefix(text.as_str()) {
                    remaining = rest;
                } else {
                    return Err(EnvlistError::hoist(
                        prefix,
                        format!("'{text}' does not start with '{remaining}'"),
                    ));
                }
            }
            Atom::Group(group) if group.starts_with(remaining) => {
                out.push(NodeOrToken::Node(strip_group(&group, remaining)?));
                remaining = "";
            }
            Atom::Group(group) => {
                return Err(EnvlistError::hoist(
                    prefix,
                    format!("'{}' does not start with '{remaining}'", group.syntax().text()),
                ));
            }
        }
    }

    if !remaining.is_empty() {
        return Err(EnvlistError::hoist(prefix, "alternative is shorter than the prefix"));
    }
    out.extend(children.map(|c| green_of(&c)));
    Ok(green::node(EnvSyntaxKind::Factor, out))
}

impl Editor {
    /// Move `prefix` out of the first factor of every matching entry
    pub fn hoist_prefix(
        &self,
        tree: &EnvList,
        predicate: &EntryPredicate,
        prefix: &str,
    ) -> Result<EnvList> {
        if prefix.is_empty() {
            return Err(EnvlistError::hoist(prefix, "prefix is empty"));
        }
        if prefix.contains('-') {
            return Err(EnvlistError::hoist(prefix, "prefix spans a hyphen"));
        }
        debug!(prefix, %predicate, "hoisting prefix");

        rewrite_sequences(tree, predicate, |sequence| {
            let Some(first) = sequence
                .children()
                .find(|n| n.kind() == EnvSyntaxKind::Factor)
            else {
                return Err(EnvlistError::hoist(prefix, "entry has no factors"));
            };
            let hoisted = hoist_factor(&first, prefix)?;
            Ok(sequence
                .green()
                .replace_child(first.index(), NodeOrToken::Node(hoisted)))
        })
    }
}
