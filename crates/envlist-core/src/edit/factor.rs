//! Factor-level edits: insert, remove, rename

use std::collections::BTreeMap;

use rowan::{GreenNode, NodeOrToken};
use tracing::debug;

use super::environment::{EntryEdit, apply_entry_edits, rewrite_sequences};
use super::green::{self, green_of};
use super::{Editor, EntryPredicate, Position, validate_factor};
use crate::cst::ast::{AstNode, EnvList, Factor};
use crate::cst::{EnvSyntaxKind, EnvSyntaxNode, GreenElement, parse};
use crate::error::EnvlistError;
use crate::result::Result;

/// Outcome of rewriting a sequence
enum Rewrite {
    Unchanged,
    Changed(GreenNode),
    Removed,
}

enum FactorRewrite {
    Unchanged,
    Changed(GreenNode),
    Removed,
    /// A collapsed group turned this factor into several hyphen-joined ones
    Spliced(Vec<GreenElement>),
}

enum GroupRewrite {
    Unchanged,
    Changed(GreenNode),
    Removed,
    /// One alternative is left; `braced` keeps it inside the braces
    Collapsed {
        alternative: GreenNode,
        braced: GreenNode,
    },
}

/// One comma-separated slot of a group with the trivia around it
#[derive(Default)]
struct Alternative {
    before: Vec<GreenElement>,
    sequence: Option<EnvSyntaxNode>,
    after: Vec<GreenElement>,
}

struct FactorRemover<'a> {
    name: &'a str,
    collapse: bool,
}

impl FactorRemover<'_> {
    fn sequence(&self, sequence: &EnvSyntaxNode) -> Rewrite {
        let mut segments: Vec<(Vec<GreenElement>, GreenNode)> = Vec::new();
        let mut pending = Vec::new();
        let mut changed = false;

        for child in sequence.children_with_tokens() {
            let factor = match child {
                NodeOrToken::Node(node) => node,
                NodeOrToken::Token(token) => {
                    pending.push(NodeOrToken::Token(token.green().to_owned()));
                    continue;
                }
            };
            let separator = std::mem::take(&mut pending);
            match self.factor(&factor) {
                FactorRewrite::Unchanged => segments.push((separator, factor.green().into_owned())),
                FactorRewrite::Changed(green) => {
                    changed = true;
                    segments.push((separator, green));
                }
                FactorRewrite::Removed => changed = true,
                FactorRewrite::Spliced(elements) => {
                    changed = true;
                    let mut separator = separator;
                    let mut inner = Vec::new();
                    for element in elements {
                        match element {
                            NodeOrToken::Node(node) => {
                                let mut sep = std::mem::take(&mut separator);
                                sep.append(&mut inner);
                                segments.push((sep, node));
                            }
                            token => inner.push(token),
                        }
                    }
                }
            }
        }

        if !changed {
            return Rewrite::Unchanged;
        }
        if segments.iter().all(|(_, factor)| !has_atoms(factor)) {
            return Rewrite::Removed;
        }

        let mut out = Vec::new();
        for (i, (separator, factor)) in segments.into_iter().enumerate() {
            if i == 0 {
                // The first factor needs neither a hyphen nor the space after one
                let view = green::view(factor.clone());
                let factor = if green::leading_whitespace(&view).is_empty() {
                    factor
                } else {
                    green::with_leading_whitespace(&view, Vec::new())
                };
                out.push(NodeOrToken::Node(factor));
            } else {
                out.extend(separator);
                out.push(NodeOrToken::Node(factor));
            }
        }
        out.extend(pending);
        Rewrite::Changed(green::node(EnvSyntaxKind::Sequence, out))
    }

    fn factor(&self, factor: &EnvSyntaxNode) -> FactorRewrite {
        let typed = Factor::cast(factor.clone());
        if typed
            .as_ref()
            .and_then(Factor::single_literal)
            .is_some_and(|literal| literal.text() == self.name)
        {
            return FactorRewrite::Removed;
        }
        let atom_count = typed.map(|f| f.atoms().count()).unwrap_or(0);

        let mut out = Vec::new();
        let mut changed = false;
        for child in factor.children_with_tokens() {
            let group = match &child {
                NodeOrToken::Node(node) if node.kind() == EnvSyntaxKind::Group => node.clone(),
                _ => {
                    out.push(green_of(&child));
                    continue;
                }
            };
            match self.group(&group) {
                GroupRewrite::Unchanged => out.push(green_of(&child)),
                GroupRewrite::Changed(green) => {
                    changed = true;
                    out.push(NodeOrToken::Node(green));
                }
                GroupRewrite::Removed => changed = true,
                GroupRewrite::Collapsed {
                    alternative,
                    braced,
                } => {
                    changed = true;
                    let alternative = green::view(alternative);
                    let factors: Vec<EnvSyntaxNode> = alternative
                        .children()
                        .filter(|n| n.kind() == EnvSyntaxKind::Factor)
                        .collect();
                    match factors.as_slice() {
                        [] => {}
                        [only] => out.extend(green::children(only)),
                        _ if atom_count == 1 => {
                            return FactorRewrite::Spliced(green::children(&alternative));
                        }
                        // `py{lint,a-b}`: braces are needed to keep `py` on `a`
                        _ => out.push(NodeOrToken::Node(braced)),
                    }
                }
            }
        }

        if !changed {
            FactorRewrite::Unchanged
        } else if !out.iter().any(|e| e.as_node().is_some()) {
            FactorRewrite::Removed
        } else {
            FactorRewrite::Changed(green::node(EnvSyntaxKind::Factor, out))
        }
    }

    fn group(&self, group: &EnvSyntaxNode) -> GroupRewrite {
        let mut items: Vec<Alternative> = Vec::new();
        let mut current = Alternative::default();
        for child in group.children_with_tokens() {
            match child.kind() {
                EnvSyntaxKind::LBrace => {}
                EnvSyntaxKind::Comma | EnvSyntaxKind::RBrace => {
                    items.push(std::mem::take(&mut current));
                }
                EnvSyntaxKind::Sequence => current.sequence = child.into_node(),
                _ if current.sequence.is_none() => current.before.push(green_of(&child)),
                _ => current.after.push(green_of(&child)),
            }
        }

        let mut kept: Vec<(usize, GreenNode)> = Vec::new();
        let mut changed = false;
        for (index, item) in items.iter().enumerate() {
            let Some(sequence) = &item.sequence else {
                continue;
            };
            match self.sequence(sequence) {
                Rewrite::Unchanged => kept.push((index, sequence.green().into_owned())),
                Rewrite::Changed(green) => {
                    changed = true;
                    kept.push((index, green));
                }
                Rewrite::Removed => changed = true,
            }
        }

        if !changed {
            return GroupRewrite::Unchanged;
        }
        if kept.is_empty() {
            return GroupRewrite::Removed;
        }

        let last = kept.len() - 1;
        let mut out = vec![green::token(EnvSyntaxKind::LBrace, "{")];
        for (i, (index, sequence)) in kept.iter().enumerate() {
            if i > 0 {
                out.push(green::token(EnvSyntaxKind::Comma, ","));
            }
            // Keep the spacing just inside the braces where it was
            let before = if i == 0 { &items[0].before } else { &items[*index].before };
            let after = if i == last {
                items.last().map(|a| &a.after).unwrap_or(&items[*index].after)
            } else {
                &items[*index].after
            };
            out.extend(before.iter().cloned());
            out.push(NodeOrToken::Node(sequence.clone()));
            out.extend(after.iter().cloned());
        }
        out.push(green::token(EnvSyntaxKind::RBrace, "}"));
        let braced = green::node(EnvSyntaxKind::Group, out);

        if kept.len() == 1 && items.len() > 1 && self.collapse {
            GroupRewrite::Collapsed {
                alternative: kept[0].1.clone(),
                braced,
            }
        } else {
            GroupRewrite::Changed(braced)
        }
    }
}

fn has_atoms(factor: &GreenNode) -> bool {
    factor.children().any(|c| c.as_node().is_some())
}

/// Replace every literal equal to `old`; payloads are left alone
fn rename_literals(node: &EnvSyntaxNode, old: &str, new: &str) -> Option<GreenNode> {
    if node.kind() == EnvSyntaxKind::Literal {
        return (node.text() == old).then(|| {
            green::node(
                EnvSyntaxKind::Literal,
                vec![green::token(EnvSyntaxKind::Word, new)],
            )
        });
    }

    let mut rebuilt: Option<GreenNode> = None;
    for child in node.children() {
        if child.kind() == EnvSyntaxKind::Payload {
            continue;
        }
        if let Some(replacement) = rename_literals(&child, old, new) {
            let current = rebuilt.unwrap_or_else(|| node.green().into_owned());
            rebuilt = Some(current.replace_child(child.index(), NodeOrToken::Node(replacement)));
        }
    }
    rebuilt
}

/// Whitespace before the first hyphen of `sequence` and after it
///
/// The space after a hyphen is the leading trivia of the next factor.
fn hyphen_spacing(sequence: &EnvSyntaxNode) -> Option<(Vec<GreenElement>, Vec<GreenElement>)> {
    let hyphen = sequence
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == EnvSyntaxKind::Hyphen)?;
    let before = hyphen
        .prev_sibling_or_token()
        .filter(|e| e.kind() == EnvSyntaxKind::Whitespace)
        .map(|e| vec![green_of(&e)])
        .unwrap_or_default();
    let after = hyphen
        .next_sibling_or_token()
        .and_then(|e| e.into_node())
        .map(|factor| green::leading_whitespace(&factor))
        .unwrap_or_default();
    Some((before, after))
}

/// Whether existing groups write `{a, b}` rather than `{a,b}`
pub(super) fn group_comma_spacing(tree: &EnvList) -> Option<bool> {
    tree.syntax()
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| {
            t.kind() == EnvSyntaxKind::Comma
                && t.parent().is_some_and(|p| p.kind() == EnvSyntaxKind::Group)
        })
        .map(|comma| {
            comma
                .next_sibling_or_token()
                .is_some_and(|n| n.kind() == EnvSyntaxKind::Whitespace)
        })
}

fn fragment_group(text: &str) -> Result<GreenNode> {
    parse(text)?
        .syntax()
        .descendants()
        .find(|n| n.kind() == EnvSyntaxKind::Group)
        .map(|n| n.green().into_owned())
        .ok_or_else(|| EnvlistError::invalid_fragment(text, "expected a group"))
}

impl Editor {
    /// Add `factor` as a shared literal to every matching entry
    ///
    /// `py37` with `django` at the end becomes `py37-django`.
    pub fn insert_factor(
        &self,
        tree: &EnvList,
        predicate: &EntryPredicate,
        factor: &str,
        position: Position,
    ) -> Result<EnvList> {
        validate_factor(factor)?;
        let tree_spacing = tree
            .syntax()
            .descendants()
            .filter(|n| n.kind() == EnvSyntaxKind::Sequence)
            .find_map(|n| hyphen_spacing(&n));
        debug!(factor, ?position, "inserting factor");

        rewrite_sequences(tree, predicate, |sequence| {
            let mut children = green::children(sequence);
            if children.is_empty() {
                children.push(NodeOrToken::Node(green::node(
                    EnvSyntaxKind::Factor,
                    vec![green::literal(factor)],
                )));
                return Ok(green::node(EnvSyntaxKind::Sequence, children));
            }

            let (before, after) = hyphen_spacing(sequence)
                .or_else(|| tree_spacing.clone())
                .unwrap_or_default();
            let hyphen = green::token(EnvSyntaxKind::Hyphen, "-");
            match position {
                Position::Start => {
                    // The old first factor now follows a hyphen
                    if let Some(NodeOrToken::Node(first)) = children.first() {
                        let first = green::view(first.clone());
                        children[0] =
                            NodeOrToken::Node(green::with_leading_whitespace(&first, after));
                    }
                    let mut head = vec![NodeOrToken::Node(green::node(
                        EnvSyntaxKind::Factor,
                        vec![green::literal(factor)],
                    ))];
                    head.extend(before);
                    head.push(hyphen);
                    head.append(&mut children);
                    children = head;
                }
                Position::End => {
                    let mut atoms = after;
                    atoms.push(green::literal(factor));
                    children.extend(before);
                    children.push(hyphen);
                    children.push(NodeOrToken::Node(green::node(EnvSyntaxKind::Factor, atoms)));
                }
            }
            Ok(green::node(EnvSyntaxKind::Sequence, children))
        })
    }

    /// Make every matching entry appear both with and without `factor`
    ///
    /// `py37` becomes `py37{,-cov}` at the end or `{,cov-}py37` at the start.
    pub fn insert_factor_variant(
        &self,
        tree: &EnvList,
        predicate: &EntryPredicate,
        factor: &str,
        position: Position,
    ) -> Result<EnvList> {
        validate_factor(factor)?;
        let spaced = group_comma_spacing(tree).unwrap_or(self.options().group_comma_space);
        let comma = if spaced { ", " } else { "," };
        let group = match position {
            Position::End => fragment_group(&format!("{{{comma}-{factor}}}"))?,
            Position::Start => fragment_group(&format!("{{{comma}{factor}-}}"))?,
        };
        debug!(factor, ?position, spaced, "inserting optional factor");

        rewrite_sequences(tree, predicate, |sequence| {
            let factors: Vec<EnvSyntaxNode> = sequence
                .children()
                .filter(|n| n.kind() == EnvSyntaxKind::Factor)
                .collect();
            let target = match position {
                Position::Start => factors.first(),
                Position::End => factors.last(),
            };
            let Some(target) = target else {
                let factor =
                    green::node(EnvSyntaxKind::Factor, vec![NodeOrToken::Node(group.clone())]);
                return Ok(green::node(
                    EnvSyntaxKind::Sequence,
                    vec![NodeOrToken::Node(factor)],
                ));
            };

            let mut atoms = green::children(target);
            match position {
                Position::Start => atoms.insert(0, NodeOrToken::Node(group.clone())),
                Position::End => atoms.push(NodeOrToken::Node(group.clone())),
            }
            let rebuilt = green::node(EnvSyntaxKind::Factor, atoms);
            Ok(sequence
                .green()
                .replace_child(target.index(), NodeOrToken::Node(rebuilt)))
        })
    }

    /// Remove every factor that is exactly `factor`
    ///
    /// Alternatives left empty are dropped, a group left with one alternative
    /// collapses into it, and an entry left empty is removed with its separator.
    pub fn remove_factor(&self, tree: &EnvList, factor: &str) -> Result<EnvList> {
        validate_factor(factor)?;
        let remover = FactorRemover {
            name: factor,
            collapse: self.options().collapse_single_alternative,
        };

        let mut edits = BTreeMap::new();
        for entry in tree.entries() {
            let Some(sequence) = entry.sequence() else {
                continue;
            };
            let index = entry.syntax().index();
            match remover.sequence(sequence.syntax()) {
                Rewrite::Unchanged => {}
                Rewrite::Changed(green) => {
                    let updated = entry
                        .syntax()
                        .green()
                        .replace_child(sequence.syntax().index(), NodeOrToken::Node(green));
                    edits.insert(index, EntryEdit::Replace(updated));
                }
                Rewrite::Removed => {
                    edits.insert(index, EntryEdit::Remove);
                }
            }
        }

        if edits.is_empty() {
            return Err(EnvlistError::not_found(format!("factor '{factor}'")));
        }
        debug!(factor, entries = edits.len(), "removed factor");
        Ok(apply_entry_edits(tree, edits))
    }

    /// Rename every literal equal to `old`
    pub fn rename_factor(&self, tree: &EnvList, old: &str, new: &str) -> Result<EnvList> {
        validate_factor(old)?;
        validate_factor(new)?;
        if old == new {
            return Ok(tree.clone());
        }

        let edits: BTreeMap<usize, EntryEdit> = tree
            .entries()
            .filter_map(|entry| {
                rename_literals(entry.syntax(), old, new)
                    .map(|green| (entry.syntax().index(), EntryEdit::Replace(green)))
            })
            .collect();

        if edits.is_empty() {
            return Err(EnvlistError::not_found(format!("factor '{old}'")));
        }
        debug!(old, new, entries = edits.len(), "renamed factor");
        Ok(apply_entry_edits(tree, edits))
    }
}
