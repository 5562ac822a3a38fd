//! Entry-level edits and separator bookkeeping
//!
//! Entries own their indentation and trailing comment; commas, newlines and
//! full-line comments sit between entries on the root. Adding or removing an
//! entry therefore has to add or drop separators too, copying whatever style
//! the neighbouring entries already use.

use std::collections::BTreeMap;

use rowan::{GreenNode, NodeOrToken};
use tracing::debug;

use super::Editor;
use super::EntryPredicate;
use super::green::{self, green_of, is_kind};
use crate::cst::ast::{AstNode, Entry, EnvList};
use crate::cst::{EnvSyntaxElement, EnvSyntaxKind, EnvSyntaxNode, GreenElement, parse};
use crate::error::EnvlistError;
use crate::result::Result;

/// Change to one entry, keyed by its child index under the root
pub(super) enum EntryEdit {
    Replace(GreenNode),
    Remove,
}

/// Rebuild the root with `edits` applied
pub(super) fn apply_entry_edits(list: &EnvList, edits: BTreeMap<usize, EntryEdit>) -> EnvList {
    let children: Vec<EnvSyntaxElement> = list.syntax().children_with_tokens().collect();
    let mut out: Vec<Option<GreenElement>> = children.iter().map(|c| Some(green_of(c))).collect();

    let mut removals = Vec::new();
    for (index, edit) in edits {
        match edit {
            EntryEdit::Replace(entry) => out[index] = Some(NodeOrToken::Node(entry)),
            EntryEdit::Remove => removals.push(index),
        }
    }
    // Ascending, so a removal can see what earlier ones already dropped
    for index in removals {
        remove_entry(&children, &mut out, index);
    }

    let root = green::node(EnvSyntaxKind::EnvList, out.into_iter().flatten().collect());
    EnvList::from_root(green::view(root))
}

/// Drop the entry at `index` together with one separator
///
/// Prefer the separator after the entry (`,` then newline); the last entry
/// takes the one before it instead.
fn remove_entry(children: &[EnvSyntaxElement], out: &mut [Option<GreenElement>], index: usize) {
    let inherited = out[index]
        .take()
        .and_then(|e| e.into_node())
        .map(|entry| green::leading_whitespace(&green::view(entry)))
        .unwrap_or_default();

    let mut pending = Vec::new();
    let mut dropped_comma = false;
    let mut dropped_newline = false;
    let mut next = index + 1;
    while let Some(child) = children.get(next) {
        match child.kind() {
            EnvSyntaxKind::Whitespace => pending.push(next),
            EnvSyntaxKind::Comma if !dropped_comma && !dropped_newline => {
                drop_all(out, &mut pending);
                out[next] = None;
                dropped_comma = true;
            }
            EnvSyntaxKind::Newline if !dropped_newline => {
                drop_all(out, &mut pending);
                out[next] = None;
                dropped_newline = true;
            }
            _ => break,
        }
        next += 1;
    }

    if dropped_comma || dropped_newline {
        // `a, lint, b` -> `a, b`: the next entry moves into the removed slot
        if dropped_comma && !dropped_newline {
            if let Some(Some(NodeOrToken::Node(entry))) = out.get(next) {
                let entry = green::view(entry.clone());
                if entry.kind() == EnvSyntaxKind::Entry {
                    out[next] = Some(NodeOrToken::Node(green::with_leading_whitespace(
                        &entry, inherited,
                    )));
                }
            }
        }
        return;
    }

    pending.clear();
    let mut dropped_newline = false;
    let mut prev = index;
    while prev > 0 {
        prev -= 1;
        if out[prev].is_none() {
            continue;
        }
        match children[prev].kind() {
            EnvSyntaxKind::Whitespace => pending.push(prev),
            EnvSyntaxKind::Newline if !dropped_newline => {
                drop_all(out, &mut pending);
                out[prev] = None;
                dropped_newline = true;
            }
            EnvSyntaxKind::Comma => {
                drop_all(out, &mut pending);
                out[prev] = None;
                break;
            }
            _ => break,
        }
    }
}

fn drop_all(out: &mut [Option<GreenElement>], indices: &mut Vec<usize>) {
    for index in indices.drain(..) {
        out[index] = None;
    }
}

/// Replace the sequence of every entry matching `predicate`
pub(super) fn rewrite_sequences(
    tree: &EnvList,
    predicate: &EntryPredicate,
    mut rewrite: impl FnMut(&EnvSyntaxNode) -> Result<GreenNode>,
) -> Result<EnvList> {
    let mut edits = BTreeMap::new();
    for entry in tree.entries().filter(|e| predicate.matches(e)) {
        let Some(sequence) = entry.sequence() else {
            continue;
        };
        let replacement = rewrite(sequence.syntax())?;
        let updated = entry
            .syntax()
            .green()
            .replace_child(sequence.syntax().index(), NodeOrToken::Node(replacement));
        edits.insert(entry.syntax().index(), EntryEdit::Replace(updated));
    }

    if edits.is_empty() {
        return Err(EnvlistError::not_found(predicate.to_string()));
    }
    debug!(%predicate, entries = edits.len(), "rewrote matching entries");
    Ok(apply_entry_edits(tree, edits))
}

/// Parse `spec` as exactly one entry
pub(super) fn parse_single_entry(spec: &str) -> Result<Entry> {
    let list = parse(spec.trim())
        .map_err(|err| EnvlistError::invalid_fragment(spec, err.to_string()))?;
    let mut entries = list.entries();
    match (entries.next(), entries.next()) {
        (Some(entry), None) if !entry.key().is_empty() => Ok(entry),
        _ => Err(EnvlistError::invalid_fragment(
            spec,
            "expected exactly one environment",
        )),
    }
}

/// Separator tokens at the start of `run`, stopping at a comment
fn copy_separator(run: &[EnvSyntaxElement]) -> Vec<GreenElement> {
    run.iter()
        .take_while(|e| {
            matches!(
                e.kind(),
                EnvSyntaxKind::Comma | EnvSyntaxKind::Newline | EnvSyntaxKind::Whitespace
            )
        })
        .map(green_of)
        .collect()
}

impl Editor {
    /// Append an entry after the last one, copying the list's separator style
    pub fn add_environment(&self, tree: &EnvList, spec: &str) -> Result<EnvList> {
        let entry = parse_single_entry(spec)?;
        let children: Vec<EnvSyntaxElement> = tree.syntax().children_with_tokens().collect();
        let entries: Vec<usize> = children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind() == EnvSyntaxKind::Entry)
            .map(|(i, _)| i)
            .collect();

        let (insert_at, separator, leading) = match entries.as_slice() {
            [] => {
                let separator = match children.last().map(|c| c.kind()) {
                    None => Vec::new(),
                    Some(kind) if kind.is_separator() => Vec::new(),
                    Some(EnvSyntaxKind::Comment) => green::tokens("\n"),
                    Some(_) => self.default_separator(),
                };
                (children.len(), separator, Vec::new())
            }
            [.., last] => {
                let last = *last;
                let run = match entries.as_slice() {
                    [.., prev, _] => &children[prev + 1..last],
                    _ => &children[last + 1..],
                };
                let mut separator = copy_separator(run);
                if separator.is_empty() {
                    separator = self.default_separator();
                }

                let last_entry = children[last].as_node();
                // A trailing comment would swallow anything after it on the line
                let ends_in_comment = last_entry
                    .and_then(|n| n.last_token())
                    .is_some_and(|t| t.kind() == EnvSyntaxKind::Comment);
                let breaks_line = |sep: &Vec<GreenElement>| {
                    sep.iter().any(|e| is_kind(e, EnvSyntaxKind::Newline))
                };
                if ends_in_comment {
                    separator.retain(|e| !is_kind(e, EnvSyntaxKind::Comma));
                    if !breaks_line(&separator) {
                        separator = green::tokens("\n");
                    }
                }

                // After a newline the last entry's whitespace is indentation only
                // if that entry starts a line itself
                let starts_line =
                    last == 0 || children[last - 1].kind() == EnvSyntaxKind::Newline;
                let ends_in_space = separator
                    .last()
                    .is_some_and(|e| is_kind(e, EnvSyntaxKind::Whitespace));
                let leading = if ends_in_space || (breaks_line(&separator) && !starts_line) {
                    Vec::new()
                } else {
                    last_entry.map(green::leading_whitespace).unwrap_or_default()
                };
                (last + 1, separator, leading)
            }
        };

        let mut entry_children = leading;
        entry_children.extend(green::children(entry.syntax()));
        let new_entry = green::node(EnvSyntaxKind::Entry, entry_children);

        let mut out: Vec<GreenElement> = children[..insert_at].iter().map(green_of).collect();
        out.extend(separator);
        out.push(NodeOrToken::Node(new_entry));
        out.extend(children[insert_at..].iter().map(green_of));

        debug!(spec, "added environment");
        let root = green::node(EnvSyntaxKind::EnvList, out);
        Ok(EnvList::from_root(green::view(root)))
    }

    /// Remove every entry structurally equal to `spec`
    pub fn remove_environment(&self, tree: &EnvList, spec: &str) -> Result<EnvList> {
        let key = parse_single_entry(spec)?.key();
        let edits: BTreeMap<usize, EntryEdit> = tree
            .entries()
            .filter(|e| e.key() == key)
            .map(|e| (e.syntax().index(), EntryEdit::Remove))
            .collect();

        if edits.is_empty() {
            return Err(EnvlistError::not_found(format!("environment '{spec}'")));
        }
        debug!(spec, removed = edits.len(), "removed environments");
        Ok(apply_entry_edits(tree, edits))
    }

    fn default_separator(&self) -> Vec<GreenElement> {
        green::tokens(self.options().default_separator.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EditOptions, SeparatorStyle};
    use crate::error::ErrorKind;

    fn remove(source: &str, spec: &str) -> String {
        let list = parse(source).expect("parse");
        Editor::new()
            .remove_environment(&list, spec)
            .expect("remove")
            .text()
    }

    fn add(source: &str, spec: &str) -> String {
        let list = parse(source).expect("parse");
        Editor::new().add_environment(&list, spec).expect("add").text()
    }

    #[test]
    fn test_remove_from_comma_list() {
        assert_eq!(remove("py37, lint, docs", "lint"), "py37, docs");
        assert_eq!(remove("lint, py37", "lint"), "py37");
        assert_eq!(remove("py37, lint", "lint"), "py37");
        assert_eq!(remove("lint", "lint"), "");
    }

    #[test]
    fn test_remove_from_newline_list() {
        assert_eq!(
            remove("\n    py37\n    lint\n    docs\n", "lint"),
            "\n    py37\n    docs\n"
        );
        assert_eq!(remove("py37\nlint\n", "lint"), "py37\n");
        assert_eq!(remove("py37\n# keep\nlint", "lint"), "py37\n# keep");
        assert_eq!(remove("py37,\nlint,\ndocs", "lint"), "py37,\ndocs");
    }

    #[test]
    fn test_remove_matches_structure_not_spacing() {
        assert_eq!(
            remove("py{37,38}-django: pytest\nlint", "py{37, 38} - django"),
            "lint"
        );
        assert_eq!(remove("py37: pytest\nlint: flake8", "lint"), "py37: pytest");
    }

    #[test]
    fn test_remove_adjacent_duplicates() {
        assert_eq!(remove("a, x, x, b", "x"), "a, b");
    }

    #[test]
    fn test_remove_missing_environment() {
        let list = parse("py37, lint").expect("parse");
        let err = Editor::new().remove_environment(&list, "docs").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_add_copies_separator_style() {
        assert_eq!(add("py37, lint", "docs"), "py37, lint, docs");
        assert_eq!(add("py37,lint", "docs"), "py37,lint,docs");
        assert_eq!(
            add("\n    py37\n    lint\n", "docs"),
            "\n    py37\n    lint\n    docs\n"
        );
        assert_eq!(add("py37\n# style\nlint", " docs "), "py37\n# style\nlint\ndocs");
    }

    #[test]
    fn test_add_to_single_entry() {
        assert_eq!(add("py37", "lint"), "py37\nlint");
        assert_eq!(add("py37\n", "lint"), "py37\nlint\n");
        assert_eq!(add("  py37", "lint"), "  py37\n  lint");

        let list = parse("py37").expect("parse");
        let editor = Editor::with_options(EditOptions {
            default_separator: SeparatorStyle::CommaSpace,
            ..EditOptions::default()
        });
        assert_eq!(editor.add_environment(&list, "lint").unwrap().text(), "py37, lint");
    }

    #[test]
    fn test_add_after_trailing_comment() {
        let list = parse("py37 # note").expect("parse");
        let editor = Editor::with_options(EditOptions {
            default_separator: SeparatorStyle::CommaSpace,
            ..EditOptions::default()
        });
        assert_eq!(
            editor.add_environment(&list, "lint").unwrap().text(),
            "py37 # note\nlint"
        );
    }

    #[test]
    fn test_add_after_comment_in_comma_list() {
        assert_eq!(add("a, b # c", "d"), "a, b # c\nd");
        assert_eq!(add("a,\n  b # c", "d"), "a,\n  b # c\n  d");
    }

    #[test]
    fn test_add_to_empty_list() {
        assert_eq!(add("", "py37"), "py37");
        assert_eq!(add("# envs\n", "py37"), "# envs\npy37");
    }

    #[test]
    fn test_add_rejects_bad_specs() {
        let list = parse("py37").expect("parse");
        for spec in ["", "a, b", "a\nb", "py{37"] {
            let err = Editor::new().add_environment(&list, spec).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFragment, "spec {spec:?}");
        }
    }
}
