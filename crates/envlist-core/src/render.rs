//! Serializing trees back to text
//!
//! Rendering is the concatenation of every token in tree order. Edited trees
//! reuse the original tokens for everything they did not touch, so comparing
//! the renders of two trees with [`changed_spans`] shows exactly what an edit
//! changed.

use std::fmt;
use std::ops::Range;

use similar::{DiffTag, TextDiff};

use crate::cst::ast::{AstNode, EnvList};

/// Render a tree to text
pub fn render(tree: &EnvList) -> String {
    tree.syntax().text().to_string()
}

impl fmt::Display for EnvList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.syntax().text())
    }
}

/// A changed region, as byte ranges into the original and edited text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedSpan {
    pub original: Range<usize>,
    pub edited: Range<usize>,
}

/// Byte ranges where `edited` differs from `original`
///
/// Diffs by character; adjacent insertions and deletions are merged.
pub fn changed_spans(original: &str, edited: &str) -> Vec<ChangedSpan> {
    let diff = TextDiff::from_chars(original, edited);
    let old_offsets = char_offsets(original);
    let new_offsets = char_offsets(edited);

    let mut spans: Vec<ChangedSpan> = Vec::new();
    for op in diff.ops() {
        let (tag, old, new) = op.as_tag_tuple();
        if tag == DiffTag::Equal {
            continue;
        }
        let span = ChangedSpan {
            original: old_offsets[old.start]..old_offsets[old.end],
            edited: new_offsets[new.start]..new_offsets[new.end],
        };
        match spans.last_mut() {
            Some(last)
                if last.original.end == span.original.start
                    && last.edited.end == span.edited.start =>
            {
                last.original.end = span.original.end;
                last.edited.end = span.edited.end;
            }
            _ => spans.push(span),
        }
    }
    spans
}

/// Byte offset of every char boundary, including the end
fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse;

    #[test]
    fn test_render_is_identity() {
        let source = "\n  py{37, 38}-django # matrix\n\n  lint: flake8\n";
        let list = parse(source).unwrap();
        assert_eq!(render(&list), source);
        assert_eq!(list.to_string(), source);
    }

    #[test]
    fn test_no_changes() {
        assert!(changed_spans("py37, lint", "py37, lint").is_empty());
    }

    #[test]
    fn test_deletion_span() {
        let spans = changed_spans("py37, lint, docs", "py37, docs");
        assert_eq!(
            spans,
            vec![ChangedSpan {
                original: 6..12,
                edited: 6..6,
            }]
        );
    }

    #[test]
    fn test_replacement_uses_byte_offsets() {
        let spans = changed_spans("é-a", "é-b");
        assert_eq!(
            spans,
            vec![ChangedSpan {
                original: 3..4,
                edited: 3..4,
            }]
        );
    }
}
