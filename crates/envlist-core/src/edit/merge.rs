//! Folding a new environment name into an existing entry
//!
//! An entry is read as `left{alternatives}right`, where at most one group
//! varies. A new name keeps whatever it shares with `left` and `right`; the
//! rest of the entry moves into the alternatives and the new name's own
//! middle joins them. `py38` plus `py39` becomes `py3{8,9}`.

use rowan::NodeOrToken;
use tracing::debug;

use super::environment::{parse_single_entry, rewrite_sequences};
use super::factor::group_comma_spacing;
use super::{Editor, EntryPredicate};
use crate::cst::ast::{Atom, AstNode, EnvList, Factor, Sequence};
use crate::cst::{EnvSyntaxKind, tokenize};
use crate::error::EnvlistError;
use crate::expand::{Expand, shared_prefix};
use crate::result::Result;

/// A sequence flattened to `left`, one varying group, and `right`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bucket {
    left: String,
    middle: Option<Vec<String>>,
    right: String,
}

impl Bucket {
    fn of(sequence: &Sequence) -> Result<Self> {
        let mut bucket = Bucket {
            left: String::new(),
            middle: None,
            right: String::new(),
        };

        for child in sequence.syntax().children_with_tokens() {
            let factor = match child {
                NodeOrToken::Token(token) if token.kind() == EnvSyntaxKind::Hyphen => {
                    bucket.push("-");
                    continue;
                }
                NodeOrToken::Token(_) => continue,
                NodeOrToken::Node(node) => node,
            };
            let Some(factor) = Factor::cast(factor) else {
                continue;
            };
            for atom in factor.atoms() {
                match atom {
                    Atom::Literal(literal) => bucket.push(&literal.text()),
                    Atom::Group(group) => match group.one() {
                        Some(one) => bucket.push(&one),
                        None if bucket.middle.is_some() => {
                            return Err(EnvlistError::invalid_fragment(
                                sequence.syntax().text().to_string(),
                                "more than one group varies",
                            ));
                        }
                        None => bucket.middle = Some(group.expand()),
                    },
                }
            }
        }
        Ok(bucket)
    }

    fn push(&mut self, text: &str) {
        if self.middle.is_some() {
            self.right.push_str(text);
        } else {
            self.left.push_str(text);
        }
    }

    /// Text of the bucket with `name` added as an alternative
    fn add(self, name: &str, comma: &str) -> String {
        let Bucket {
            left,
            middle,
            right,
        } = self;

        // No alternative may start or end with a hyphen.
        let mut i = shared_prefix(name, &left).len();
        while i > 0 && (left[i..].starts_with('-') || name[i..].starts_with('-')) {
            i -= last_char_len(&left[..i]);
        }
        let rest = &name[i..];
        let mut j = shared_suffix_len(rest, &right);
        while j > 0
            && (right[..right.len() - j].ends_with('-') || rest[..rest.len() - j].ends_with('-'))
        {
            j -= right[right.len() - j..].chars().next().map_or(0, char::len_utf8);
        }

        let (keep_left, moved_left) = left.split_at(i);
        let (moved_right, keep_right) = right.split_at(right.len() - j);
        let mut alternatives: Vec<String> = middle
            .unwrap_or_else(|| vec![String::new()])
            .into_iter()
            .map(|alt| format!("{moved_left}{alt}{moved_right}"))
            .collect();
        alternatives.push(rest[..rest.len() - j].to_string());

        format!("{keep_left}{{{}}}{keep_right}", alternatives.join(comma))
    }
}

/// Byte length of the longest common suffix, on a char boundary
fn shared_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}

fn last_char_len(text: &str) -> usize {
    text.chars().next_back().map_or(0, char::len_utf8)
}

/// An environment name is words joined by hyphens
fn validate_name(name: &str) -> Result<()> {
    let tokens = tokenize(name);
    if tokens.is_empty() {
        return Err(EnvlistError::invalid_fragment(name, "environment name is empty"));
    }
    if tokens
        .iter()
        .any(|t| !matches!(t.kind, EnvSyntaxKind::Word | EnvSyntaxKind::Hyphen))
    {
        return Err(EnvlistError::invalid_fragment(
            name,
            "environment name must not contain whitespace, braces, commas or colons",
        ));
    }
    Ok(())
}

impl Editor {
    /// Fold `name` into every matching entry as one more alternative
    ///
    /// `py{38,39}-foo` with `py310-foo` becomes `py{38,39,310}-foo`; with
    /// `py310-bar` it becomes `py{38-foo,39-foo,310-bar}`.
    pub fn add_to_entry(
        &self,
        tree: &EnvList,
        predicate: &EntryPredicate,
        name: &str,
    ) -> Result<EnvList> {
        validate_name(name)?;
        let spaced = group_comma_spacing(tree).unwrap_or(self.options().group_comma_space);
        let comma = if spaced { ", " } else { "," };
        debug!(name, %predicate, "adding name to entry");

        rewrite_sequences(tree, predicate, |sequence| {
            let Some(sequence) = Sequence::cast(sequence.clone()) else {
                return Err(EnvlistError::not_found(predicate.to_string()));
            };
            let text = Bucket::of(&sequence)?.add(name, comma);
            parse_single_entry(&text)?
                .sequence()
                .map(|s| s.syntax().green().into_owned())
                .ok_or_else(|| EnvlistError::invalid_fragment(text, "expected a sequence"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse;
    use crate::error::ErrorKind;

    fn add(source: &str, name: &str) -> String {
        let list = parse(source).expect("parse");
        Editor::new()
            .add_to_entry(&list, &EntryPredicate::All, name)
            .expect("add")
            .text()
    }

    fn bucket(source: &str) -> Bucket {
        let list = parse(source).expect("parse");
        let sequence = list
            .entries()
            .next()
            .and_then(|e| e.sequence())
            .expect("sequence");
        Bucket::of(&sequence).expect("bucket")
    }

    #[test]
    fn test_bucket() {
        assert_eq!(
            bucket("py38"),
            Bucket {
                left: "py38".into(),
                middle: None,
                right: String::new(),
            }
        );
        assert_eq!(
            bucket("py{38,39}"),
            Bucket {
                left: "py".into(),
                middle: Some(vec!["38".into(), "39".into()]),
                right: String::new(),
            }
        );
        assert_eq!(
            bucket("pyx{38,39}{x}foo"),
            Bucket {
                left: "pyx".into(),
                middle: Some(vec!["38".into(), "39".into()]),
                right: "xfoo".into(),
            }
        );
    }

    #[test]
    fn test_add_grows_alternatives() {
        let mut source = "py38".to_string();
        for (name, expected) in [
            ("py39", "py3{8,9}"),
            ("py310", "py3{8,9,10}"),
            ("py", "py{38,39,310,}"),
            ("z", "{py38,py39,py310,py,z}"),
        ] {
            source = add(&source, name);
            assert_eq!(source, expected);
        }
    }

    #[test]
    fn test_add_without_shared_prefix() {
        assert_eq!(add("py38", "38"), "{py38,38}");
    }

    #[test]
    fn test_add_keeps_shared_suffix() {
        assert_eq!(add("py{38,39}-foo", "py310-foo"), "py{38,39,310}-foo");
        assert_eq!(add("py{38,39}-foo", "py310-bar"), "py{38-foo,39-foo,310-bar}");
        assert_eq!(add("py{38,39}-foo", "pyfoo"), "py{38-f,39-f,f}oo");
    }

    #[test]
    fn test_add_keeps_hyphens_inside_alternatives() {
        assert_eq!(add("py38", "py38-x"), "py3{8,8-x}");
        assert_eq!(add("py-a", "pyb"), "p{y-a,yb}");
    }

    #[test]
    fn test_add_keeps_entry_trivia() {
        let list = parse("  py38: pytest  # pinned\nlint").expect("parse");
        let edited = Editor::new()
            .add_to_entry(&list, &EntryPredicate::Matches("py38".into()), "py39")
            .expect("add");
        assert_eq!(edited.text(), "  py3{8,9}: pytest  # pinned\nlint");
    }

    #[test]
    fn test_add_copies_group_spacing() {
        assert_eq!(add("py{37, 38}", "py39"), "py{37, 38, 39}");
    }

    #[test]
    fn test_add_errors() {
        let list = parse("{a,b}-{c,d}").expect("parse");
        let err = Editor::new()
            .add_to_entry(&list, &EntryPredicate::All, "x")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFragment);

        let list = parse("py38").expect("parse");
        for name in ["", "py 39", "py{39}"] {
            let err = Editor::new()
                .add_to_entry(&list, &EntryPredicate::All, name)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFragment, "{name:?}");
        }

        let err = Editor::new()
            .add_to_entry(&list, &EntryPredicate::Matches("lint".into()), "py39")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
