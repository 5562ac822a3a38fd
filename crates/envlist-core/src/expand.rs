//! Expansion of envlist trees into concrete environment names
//!
//! Groups are unions of their alternatives, factors concatenate the
//! products of their atoms, and sequences join the products of their factors
//! with `-`. Products iterate the rightmost part fastest. Duplicate names are
//! kept in order.

use std::collections::BTreeSet;

use crate::cst::ast::{Atom, Entry, EnvList, Factor, Group, Literal, Sequence};

/// Anything that denotes an ordered list of environment names
pub trait Expand {
    /// All names, in declaration order
    fn expand(&self) -> Vec<String>;

    /// Every name starts with `prefix`
    fn starts_with(&self, prefix: &str) -> bool {
        self.expand().iter().all(|name| name.starts_with(prefix))
    }

    /// Every name ends with `suffix`
    fn ends_with(&self, suffix: &str) -> bool {
        self.expand().iter().all(|name| name.ends_with(suffix))
    }

    /// Every name is exactly `value`
    fn only(&self, value: &str) -> bool {
        self.expand().iter().all(|name| name == value)
    }

    /// No name has any text
    fn is_empty(&self) -> bool {
        self.expand().iter().all(String::is_empty)
    }

    /// Longest prefix shared by every name; `None` when there are no names
    fn common_prefix(&self) -> Option<String> {
        let names = self.expand();
        let (first, rest) = names.split_first()?;
        let mut prefix = first.as_str();
        for name in rest {
            prefix = shared_prefix(prefix, name);
        }
        Some(prefix.to_string())
    }

    /// The single distinct name, if all names agree
    fn one(&self) -> Option<String> {
        let distinct: BTreeSet<String> = self.expand().into_iter().collect();
        if distinct.len() == 1 {
            distinct.into_iter().next()
        } else {
            None
        }
    }

    /// Hyphen-delimited factors present in every name
    fn common_factors(&self) -> BTreeSet<String> {
        let mut names = self.expand().into_iter();
        let Some(first) = names.next() else {
            return BTreeSet::new();
        };
        let mut common: BTreeSet<String> = first.split('-').map(str::to_string).collect();
        for name in names {
            let factors: BTreeSet<&str> = name.split('-').collect();
            common.retain(|f| factors.contains(f.as_str()));
        }
        common
    }
}

/// Expand any expandable node
pub fn expand<T: Expand + ?Sized>(node: &T) -> Vec<String> {
    node.expand()
}

/// Longest common prefix of two strings, on a char boundary
pub(crate) fn shared_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}

/// Cartesian product of `parts`, rightmost fastest, joined with `sep`
fn product(parts: impl IntoIterator<Item = Vec<String>>, sep: &str) -> Vec<String> {
    let mut acc: Option<Vec<String>> = None;
    for part in parts {
        acc = Some(match acc {
            None => part,
            Some(prev) => prev
                .iter()
                .flat_map(|left| part.iter().map(move |right| format!("{left}{sep}{right}")))
                .collect(),
        });
    }
    acc.unwrap_or_else(|| vec![String::new()])
}

impl Expand for Literal {
    fn expand(&self) -> Vec<String> {
        vec![self.text()]
    }
}

impl Expand for Group {
    fn expand(&self) -> Vec<String> {
        self.alternatives().flat_map(|alt| alt.expand()).collect()
    }
}

impl Expand for Atom {
    fn expand(&self) -> Vec<String> {
        match self {
            Atom::Literal(literal) => literal.expand(),
            Atom::Group(group) => group.expand(),
        }
    }
}

impl Expand for Factor {
    fn expand(&self) -> Vec<String> {
        product(self.atoms().map(|atom| atom.expand()), "")
    }
}

impl Expand for Sequence {
    fn expand(&self) -> Vec<String> {
        product(self.factors().map(|factor| factor.expand()), "-")
    }
}

impl Expand for Entry {
    fn expand(&self) -> Vec<String> {
        self.sequence()
            .map(|seq| seq.expand())
            .unwrap_or_else(|| vec![String::new()])
    }
}

impl Expand for EnvList {
    fn expand(&self) -> Vec<String> {
        self.entries().flat_map(|entry| entry.expand()).collect()
    }
}
