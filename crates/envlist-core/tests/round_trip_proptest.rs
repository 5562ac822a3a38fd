//! Property-based round-trip tests for the lexer and parser

use envlist_core::{parse, render, tokenize};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z0-9._]{1,6}"
}

fn spacing() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just(" ".to_string()), Just("  ".to_string())]
}

/// Brace-balanced factor expressions
fn sequence() -> impl Strategy<Value = String> {
    word().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (prop::collection::vec(inner.clone(), 1..4), spacing()).prop_map(
                |(alternatives, ws)| format!("{{{}}}", alternatives.join(&format!(",{ws}")))
            ),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a}{b}")),
            (inner.clone(), spacing(), inner).prop_map(|(a, ws, b)| format!("{a}{ws}-{ws}{b}")),
        ]
    })
}

fn entry() -> impl Strategy<Value = String> {
    (
        spacing(),
        sequence(),
        prop::option::of("[a-z<>=0-9,]{1,8}"),
        prop::option::of(Just("  # note")),
    )
        .prop_map(|(indent, sequence, payload, comment)| {
            let mut entry = format!("{indent}{sequence}");
            if let Some(payload) = payload {
                entry.push_str(": ");
                entry.push_str(&payload);
            }
            if let Some(comment) = comment {
                entry.push_str(comment);
            }
            entry
        })
}

fn envlist() -> impl Strategy<Value = String> {
    let separator = prop_oneof![Just("\n"), Just(", "), Just(","), Just(",\n"), Just("\n\n")];
    prop::collection::vec((entry(), separator), 0..6).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(entry, sep)| format!("{entry}{sep}"))
            .collect()
    })
}

proptest! {
    #[test]
    fn test_tokens_cover_input(input in "\\PC*") {
        let rebuilt: String = tokenize(&input).into_iter().map(|t| t.text).collect();
        prop_assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_parse_is_lossless_when_it_succeeds(input in "\\PC*") {
        if let Ok(list) = parse(&input) {
            prop_assert_eq!(render(&list), input);
        }
    }

    #[test]
    fn test_balanced_envlists_round_trip(input in envlist()) {
        let list = parse(&input).expect("balanced input parses");
        prop_assert_eq!(render(&list), input);
    }
}
