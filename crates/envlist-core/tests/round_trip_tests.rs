//! Byte-exact round trips and syntax errors

use envlist_core::{ErrorKind, RoundTripValidator, parse, render};

#[test]
fn test_round_trip_samples() {
    let samples = [
        "py{37,38}-django, lint",
        "\n    py37\n    # lint is slow\n    lint\n",
        "py37: pytest>=3,<4  # pinned\r\nlint\r\n",
        "{ a , b }-{c,\n  d}",
        "a,,b,",
        "x{,2}",
        "py#3 #tail",
        "ü{ö,ä}",
        "   ",
        "",
    ];

    let validator = RoundTripValidator::new();
    for sample in samples {
        let result = validator.validate_round_trip(sample);
        assert!(result.is_valid(), "{sample:?}: {:?}", result.issues());
        assert_eq!(render(&parse(sample).expect("parse")), sample);
    }
}

#[test]
fn test_unbalanced_braces_are_errors() {
    for (source, offset) in [("py{37", 2), ("py37}", 4), ("a, {b, {c}", 3), ("}", 0)] {
        let err = parse(source).expect_err(source);
        assert_eq!(err.kind(), ErrorKind::Syntax, "{source}");
        assert_eq!(err.offset(), Some(offset), "{source}");
    }
}

#[test]
fn test_braces_in_payload_and_comments_are_ignored() {
    for source in ["django: {weird", "lint # }", "# {\npy37"] {
        assert!(parse(source).is_ok(), "{source}");
    }
}

#[test]
fn test_validator_reports_parse_failure() {
    let result = RoundTripValidator::new().validate_round_trip("py{37");
    assert!(!result.is_valid());
    assert!(result.error.is_some());
}
