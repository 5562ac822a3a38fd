//! Expansion of parsed envlists into environment names

use envlist_core::{Expand, expand, parse};

fn names(source: &str) -> Vec<String> {
    let list = parse(source).expect("parse");
    expand(&list)
}

#[test]
fn test_group_followed_by_factor() {
    assert_eq!(names("py{37,38}-django"), vec!["py37-django", "py38-django"]);
}

#[test]
fn test_plain_comma_list() {
    assert_eq!(names("a,b,c"), vec!["a", "b", "c"]);
}

#[test]
fn test_product_of_groups() {
    assert_eq!(names("{a,b}-{x,y}"), vec!["a-x", "a-y", "b-x", "b-y"]);
}

#[test]
fn test_multiline_list_with_comments() {
    let source = r#"
    # interpreters
    py{37,38}-django{22,30}
    lint  # style only
    docs: sphinx
"#;
    assert_eq!(
        names(source),
        vec![
            "py37-django22",
            "py37-django30",
            "py38-django22",
            "py38-django30",
            "lint",
            "docs",
        ]
    );
}

#[test]
fn test_group_spanning_lines() {
    let source = "py{\n  37,\n  38 # newest\n}";
    assert_eq!(names(source), vec!["py37", "py38"]);
}

#[test]
fn test_entry_level_queries() {
    let list = parse("py{37,38}-django, py39-flask").expect("parse");
    let entries: Vec<_> = list.entries().collect();

    assert_eq!(
        entries[0].common_factors().into_iter().collect::<Vec<_>>(),
        vec!["django"]
    );
    assert_eq!(entries[0].common_prefix().as_deref(), Some("py3"));
    assert!(entries[1].only("py39-flask"));
    assert_eq!(list.one(), None);
}

#[test]
fn test_expanding_is_thread_safe() {
    let list = parse("py{37,38,39}-{a,b}").expect("parse");
    let green = list.green();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let green = green.clone();
            std::thread::spawn(move || {
                envlist_core::EnvList::from_green(green)
                    .map(|l| l.expand())
                    .unwrap_or_default()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread").len(), 6);
    }
}
