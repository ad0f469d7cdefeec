#![cfg(feature = "json")]
use archie_rs::{Options, parse_lines};
use serde_json::json;

fn parse_with_comments(lines: &[&str]) -> serde_json::Value {
    parse_lines(lines, &Options::with_comments(true)).to_json()
}

#[test]
fn comment_span_is_removed() {
    assert_eq!(
        parse_with_comments(&["title: Hello [a note] World"]),
        json!({"title": "Hello  World"})
    );
}

#[test]
fn comments_are_kept_by_default() {
    assert_eq!(
        parse_lines(&["title: Hello [a note] World"], &Options::default()).to_json(),
        json!({"title": "Hello [a note] World"})
    );
}

#[test]
fn double_brackets_become_literal_brackets() {
    assert_eq!(
        parse_with_comments(&["title: [[literal]] text"]),
        json!({"title": "[literal] text"})
    );
}

#[test]
fn comments_stripped_from_continuation_lines() {
    assert_eq!(
        parse_with_comments(&["body: a", "\\[note] b", ":end"]),
        json!({"body": "a\n b"})
    );
}

#[test]
fn comment_only_value_is_empty() {
    assert_eq!(
        parse_with_comments(&["title: [draft]", "next: x"]),
        json!({"title": "", "next": "x"})
    );
}
