#![cfg(feature = "json")]
use archie_rs::{Options, parse_lines};
use serde_json::json;

fn parse(lines: &[&str]) -> serde_json::Value {
    parse_lines(lines, &Options::default()).to_json()
}

#[test]
fn simple_array_of_bullets() {
    assert_eq!(
        parse(&["[tags]", "* one", "* two", "[]", "after: yes"]),
        json!({"tags": ["one", "two"], "after": "yes"})
    );
}

#[test]
fn bullet_values_extend_with_end() {
    assert_eq!(
        parse(&["[tags]", "* one", "continued", ":end", "* two"]),
        json!({"tags": ["one\ncontinued", "two"]})
    );
}

#[test]
fn keys_inside_simple_arrays_are_text() {
    assert_eq!(
        parse(&["[tags]", "* one", "key: value", "[]"]),
        json!({"tags": ["one"]})
    );
}

#[test]
fn bullets_outside_arrays_are_text() {
    assert_eq!(parse(&["* stray", "a: 1"]), json!({"a": "1"}));
}

#[test]
fn complex_array_splits_on_first_key() {
    assert_eq!(
        parse(&[
            "[people]",
            "name: Ada",
            "role: math",
            "name: Grace",
            "role: navy",
            "[]"
        ]),
        json!({"people": [
            {"name": "Ada", "role": "math"},
            {"name": "Grace", "role": "navy"}
        ]})
    );
}

#[test]
fn bullets_inside_complex_arrays_are_text() {
    assert_eq!(
        parse(&["[people]", "name: Ada", "* not a bullet", "[]"]),
        json!({"people": [{"name": "Ada"}]})
    );
}

#[test]
fn empty_array_scope() {
    assert_eq!(parse(&["[list]", "[]"]), json!({"list": []}));
}

#[test]
fn reopening_an_array_replaces_it() {
    assert_eq!(
        parse(&["[tags]", "* a", "[]", "[tags]", "* b", "[]"]),
        json!({"tags": ["b"]})
    );
}

#[test]
fn dotted_array_slug() {
    assert_eq!(
        parse(&["[a.b]", "* x", "[]"]),
        json!({"a": {"b": ["x"]}})
    );
}

#[test]
fn nested_array_inside_complex_element() {
    assert_eq!(
        parse(&[
            "[people]",
            "name: Ada",
            "[.langs]",
            "* en",
            "* fr",
            "[]",
            "name: Grace",
            "[]"
        ]),
        json!({"people": [
            {"name": "Ada", "langs": ["en", "fr"]},
            {"name": "Grace"}
        ]})
    );
}

#[test]
fn nested_scope_can_start_an_element() {
    assert_eq!(
        parse(&["[charts]", "{.chart}", "url: a", "{}", "{.chart}", "url: b", "{}", "[]"]),
        json!({"charts": [
            {"chart": {"url": "a"}},
            {"chart": {"url": "b"}}
        ]})
    );
}

#[test]
fn freeform_lines_become_typed_elements() {
    assert_eq!(
        parse(&[
            "[+body]",
            "h2: Title",
            "Paragraph one.",
            "",
            "   Paragraph two.   ",
            "[]"
        ]),
        json!({"body": [
            {"type": "h2", "value": "Title"},
            {"type": "text", "value": "Paragraph one."},
            {"type": "text", "value": "Paragraph two."}
        ]})
    );
}

#[test]
fn freeform_repeated_key_starts_a_new_element() {
    assert_eq!(
        parse(&["[+items]", "quote: A", "quote: B"]),
        json!({"items": [
            {"type": "quote", "value": "A"},
            {"type": "quote", "value": "B"}
        ]})
    );
}

#[test]
fn bullets_in_freeform_are_prose_items() {
    assert_eq!(
        parse(&["[+ items]", "* one", "* two"]),
        json!({"items": [
            {"type": "text", "value": "one"},
            {"type": "text", "value": "two"}
        ]})
    );
}

#[test]
fn lone_bullet_marker_in_freeform_is_blank() {
    assert_eq!(
        parse(&["[+ items]", "*", "text"]),
        json!({"items": [{"type": "text", "value": "text"}]})
    );
}

#[test]
fn freeform_prose_is_never_buffered() {
    assert_eq!(
        parse(&["[+body]", "quote: first", "second", ":end", "[]"]),
        json!({"body": [{"type": "quote", "value": "first"}, {"type": "text", "value": "second"}]})
    );
}

#[test]
fn freeform_nested_object_goes_under_value() {
    assert_eq!(
        parse(&["[+body]", "{.chart}", "url: x", "{}", "text after", "[]"]),
        json!({"body": [
            {"type": "chart", "value": {"url": "x"}},
            {"type": "text", "value": "text after"}
        ]})
    );
}

#[test]
fn freeform_nested_array_goes_under_value() {
    assert_eq!(
        parse(&["[+body]", "[.list]", "* a", "* b", "[]", "[]"]),
        json!({"body": [{"type": "list", "value": ["a", "b"]}]})
    );
}

#[test]
fn freeform_dotted_slug_is_taken_verbatim() {
    assert_eq!(
        parse(&["[+body]", "{.side.note}", "k: v", "{}"]),
        json!({"body": [{"type": "side.note", "value": {"k": "v"}}]})
    );
}

#[test]
fn freeform_inside_freeform() {
    assert_eq!(
        parse(&[
            "[+outer]",
            "[.+inner]",
            "p: x",
            "plain",
            "[]",
            "after",
            "[]"
        ]),
        json!({"outer": [
            {"type": "inner", "value": [
                {"type": "p", "value": "x"},
                {"type": "text", "value": "plain"}
            ]},
            {"type": "text", "value": "after"}
        ]})
    );
}

#[test]
fn plain_scope_inside_freeform_starts_from_root() {
    assert_eq!(
        parse(&["[+body]", "para", "{meta.info}", "a: 1"]),
        json!({
            "body": [{"type": "text", "value": "para"}],
            "meta": {"info": {"a": "1"}}
        })
    );
}
