//! Post-processing applied to buffered text when it is flushed into the document.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^\\)?\[[^\[\]\n\r]*\]").unwrap());
static DOUBLE_BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]\n\r]*)\]\]").unwrap());
static LEADING_BACKSLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\s*)\\").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushMode {
    /// A key or bullet line starting a fresh value.
    Replace,
    /// `:end` extending the value with the lines buffered since.
    Append,
}

pub fn format_value(value: &str, mode: FlushMode, comments: bool) -> String {
    let mut out = value.to_string();
    if comments && has_open_bracket(&out) {
        let stripped = strip_comments(value);
        out = unescape_double_brackets(&stripped).into_owned();
    }
    if mode == FlushMode::Append {
        // The first line of a value never carries an escape, only continuations.
        out = LEADING_BACKSLASH_RE.replace_all(&out, "${1}").into_owned();
    }
    out
}

/// Removes `[comment]` spans. A span directly followed by another `]` is
/// the tail of a `[[escape]]` and stays.
pub fn strip_comments(value: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut last = 0usize;
    for m in COMMENT_RE.find_iter(value) {
        if value[m.end()..].starts_with(']') {
            continue;
        }
        out.push_str(&value[last..m.start()]);
        last = m.end();
    }
    if last == 0 {
        return Cow::Borrowed(value);
    }
    out.push_str(&value[last..]);
    Cow::Owned(out)
}

/// `[[x]]` -> `[x]`.
pub fn unescape_double_brackets(value: &str) -> Cow<'_, str> {
    DOUBLE_BRACKET_RE.replace_all(value, "[${1}]")
}

#[inline]
#[cfg(feature = "perf_memchr")]
fn has_open_bracket(s: &str) -> bool {
    memchr::memchr(b'[', s.as_bytes()).is_some()
}

#[inline]
#[cfg(not(feature = "perf_memchr"))]
fn has_open_bracket(s: &str) -> bool {
    s.as_bytes().contains(&b'[')
}
