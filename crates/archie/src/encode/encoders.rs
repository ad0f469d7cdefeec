use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::{
    Result,
    decode::scanner::{Bracket, LineContext, LineKind, ScopeFlags, classify},
    encode::writer::{LineWriter, scope_marker},
    error::Error,
    options::Options,
    value::DocValue,
};

static BRACKET_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]\n\r]*\]").unwrap());

/// Writes the entries of a top-level object.
pub fn encode_document(doc: &DocValue, w: &mut LineWriter, opts: &Options) -> Result<()> {
    let DocValue::Object(entries) = doc else {
        return Err(Error::message("top-level value must be an object"));
    };
    for (key, value) in entries {
        encode_entry(key, value, w, opts, false)?;
    }
    Ok(())
}

fn encode_entry(
    key: &str,
    value: &DocValue,
    w: &mut LineWriter,
    opts: &Options,
    nested: bool,
) -> Result<()> {
    let flags = ScopeFlags {
        nested,
        freeform: false,
    };
    match value {
        DocValue::String(s) => {
            check_key(key)?;
            write_string(w, Lead::Key(key), &escape_text(s, opts));
        }
        DocValue::Object(entries) => {
            open_scope(w, Bracket::Object, flags, key)?;
            for (k, v) in entries {
                encode_entry(k, v, w, opts, true)?;
            }
            w.line_scope_close(Bracket::Object);
        }
        DocValue::Array(items) => {
            open_scope(w, Bracket::Array, flags, key)?;
            encode_array_items(key, items, w, opts)?;
            w.line_scope_close(Bracket::Array);
        }
    }
    Ok(())
}

fn encode_array_items(
    key: &str,
    items: &[DocValue],
    w: &mut LineWriter,
    opts: &Options,
) -> Result<()> {
    if items.iter().all(|v| matches!(v, DocValue::String(_))) {
        for item in items {
            if let DocValue::String(s) = item {
                write_string(w, Lead::Element, &escape_text(s, opts));
            }
        }
        return Ok(());
    }

    if complex_first_key(items).is_none() {
        return Err(Error::message(format!(
            "array {key:?} must hold only strings, or objects sharing the same first key"
        )));
    }
    for item in items {
        if let DocValue::Object(entries) = item {
            for (k, v) in entries {
                encode_entry(k, v, w, opts, true)?;
            }
        }
    }
    Ok(())
}

/// The key that opens every element of a complex array. A repeat of this
/// key is what tells the parser a new element has started.
pub fn complex_first_key(items: &[DocValue]) -> Option<&str> {
    let mut first: Option<&str> = None;
    for item in items {
        let (k, _) = item.as_object()?.first()?;
        match first {
            Some(f) if f != k.as_str() => return None,
            _ => first = Some(k.as_str()),
        }
    }
    first
}

#[derive(Clone, Copy)]
enum Lead<'a> {
    Key(&'a str),
    Element,
}

/// The parser trims the first line of a value, so a value opening with
/// whitespace or a blank line is written entirely on continuation lines.
/// The same goes for a bullet whose text would turn `* ` into a key line
/// (`* : x` reads as key `*`) in a fresh array.
fn write_string(w: &mut LineWriter, lead: Lead<'_>, text: &str) {
    let mut lines = text.split('\n');
    let first = text.split('\n').next().unwrap_or("");
    let shift = first.starts_with(char::is_whitespace)
        || (first.is_empty() && text.contains('\n'))
        || (matches!(lead, Lead::Element) && !reads_as_bullet(first));
    let head = if shift { "" } else { lines.next().unwrap_or("") };
    match lead {
        Lead::Key(key) => w.line_kv(key, head),
        Lead::Element => w.line_element(head),
    }
    write_value_tail(w, lines);
}

/// A fresh array checks keys before bullets, so the first `* ` line must
/// still classify as a bullet there.
fn reads_as_bullet(head: &str) -> bool {
    matches!(
        classify(&format!("* {head}"), LineContext::PERMISSIVE),
        LineKind::Element { .. }
    )
}

fn write_value_tail<'a>(w: &mut LineWriter, rest: impl Iterator<Item = &'a str>) {
    let mut continued = false;
    for line in rest {
        w.line_continuation(line);
        continued = true;
    }
    if continued {
        w.line_end();
    }
}

/// With comments enabled, `[span]` would be stripped on the way back in,
/// so it is written as `[[span]]`.
fn escape_text<'a>(s: &'a str, opts: &Options) -> Cow<'a, str> {
    if opts.comments {
        BRACKET_SPAN_RE.replace_all(s, "[${0}]")
    } else {
        Cow::Borrowed(s)
    }
}

fn check_key(key: &str) -> Result<()> {
    let line = format!("{key}: ");
    match classify(&line, LineContext::default()) {
        LineKind::Key { key: parsed, .. } if parsed == key && !key.contains('.') => Ok(()),
        _ => Err(Error::message(format!(
            "key {key:?} cannot be written as an ArchieML key"
        ))),
    }
}

fn open_scope(w: &mut LineWriter, bracket: Bracket, flags: ScopeFlags, slug: &str) -> Result<()> {
    let marker = scope_marker(bracket, flags, slug);
    match classify(&marker, LineContext::default()) {
        LineKind::Scope { slug: parsed, .. }
            if parsed == slug && !slug.is_empty() && !slug.contains('.') =>
        {
            w.line(&marker);
            Ok(())
        }
        _ => Err(Error::message(format!(
            "key {slug:?} cannot be written as an ArchieML scope"
        ))),
    }
}
