use std::sync::LazyLock;

use regex::Regex;

// Keys and scope slugs may not contain whitespace or any of `[ \ ] { } :`.
static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*:[ \t\r]*(endskip|ignore|skip|end)").unwrap());
static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^\s\[\\\]{}:]+)[ \t\r]*:[ \t\r]*").unwrap());
static ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\*[ \t\r]*").unwrap());
static SCOPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\[{])[ \t\r]*([+.]*)[ \t\r]*([^\s\[\\\]{}:]*)[ \t\r]*[\]}]").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    End,
    Ignore,
    Skip,
    EndSkip,
}

impl Command {
    fn from_word(word: &str) -> Self {
        if word.eq_ignore_ascii_case("endskip") {
            Command::EndSkip
        } else if word.eq_ignore_ascii_case("ignore") {
            Command::Ignore
        } else if word.eq_ignore_ascii_case("skip") {
            Command::Skip
        } else {
            Command::End
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Array,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopeFlags {
    /// `.`: open inside the current scope instead of resetting to the root.
    pub nested: bool,
    /// `+`: freeform array, every line becomes a typed element.
    pub freeform: bool,
}

impl ScopeFlags {
    fn parse(s: &str) -> Self {
        Self {
            nested: s.contains('.'),
            freeform: s.contains('+'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Command(Command),
    /// `rest` runs to the end of the line, line break included.
    Key { key: &'a str, rest: &'a str },
    Element { rest: &'a str },
    Scope {
        bracket: Bracket,
        flags: ScopeFlags,
        slug: &'a str,
    },
    Text,
}

/// Parser state that decides which line classes are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext {
    pub skipping: bool,
    /// False inside a simple (`*` bullet) array.
    pub keys_allowed: bool,
    /// True only inside an array scope that can still take `*` bullets.
    pub elements_allowed: bool,
}

impl LineContext {
    /// Every class live; what a line means at the top of a document.
    pub const PERMISSIVE: LineContext = LineContext {
        skipping: false,
        keys_allowed: true,
        elements_allowed: true,
    };
}

impl Default for LineContext {
    fn default() -> Self {
        Self {
            skipping: false,
            keys_allowed: true,
            elements_allowed: false,
        }
    }
}

/// Classifies one line. Commands win over everything, then keys, bullets,
/// and scope markers; anything else is text.
pub fn classify(line: &str, ctx: LineContext) -> LineKind<'_> {
    if let Some(word) = COMMAND_RE.captures(line).and_then(|c| c.get(1)) {
        return LineKind::Command(Command::from_word(word.as_str()));
    }
    if ctx.skipping {
        return LineKind::Text;
    }
    if ctx.keys_allowed {
        if let Some(caps) = KEY_RE.captures(line) {
            if let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) {
                return LineKind::Key {
                    key: key.as_str(),
                    rest: &line[whole.end()..],
                };
            }
        }
    }
    if ctx.elements_allowed {
        if let Some(m) = ELEMENT_RE.find(line) {
            return LineKind::Element {
                rest: &line[m.end()..],
            };
        }
    }
    if let Some(caps) = SCOPE_RE.captures(line) {
        let bracket = match caps.get(1).map(|m| m.as_str()) {
            Some("[") => Bracket::Array,
            _ => Bracket::Object,
        };
        let flags = ScopeFlags::parse(caps.get(2).map_or("", |m| m.as_str()));
        let slug = caps.get(3).map_or("", |m| m.as_str());
        if is_reserved_slug(slug) {
            return LineKind::Text;
        }
        return LineKind::Scope {
            bracket,
            flags,
            slug,
        };
    }
    LineKind::Text
}

/// Inline reference markers (`{ref}` ... `{/ref}`) are content, not scopes.
fn is_reserved_slug(slug: &str) -> bool {
    slug.eq_ignore_ascii_case("ref") || slug.eq_ignore_ascii_case("/ref")
}

/// Text of a line with any leading `*` bullet marker removed.
pub fn strip_bullet(line: &str) -> &str {
    match ELEMENT_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// True when a line would be read as anything but text somewhere in a
/// document, so an encoder has to escape it.
pub fn is_structural(line: &str) -> bool {
    !matches!(classify(line, LineContext::PERMISSIVE), LineKind::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN_SIMPLE_ARRAY: LineContext = LineContext {
        skipping: false,
        keys_allowed: false,
        elements_allowed: true,
    };

    #[test]
    fn commands_are_case_insensitive_and_ignore_trailing_text() {
        assert_eq!(
            classify(":END and more\n", LineContext::default()),
            LineKind::Command(Command::End)
        );
        assert_eq!(
            classify("  :EndSkip", LineContext::default()),
            LineKind::Command(Command::EndSkip)
        );
        assert_eq!(
            classify(":ignore", LineContext::default()),
            LineKind::Command(Command::Ignore)
        );
    }

    #[test]
    fn key_rest_keeps_line_break() {
        assert_eq!(
            classify("title :  Hello\n", LineContext::default()),
            LineKind::Key {
                key: "title",
                rest: "Hello\n"
            }
        );
    }

    #[test]
    fn key_rejects_forbidden_characters() {
        assert_eq!(classify("a b: c", LineContext::default()), LineKind::Text);
        assert_eq!(classify("a\\b: c", LineContext::default()), LineKind::Text);
    }

    #[test]
    fn keys_are_text_inside_simple_arrays() {
        assert_eq!(classify("a: b", IN_SIMPLE_ARRAY), LineKind::Text);
        assert_eq!(
            classify("*a: b", IN_SIMPLE_ARRAY),
            LineKind::Element { rest: "a: b" }
        );
    }

    #[test]
    fn bullets_need_an_array_context() {
        assert_eq!(classify("* one", LineContext::default()), LineKind::Text);
        assert_eq!(
            classify("* one", IN_SIMPLE_ARRAY),
            LineKind::Element { rest: "one" }
        );
    }

    #[test]
    fn scope_markers_parse_flags_and_slug() {
        assert_eq!(
            classify("[.+ body ]", LineContext::default()),
            LineKind::Scope {
                bracket: Bracket::Array,
                flags: ScopeFlags {
                    nested: true,
                    freeform: true
                },
                slug: "body"
            }
        );
        assert_eq!(
            classify("{}", LineContext::default()),
            LineKind::Scope {
                bracket: Bracket::Object,
                flags: ScopeFlags::default(),
                slug: ""
            }
        );
    }

    #[test]
    fn ref_slug_is_text() {
        assert_eq!(classify("{ref}", LineContext::default()), LineKind::Text);
        assert_eq!(classify("[REF]", LineContext::default()), LineKind::Text);
        assert_eq!(classify("{/ref}", LineContext::default()), LineKind::Text);
    }

    #[test]
    fn skipping_only_lets_commands_through() {
        let ctx = LineContext {
            skipping: true,
            ..LineContext::default()
        };
        assert_eq!(classify("a: b", ctx), LineKind::Text);
        assert_eq!(classify("{x}", ctx), LineKind::Text);
        assert_eq!(
            classify(":endskip", ctx),
            LineKind::Command(Command::EndSkip)
        );
    }

    #[test]
    fn strip_bullet_only_touches_markers() {
        assert_eq!(strip_bullet("  *  one\n"), "one\n");
        assert_eq!(strip_bullet("plain * text"), "plain * text");
    }

    #[test]
    fn structural_lines() {
        assert!(is_structural("key: value"));
        assert!(is_structural("* bullet"));
        assert!(is_structural(":end"));
        assert!(is_structural("[list]"));
        assert!(!is_structural("plain prose, no colon"));
        assert!(!is_structural("\\key: escaped"));
    }
}
