use crate::decode::scanner::{Bracket, ScopeFlags, is_structural};

/// Accumulates ArchieML output one line at a time.
pub struct LineWriter {
    out: String,
}

impl LineWriter {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    pub fn line(&mut self, s: &str) {
        self.out.push_str(s);
        self.out.push('\n');
    }

    pub fn line_kv(&mut self, key: &str, value: &str) {
        self.out.push_str(key);
        self.out.push_str(": ");
        self.out.push_str(value);
        self.out.push('\n');
    }

    pub fn line_element(&mut self, value: &str) {
        self.out.push_str("* ");
        self.out.push_str(value);
        self.out.push('\n');
    }

    /// Continuation line of a multi-line value. Lines the parser would read
    /// as structure, or that already start with a backslash, get one more
    /// leading `\`, which the parser strips again.
    pub fn line_continuation(&mut self, s: &str) {
        if s.trim_start().starts_with('\\') || is_structural(s) {
            self.out.push('\\');
        }
        self.line(s);
    }

    pub fn line_scope_close(&mut self, bracket: Bracket) {
        self.line(match bracket {
            Bracket::Array => "[]",
            Bracket::Object => "{}",
        });
    }

    pub fn line_end(&mut self) {
        self.line(":end");
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl Default for LineWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn scope_marker(bracket: Bracket, flags: ScopeFlags, slug: &str) -> String {
    let (open, close) = match bracket {
        Bracket::Array => ('[', ']'),
        Bracket::Object => ('{', '}'),
    };
    let mut s = String::with_capacity(slug.len() + 4);
    s.push(open);
    if flags.nested {
        s.push('.');
    }
    if flags.freeform {
        s.push('+');
    }
    s.push_str(slug);
    s.push(close);
    s
}
