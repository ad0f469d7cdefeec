use tracing::{debug, trace};

use crate::decode::arena::{Arena, NodeId, Slot};
use crate::decode::format::{FlushMode, format_value};
use crate::decode::scanner::{
    Bracket, Command, LineContext, LineKind, ScopeFlags, classify, strip_bullet,
};
use crate::options::Options;
use crate::value::DocValue;

/// How the elements of an array scope are told apart. Decided by the first
/// line that lands in the array unless the `+` flag fixed it up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayType {
    /// `* bullet` strings.
    Simple,
    /// Objects; a repeat of the first key starts the next one.
    Complex,
    /// `{type, value}` objects, one per line.
    Freeform,
}

#[derive(Debug, Clone)]
struct ScopeFrame {
    array: Option<NodeId>,
    array_type: Option<ArrayType>,
    first_key: Option<String>,
    flags: ScopeFlags,
    /// Scope restored when this frame is closed.
    scope: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
enum BufferTarget {
    /// Dotted key relative to the current scope.
    Key(String),
    /// Last element of a list.
    Element(NodeId),
}

/// Line-at-a-time ArchieML parser. Feed every line (with its trailing `\n`,
/// except for the final one) and call [`Parser::finish`].
pub struct Parser<'o> {
    options: &'o Options,
    arena: Arena,
    root: NodeId,
    scope: NodeId,
    stack: Vec<ScopeFrame>,
    buffer: String,
    buffer_target: Option<BufferTarget>,
    skipping: bool,
    line_no: usize,
}

impl<'o> Parser<'o> {
    pub fn new(options: &'o Options) -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc_map();
        Self {
            options,
            arena,
            root,
            scope: root,
            stack: Vec::new(),
            buffer: String::new(),
            buffer_target: None,
            skipping: false,
            line_no: 0,
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        self.line_no += 1;
        let kind = classify(line, self.context());
        trace!(line = self.line_no, kind = ?kind, "classified line");
        match kind {
            LineKind::Command(command) => self.parse_command(command),
            LineKind::Key { key, rest } => self.parse_start_key(key, rest),
            LineKind::Element { rest } => self.parse_array_element(rest),
            LineKind::Scope {
                bracket,
                flags,
                slug,
            } => self.parse_scope(bracket, flags, slug),
            LineKind::Text => self.parse_text(line),
        }
    }

    pub fn finish(mut self) -> DocValue {
        // Text buffered after the last key without `:end` is dropped.
        self.flush_buffer();
        self.arena.into_value(self.root)
    }

    fn context(&self) -> LineContext {
        let top = self.stack.last();
        LineContext {
            skipping: self.skipping,
            keys_allowed: top.is_none_or(|f| f.array_type != Some(ArrayType::Simple)),
            elements_allowed: top.is_some_and(|f| {
                f.array.is_some()
                    && !matches!(
                        f.array_type,
                        Some(ArrayType::Complex | ArrayType::Freeform)
                    )
                    && !f.flags.freeform
            }),
        }
    }

    fn in_freeform(&self) -> bool {
        self.stack.last().is_some_and(|f| f.flags.freeform)
    }

    fn parse_command(&mut self, command: Command) {
        if self.skipping && !matches!(command, Command::EndSkip | Command::Ignore) {
            self.flush_buffer();
            return;
        }
        match command {
            Command::End => {
                if let Some(target) = self.buffer_target.clone() {
                    self.flush_buffer_into(target, FlushMode::Append);
                }
                return;
            }
            Command::Ignore => {
                debug!(line = self.line_no, depth = self.stack.len(), "ignore: back to document root");
                self.scope = self.root;
                self.stack.clear();
                self.skipping = false;
            }
            Command::Skip => {
                debug!(line = self.line_no, "skip on");
                self.skipping = true;
            }
            Command::EndSkip => {
                debug!(line = self.line_no, "skip off");
                self.skipping = false;
            }
        }
        self.flush_buffer();
    }

    fn parse_start_key(&mut self, key: &str, rest: &str) {
        self.flush_buffer();
        self.increment_array_element(key);

        // Inside `+` scopes the key became the element's `type`.
        let key = if self.in_freeform() { "value" } else { key };

        self.buffer_target = Some(BufferTarget::Key(key.to_string()));
        self.buffer = rest.to_string();
        self.flush_buffer_into(BufferTarget::Key(key.to_string()), FlushMode::Replace);
    }

    fn parse_array_element(&mut self, rest: &str) {
        self.flush_buffer();

        let array = self.stack.last_mut().and_then(|frame| {
            frame.array_type.get_or_insert(ArrayType::Simple);
            frame.array
        });
        let Some(array) = array else {
            return;
        };

        self.arena.push(array, Slot::Text(String::new()));
        self.buffer_target = Some(BufferTarget::Element(array));
        self.buffer = rest.to_string();
        self.flush_buffer_into(BufferTarget::Element(array), FlushMode::Replace);
    }

    fn parse_scope(&mut self, bracket: Bracket, flags: ScopeFlags, slug: &str) {
        self.flush_buffer();

        if slug.is_empty() {
            let closed = self.stack.pop();
            self.scope = closed.map_or(self.root, |f| f.scope);
            debug!(line = self.line_no, depth = self.stack.len(), "closed scope");
            return;
        }

        let mut key_scope = self.root;
        if flags.nested {
            self.increment_array_element(slug);
            if !self.stack.is_empty() {
                key_scope = self.scope;
            }
        } else {
            self.scope = self.root;
            self.stack.clear();
        }

        // Within freeforms the slug is an element type, taken verbatim.
        let in_freeform = self.in_freeform();
        let mut scope_key = slug;
        if !in_freeform {
            let mut bits: Vec<&str> = slug.split('.').collect();
            scope_key = bits.pop().unwrap_or(slug);
            for bit in bits {
                key_scope = self.arena.child_map(key_scope, bit, false);
            }
        }

        let mut frame = ScopeFrame {
            array: None,
            array_type: None,
            first_key: None,
            flags,
            scope: self.scope,
        };

        match bracket {
            Bracket::Array => {
                // Nested content of a freeform element lives under `value`.
                if in_freeform && flags.nested {
                    scope_key = "value";
                }
                let list = self.arena.alloc_list();
                self.arena.set(key_scope, scope_key, Slot::Node(list));
                frame.array = Some(list);
                if flags.freeform {
                    frame.array_type = Some(ArrayType::Freeform);
                }
            }
            Bracket::Object => {
                if in_freeform && flags.nested {
                    let value = self.arena.alloc_map();
                    self.arena.set(key_scope, "value", Slot::Node(value));
                    self.scope = value;
                } else {
                    self.scope = self.arena.child_map(key_scope, scope_key, true);
                }
            }
        }

        debug!(
            line = self.line_no,
            slug,
            nested = flags.nested,
            freeform = flags.freeform,
            "opened scope"
        );
        if flags.nested {
            self.stack.push(frame);
        } else {
            self.stack = vec![frame];
        }
    }

    fn parse_text(&mut self, text: &str) {
        if self.skipping {
            return;
        }
        if let Some(frame) = self.stack.last() {
            if let (true, Some(array)) = (frame.flags.freeform, frame.array) {
                let prose = strip_bullet(text).trim();
                if !prose.is_empty() {
                    let element = self.arena.alloc_map();
                    self.arena.set(element, "type", Slot::Text("text".to_string()));
                    self.arena.set(element, "value", Slot::Text(prose.to_string()));
                    self.arena.push(array, Slot::Node(element));
                    return;
                }
            }
        }
        self.buffer.push_str(text);
    }

    /// Starts a new element of the enclosing array when `key` marks an
    /// element boundary.
    fn increment_array_element(&mut self, key: &str) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        let Some(array) = frame.array else {
            return;
        };
        if *frame.array_type.get_or_insert(ArrayType::Complex) == ArrayType::Simple {
            return;
        }

        if frame.first_key.is_none() || frame.first_key.as_deref() == Some(key) {
            let element = self.arena.alloc_map();
            self.arena.push(array, Slot::Node(element));
            self.scope = element;
        }
        if frame.flags.freeform {
            self.arena.set(self.scope, "type", Slot::Text(key.to_string()));
        } else if frame.first_key.is_none() {
            frame.first_key = Some(key.to_string());
        }
    }

    fn flush_buffer(&mut self) -> String {
        self.buffer_target = None;
        std::mem::take(&mut self.buffer)
    }

    fn flush_buffer_into(&mut self, target: BufferTarget, mode: FlushMode) {
        let existing_target = self.buffer_target.clone();
        let raw = self.flush_buffer();
        let mut value = format_value(&raw, mode, self.options.comments);

        if mode == FlushMode::Replace {
            value = value.trim_start().to_string();
            // Trailing whitespace seeds the buffer so an `:end` keeps the
            // spacing between the first line and what follows.
            let content_len = value.trim_end().len();
            self.buffer = value[content_len..].to_string();
            self.buffer_target = existing_target;
        }
        let value = value.trim_end();

        match target {
            BufferTarget::Element(list) => {
                if let Some(last) = self.arena.last_text_mut(list) {
                    if mode == FlushMode::Replace {
                        last.clear();
                    }
                    last.push_str(value);
                }
            }
            BufferTarget::Key(key) => {
                let mut bits: Vec<&str> = key.split('.').collect();
                let last = bits.pop().unwrap_or(key.as_str());
                let mut map = self.scope;
                for bit in bits {
                    map = self.arena.child_map(map, bit, true);
                }
                if mode == FlushMode::Replace {
                    self.arena.set(map, last, Slot::Text(String::new()));
                }
                self.arena.append_text(map, last, value);
            }
        }
    }
}

/// Parses a sequence of lines. Every line except the last is given back its
/// `\n` before classification, so multi-line values keep their breaks.
pub fn parse_lines<S: AsRef<str>>(lines: &[S], options: &Options) -> DocValue {
    let mut parser = Parser::new(options);
    let mut scratch = String::new();
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        scratch.clear();
        scratch.push_str(line.as_ref());
        if i < last {
            scratch.push('\n');
        }
        parser.feed_line(&scratch);
    }
    parser.finish()
}

/// Splits on `\n` exactly, so a trailing newline leaves an empty final line.
pub fn parse_str(input: &str, options: &Options) -> DocValue {
    let lines: Vec<&str> = input.split('\n').collect();
    parse_lines(&lines, options)
}
