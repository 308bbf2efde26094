//! Parsing wax documents.
//!
//! This module provides the [`Parser`] that turns document text into a
//! [`Node`] tree.
//!
//! ## Overview
//!
//! The parser works line by line on a single cursor:
//!
//! - **Single pass**: no backtracking, one lookahead character
//! - **Sections**: `[a.b.c]` switches the current scope, creating missing
//!   sections and reopening existing ones
//! - **Values**: everything after `=` is a JSON literal; arrays and objects
//!   may span several lines
//! - **Decoration**: `#` and `;` lines are collected and attached to the next
//!   binding or header
//! - **Error reporting**: every syntax error carries its line and column
//!
//! ## Usage
//!
//! ```rust
//! use wax::parse;
//!
//! let text = "\
//! name = \"demo\"
//!
//! ## where to listen
//! [server]
//! port = 8080
//! ";
//! let node = parse(text)?;
//! assert_eq!(node.get("server.port")?.as_i64(), Some(8080));
//! assert_eq!(node.comment("server"), Some("where to listen"));
//! # Ok::<(), wax::Error>(())
//! ```

use crate::key;
use crate::node::Decor;
use crate::ser::{ANNOTATION_MARKER, COMMENT_MARKER};
use crate::{Entry, Error, Map, Node, Number, Result};
use num_bigint::BigInt;
use std::str::FromStr;
use tracing::{debug, trace};

/// How many arrays and objects a value may nest before parsing gives up.
const MAX_DEPTH: usize = 128;

/// Where bindings currently land.
enum Scope {
    Root,
    Section(Vec<String>),
}

/// Comment and annotation lines waiting for the next binding or header.
#[derive(Default)]
struct Pending {
    comments: Vec<String>,
    annotations: Vec<String>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.comments.is_empty() && self.annotations.is_empty()
    }

    fn take(&mut self) -> Decor {
        let join = |lines: &mut Vec<String>| {
            if lines.is_empty() {
                None
            } else {
                let text = lines.join("\n");
                lines.clear();
                Some(text)
            }
        };
        Decor {
            comment: join(&mut self.comments),
            annotation: join(&mut self.annotations),
        }
    }

    fn into_trailing(self) -> String {
        let mut lines = self.comments;
        lines.extend(self.annotations);
        lines.join("\n")
    }
}

/// The document parser.
///
/// Parses text into a [`Node`]. Created via [`Parser::new`]; most callers use
/// [`parse`](crate::parse) instead.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, reason: &str) -> Error {
        Error::syntax(self.line, self.column, reason)
    }

    /// Skips spaces and tabs.
    fn skip_inline_whitespace(&mut self) {
        while let Some(' ' | '\t') = self.peek_char() {
            self.next_char();
        }
    }

    /// Skips JSON whitespace, newlines included.
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek_char() {
            self.next_char();
        }
    }

    /// Consumes trailing blanks and the line terminator; anything else is an
    /// error.
    fn expect_line_end(&mut self, after: &str) -> Result<()> {
        self.skip_inline_whitespace();
        match self.peek_char() {
            None => Ok(()),
            Some('\n') => {
                self.next_char();
                Ok(())
            }
            Some('\r') => {
                self.next_char();
                match self.next_char() {
                    None | Some('\n') => Ok(()),
                    Some(_) => Err(self.error("stray carriage return")),
                }
            }
            Some(ch) => Err(self.error(&format!("unexpected `{}` after {}", ch, after))),
        }
    }

    /// Reads the rest of a comment or annotation line, without the marker and
    /// at most one following space.
    fn read_marker_text(&mut self) -> String {
        self.next_char(); // consume the marker
        if self.peek_char() == Some(' ') {
            self.next_char();
        }
        let input = self.input;
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.next_char();
        }
        let text = &input[start..self.position];
        self.next_char(); // consume the newline, if any
        text.strip_suffix('\r').unwrap_or(text).to_string()
    }

    /// Reads a run of key characters and dots starting at the cursor.
    fn read_key(&mut self) -> &'a str {
        let input = self.input;
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if key::is_segment_char(ch) || ch == key::SEPARATOR {
                self.next_char();
            } else {
                break;
            }
        }
        &input[start..self.position]
    }

    /// Parses a whole document into a fresh node.
    pub fn parse_document(mut self) -> Result<Node> {
        let mut root = Node::new();
        let mut scope = Scope::Root;
        let mut pending = Pending::default();

        loop {
            self.skip_inline_whitespace();
            match self.peek_char() {
                None => break,
                Some('\n' | '\r') => self.expect_line_end("blank line")?,
                Some(COMMENT_MARKER) => {
                    let text = self.read_marker_text();
                    pending.comments.push(text);
                }
                Some(ANNOTATION_MARKER) => {
                    let text = self.read_marker_text();
                    pending.annotations.push(text);
                }
                Some('[') => {
                    let (line, column) = (self.line, self.column);
                    let path = self.parse_header()?;
                    self.expect_line_end("section header")?;
                    root.open_section(&path, pending.take()).map_err(|err| {
                        Error::syntax(line, column, &section_conflict(&path, &err))
                    })?;
                    trace!(section = %path.join("."), line, "entering section");
                    scope = Scope::Section(path);
                }
                Some(ch) if key::is_segment_start(ch) => {
                    let (line, column) = (self.line, self.column);
                    let (name, value) = self.parse_binding()?;
                    let target = match &scope {
                        Scope::Root => &mut root,
                        Scope::Section(path) => {
                            let joined = path.join(".");
                            root.walk_mut(path, &joined).map_err(|err| {
                                Error::syntax(line, column, &section_conflict(path, &err))
                            })?
                        }
                    };
                    target.bind(name, value, pending.take());
                }
                Some(ch) => {
                    return Err(self.error(&format!(
                        "unexpected `{}`; expected a key, a section header or a comment",
                        ch
                    )))
                }
            }
        }

        if !pending.is_empty() {
            root.set_trailing_raw(pending.into_trailing());
        }
        debug!(lines = self.line, keys = root.len(), "parsed document");
        Ok(root)
    }

    /// Parses `[a.b.c]` into its segments.
    fn parse_header(&mut self) -> Result<Vec<String>> {
        self.next_char(); // consume '['
        self.skip_inline_whitespace();
        let (line, column) = (self.line, self.column);
        let path = self.read_key();
        let segments = key::split(path).map_err(|err| Error::syntax(line, column, &err.to_string()))?;
        self.skip_inline_whitespace();
        if self.peek_char() != Some(']') {
            return Err(self.error("expected `]` to close the section header"));
        }
        self.next_char();
        Ok(segments.into_iter().map(str::to_string).collect())
    }

    /// Parses `key = value` up to and including the line end.
    fn parse_binding(&mut self) -> Result<(&'a str, Entry)> {
        let (line, column) = (self.line, self.column);
        let name = self.read_key();
        key::validate_literal(name).map_err(|err| Error::syntax(line, column, &err.to_string()))?;

        self.skip_inline_whitespace();
        if self.peek_char() != Some('=') {
            return Err(self.error(&format!("expected `=` after key `{}`", name)));
        }
        self.next_char();
        self.skip_inline_whitespace();
        if matches!(self.peek_char(), None | Some('\n' | '\r')) {
            return Err(self.error("expected a value after `=`"));
        }

        let value = self.parse_value()?;
        self.expect_line_end("value")?;
        Ok((name, value))
    }

    fn parse_value(&mut self) -> Result<Entry> {
        match self.peek_char() {
            Some('"') => self.parse_string().map(Entry::String),
            Some('[') => self.nested(Self::parse_array),
            Some('{') => self.nested(Self::parse_object),
            Some('-' | '0'..='9') => self.parse_number().map(Entry::Number),
            Some(ch) if ch.is_ascii_alphabetic() => self.parse_word(),
            Some(ch) => Err(self.error(&format!("unexpected `{}` at the start of a value", ch))),
            None => Err(self.error("unexpected end of input, expected a value")),
        }
    }

    /// Runs `parse` one nesting level deeper, refusing to go past
    /// [`MAX_DEPTH`].
    fn nested(&mut self, parse: fn(&mut Self) -> Result<Entry>) -> Result<Entry> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_word(&mut self) -> Result<Entry> {
        let (line, column) = (self.line, self.column);
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.next_char();
            } else {
                break;
            }
        }
        match &self.input[start..self.position] {
            "true" => Ok(Entry::Bool(true)),
            "false" => Ok(Entry::Bool(false)),
            "null" => Ok(Entry::Null),
            word => Err(Error::syntax(
                line,
                column,
                &format!("invalid value `{}`; strings must be quoted", word),
            )),
        }
    }

    fn parse_number(&mut self) -> Result<Number> {
        let (line, column) = (self.line, self.column);
        let start = self.position;
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            self.next_char();
        }
        match self.peek_char() {
            Some('0') => {
                self.next_char();
                if matches!(self.peek_char(), Some('0'..='9')) {
                    return Err(self.error("leading zeros are not allowed"));
                }
            }
            Some('1'..='9') => self.consume_digits(),
            _ => return Err(self.error("expected a digit")),
        }
        if self.peek_char() == Some('.') {
            self.next_char();
            is_float = true;
            if !matches!(self.peek_char(), Some('0'..='9')) {
                return Err(self.error("expected a digit after the decimal point"));
            }
            self.consume_digits();
        }
        if let Some('e' | 'E') = self.peek_char() {
            self.next_char();
            is_float = true;
            if let Some('+' | '-') = self.peek_char() {
                self.next_char();
            }
            if !matches!(self.peek_char(), Some('0'..='9')) {
                return Err(self.error("expected a digit in the exponent"));
            }
            self.consume_digits();
        }

        let text = &self.input[start..self.position];
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Number::Integer(i));
            }
            return text
                .parse::<BigInt>()
                .map(Number::BigInt)
                .map_err(|_| Error::syntax(line, column, &format!("invalid integer `{}`", text)));
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Number::Float(f)),
            _ => Err(Error::syntax(line, column, &format!("number `{}` is out of range", text))),
        }
    }

    fn consume_digits(&mut self) {
        while let Some('0'..='9') = self.peek_char() {
            self.next_char();
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        self.next_char(); // consume opening quote
        let mut result = String::new();

        loop {
            let ch = self
                .next_char()
                .ok_or_else(|| self.error("unterminated string"))?;
            match ch {
                '"' => return Ok(result),
                '\\' => {
                    let escape = self
                        .next_char()
                        .ok_or_else(|| self.error("unterminated string"))?;
                    match escape {
                        '"' => result.push('"'),
                        '\\' => result.push('\\'),
                        '/' => result.push('/'),
                        'b' => result.push('\u{0008}'),
                        'f' => result.push('\u{000C}'),
                        'n' => result.push('\n'),
                        'r' => result.push('\r'),
                        't' => result.push('\t'),
                        'u' => result.push(self.parse_unicode_escape()?),
                        other => {
                            return Err(self.error(&format!("invalid escape `\\{}`", other)))
                        }
                    }
                }
                '\n' => return Err(self.error("unterminated string")),
                c if (c as u32) < 0x20 => {
                    return Err(self.error("control characters must be escaped in strings"))
                }
                c => result.push(c),
            }
        }
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .next_char()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| self.error("invalid unicode escape (expected 4 hex digits)"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Decodes the digits of a `\u` escape, pairing surrogates.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let first = self.parse_hex4()?;
        let code = match first {
            0xD800..=0xDBFF => {
                if !self.input[self.position..].starts_with("\\u") {
                    return Err(self.error("unpaired surrogate in unicode escape"));
                }
                self.next_char();
                self.next_char();
                let second = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(self.error("invalid low surrogate in unicode escape"));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.error("unpaired surrogate in unicode escape")),
            code => code,
        };
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode code point"))
    }

    fn parse_array(&mut self) -> Result<Entry> {
        self.next_char(); // consume '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek_char() == Some(']') {
            self.next_char();
            return Ok(Entry::Array(items));
        }
        loop {
            self.skip_whitespace();
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.next_char() {
                Some(',') => continue,
                Some(']') => return Ok(Entry::Array(items)),
                Some(ch) => return Err(self.error(&format!("expected `,` or `]` in array, found `{}`", ch))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Entry> {
        self.next_char(); // consume '{'
        let mut map = Map::new();
        self.skip_whitespace();
        if self.peek_char() == Some('}') {
            self.next_char();
            return Ok(Entry::Object(map));
        }
        loop {
            self.skip_whitespace();
            if self.peek_char() != Some('"') {
                return Err(self.error("object keys must be strings"));
            }
            let name = self.parse_string()?;
            self.skip_whitespace();
            if self.next_char() != Some(':') {
                return Err(self.error("expected `:` after object key"));
            }
            self.skip_whitespace();
            let value = self.parse_value()?;
            map.insert(name, value);
            self.skip_whitespace();
            match self.next_char() {
                Some(',') => continue,
                Some('}') => return Ok(Entry::Object(map)),
                Some(ch) => return Err(self.error(&format!("expected `,` or `}}` in object, found `{}`", ch))),
                None => return Err(self.error("unterminated object")),
            }
        }
    }
}

fn section_conflict<S: AsRef<str>>(path: &[S], err: &Error) -> String {
    let path = path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(".");
    match err {
        Error::TypeConflict { path: blocking, found } => format!(
            "section `{}` cannot be opened: `{}` already holds {}",
            path, blocking, found
        ),
        other => format!("section `{}` cannot be opened: {}", path, other),
    }
}

/// Parses a document into a new [`Node`].
pub(crate) fn parse(text: &str) -> Result<Node> {
    Parser::new(text).parse_document()
}

/// Parses a document and merges it into `dest`, which is left untouched if
/// parsing fails.
pub(crate) fn parse_into(text: &str, dest: &mut Node) -> Result<()> {
    let parsed = parse(text)?;
    dest.merge(parsed);
    Ok(())
}

impl FromStr for Node {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}
