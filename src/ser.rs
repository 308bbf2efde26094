//! Rendering nodes as wax documents, and serializing Rust values into entries.
//!
//! ## Document layout
//!
//! At every level the plain bindings of a node are written first, as
//! `key = <json>` lines, followed by one section per nested node:
//!
//! ```text
//! # comment lines come first
//! ; then annotation lines
//! key = "value"
//!
//! [parent.child]
//! inner = [1,2,3]
//! ```
//!
//! Every nested node gets its own `[full.dotted.path]` header, empty ones
//! included, so the shape of the tree survives a round trip.
//!
//! ## Serde bridge
//!
//! [`to_entry`] and [`to_node`] run any `Serialize` value through
//! [`EntrySerializer`]:
//!
//! ```rust
//! use serde::Serialize;
//! use wax::to_node;
//!
//! #[derive(Serialize)]
//! struct Server { host: String, port: u16 }
//!
//! #[derive(Serialize)]
//! struct Config { name: String, server: Server }
//!
//! let config = Config {
//!     name: "demo".to_string(),
//!     server: Server { host: "localhost".to_string(), port: 8080 },
//! };
//! let node = to_node(&config)?;
//! assert_eq!(node.get("server.port")?.as_i64(), Some(8080));
//! assert!(node.get("server")?.is_node());
//! # Ok::<(), wax::Error>(())
//! ```

use crate::key;
use crate::node::Decor;
use crate::{Entry, Error, Map, Node, Number, RenderOptions, Result};
use serde::{ser, Serialize};
use std::fmt::Write;
use tracing::{debug, trace};

/// Marker that starts a comment line.
pub(crate) const COMMENT_MARKER: char = '#';
/// Marker that starts an annotation line.
pub(crate) const ANNOTATION_MARKER: char = ';';

/// How JSON values are written.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct JsonStyle {
    /// `", "` and `": "` instead of `","` and `":"`.
    pub(crate) spaced: bool,
    /// Write non-finite floats as `null` and sections as objects instead of
    /// failing.
    pub(crate) lossy: bool,
}

impl JsonStyle {
    pub(crate) fn lossy() -> Self {
        JsonStyle {
            spaced: false,
            lossy: true,
        }
    }
}

/// Writes `entry` as JSON text.
pub(crate) fn encode_json(out: &mut String, entry: &Entry, style: JsonStyle) -> Result<()> {
    match entry {
        Entry::Null => out.push_str("null"),
        Entry::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Entry::Number(n) => write_number(out, n, style)?,
        Entry::String(s) => write_json_string(out, s),
        Entry::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(if style.spaced { ", " } else { "," });
                }
                encode_json(out, item, style)?;
            }
            out.push(']');
        }
        Entry::Object(map) => write_json_object(out, map.iter(), style)?,
        Entry::Child(node) => {
            if !style.lossy {
                return Err(Error::unsupported_value(
                    "a section cannot be nested inside an array or object",
                ));
            }
            write_json_object(out, node.items(), style)?;
        }
    }
    Ok(())
}

fn write_json_object<'a, K, I>(out: &mut String, entries: I, style: JsonStyle) -> Result<()>
where
    K: AsRef<str> + 'a,
    I: Iterator<Item = (K, &'a Entry)>,
{
    out.push('{');
    for (i, (k, v)) in entries.enumerate() {
        if i > 0 {
            out.push_str(if style.spaced { ", " } else { "," });
        }
        write_json_string(out, k.as_ref());
        out.push_str(if style.spaced { ": " } else { ":" });
        encode_json(out, v, style)?;
    }
    out.push('}');
    Ok(())
}

fn write_number(out: &mut String, n: &Number, style: JsonStyle) -> Result<()> {
    if !n.is_finite() {
        if style.lossy {
            out.push_str("null");
            return Ok(());
        }
        return Err(Error::unsupported_value(&format!(
            "{} has no JSON representation",
            n
        )));
    }
    write!(out, "{}", n).map_err(Error::custom)
}

#[inline]
fn write_json_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// The document renderer.
///
/// Created via [`Renderer::new`]; most callers use [`render`](crate::render)
/// or [`render_with_options`](crate::render_with_options) instead.
pub struct Renderer {
    output: String,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Renderer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends `root` as a complete document, trailing comment included.
    pub fn render_document(&mut self, root: &Node) -> Result<()> {
        self.render_node(root, "")?;
        if let Some(trailing) = root.trailing_comment() {
            if self.options.comments {
                self.write_lines(COMMENT_MARKER, trailing);
            }
        }
        debug!(bytes = self.output.len(), keys = root.len(), "rendered document");
        Ok(())
    }

    fn render_node(&mut self, node: &Node, path: &str) -> Result<()> {
        for (name, binding) in node.bindings() {
            if binding.entry.is_node() {
                continue;
            }
            key::validate_literal(name)?;
            self.write_decor(&binding.decor);
            self.output.push_str(name);
            self.output.push_str(" = ");
            let style = JsonStyle {
                spaced: self.options.spaced_json,
                lossy: false,
            };
            encode_json(&mut self.output, &binding.entry, style)?;
            self.output.push('\n');
        }

        for (name, binding) in node.bindings() {
            let Entry::Child(child) = &binding.entry else {
                continue;
            };
            if name.contains(key::SEPARATOR) {
                return Err(Error::unsupported_value(&format!(
                    "section `{}` is bound under a dotted key and has no header form",
                    name
                )));
            }
            key::validate_segment(name)?;
            let child_path = key::join(path, name);
            trace!(section = %child_path, "rendering section");

            if self.options.section_spacing && !self.output.is_empty() {
                self.output.push('\n');
            }
            self.write_decor(&binding.decor);
            self.output.push('[');
            self.output.push_str(&child_path);
            self.output.push_str("]\n");
            self.render_node(child, &child_path)?;
        }
        Ok(())
    }

    fn write_decor(&mut self, decor: &Decor) {
        if !self.options.comments {
            return;
        }
        if let Some(comment) = decor.comment() {
            self.write_lines(COMMENT_MARKER, comment);
        }
        if let Some(annotation) = decor.annotation() {
            self.write_lines(ANNOTATION_MARKER, annotation);
        }
    }

    fn write_lines(&mut self, marker: char, text: &str) {
        for line in text.split('\n') {
            self.output.push(marker);
            if !line.is_empty() {
                self.output.push(' ');
                self.output.push_str(line);
            }
            self.output.push('\n');
        }
    }
}

/// Serializes any `Serialize` value into an [`Entry`].
///
/// Structs and maps become [`Entry::Object`], sequences and tuples become
/// arrays. Enum variants carrying data use the externally tagged form
/// `{"Variant": ...}`.
pub struct EntrySerializer;

pub struct SerializeVec {
    vec: Vec<Entry>,
}

pub struct SerializeTupleVariant {
    name: &'static str,
    vec: Vec<Entry>,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: &'static str,
    map: Map,
}

fn tagged(name: &str, value: Entry) -> Entry {
    let mut map = Map::with_capacity(1);
    map.insert(name.to_string(), value);
    Entry::Object(map)
}

impl ser::Serializer for EntrySerializer {
    type Ok = Entry;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Entry> {
        Ok(Entry::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Entry> {
        Ok(Entry::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Entry> {
        Ok(Entry::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Entry> {
        Ok(Entry::Array(v.iter().map(|&b| Entry::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Entry> {
        Ok(Entry::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Entry>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Entry> {
        Ok(Entry::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Entry> {
        Ok(Entry::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Entry> {
        Ok(Entry::from(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Entry>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Entry>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_entry(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: Map::new(),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: Map::with_capacity(len),
            current_key: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant,
            map: Map::with_capacity(len),
        })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Entry;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_entry(value)?);
        Ok(())
    }

    fn end(self) -> Result<Entry> {
        Ok(Entry::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Entry;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Entry> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Entry;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Entry> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Entry;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_entry(value)?);
        Ok(())
    }

    fn end(self) -> Result<Entry> {
        Ok(tagged(self.name, Entry::Array(self.vec)))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Entry;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_entry(key)? {
            Entry::String(s) => s,
            Entry::Number(n) => n.to_string(),
            Entry::Bool(b) => b.to_string(),
            other => {
                return Err(Error::custom(format!(
                    "map keys must be strings, found {}",
                    other.kind()
                )))
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_entry(value)?);
        Ok(())
    }

    fn end(self) -> Result<Entry> {
        Ok(Entry::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Entry;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_entry(value)?);
        Ok(())
    }

    fn end(self) -> Result<Entry> {
        Ok(Entry::Object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Entry;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_entry(value)?);
        Ok(())
    }

    fn end(self) -> Result<Entry> {
        Ok(tagged(self.name, Entry::Object(self.map)))
    }
}

/// Converts any `Serialize` value into an [`Entry`].
///
/// # Examples
///
/// ```rust
/// use wax::{to_entry, Entry};
///
/// assert_eq!(to_entry(&vec![1, 2])?, Entry::from(vec![1, 2]));
/// assert_eq!(to_entry(&Some("x"))?, Entry::from("x"));
/// # Ok::<(), wax::Error>(())
/// ```
pub fn to_entry<T: Serialize + ?Sized>(value: &T) -> Result<Entry> {
    value.serialize(EntrySerializer)
}

/// Converts a `Serialize` value that serializes as a map into a [`Node`].
///
/// Nested maps and structs become sections; maps inside arrays stay inline
/// objects.
///
/// # Errors
///
/// [`Error::UnsupportedValue`] if the top level is not a map or struct.
pub fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Node> {
    match to_entry(value)? {
        Entry::Object(map) => Ok(Node::from(map)),
        Entry::Child(node) => Ok(node),
        other => Err(Error::unsupported_value(&format!(
            "only maps and structs convert to a node, found {}",
            other.kind()
        ))),
    }
}
