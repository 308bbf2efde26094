//! The ordered, hierarchical context object.
//!
//! A [`Node`] is an ordered mapping from keys to [`Entry`] values, where an
//! entry may itself be a nested node (a *section*). Nodes are addressed in
//! three ways:
//!
//! - **Dotted paths** ([`Node::get`], [`Node::set`], [`Node::delete`]): the path
//!   is always split on `.` and walked through nested sections. Assignment
//!   creates missing intermediate sections on the way.
//! - **Literal keys** ([`Node::get_key`], [`Node::insert`], [`Node::remove`],
//!   and `node["key"]`): the key is used as-is and never split, which is the
//!   only way to reach a key that contains a dot.
//! - **Attribute sugar** ([`Node::attr`], [`Node::set_attr`]): a single plain
//!   segment. Names that collide with the node's own operations (see
//!   [`RESERVED_NAMES`](crate::key::RESERVED_NAMES)) are refused; reach those
//!   keys through the subscript form instead.
//!
//! Insertion order is kept everywhere: replacing a value leaves its key where
//! it was, new keys are appended.
//!
//! ## Examples
//!
//! ```rust
//! use wax::{Entry, Node};
//!
//! let mut config = Node::new();
//! config.set("server.host", "localhost")?;
//! config.set("server.port", 8080)?;
//! config.set("debug", false)?;
//!
//! assert_eq!(config.get("server.port")?.as_i64(), Some(8080));
//! assert_eq!(config.keys().collect::<Vec<_>>(), vec!["server", "debug"]);
//! assert_eq!(config.get_or("server.tls.cert", "none"), Entry::from("none"));
//! # Ok::<(), wax::Error>(())
//! ```

use crate::flat::Flat;
use crate::key::{self, SEPARATOR};
use crate::{Entry, Error, Map, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, AddAssign, Index, Sub};

/// Comment and annotation text attached to a binding.
///
/// Comments come from `#` lines, annotations from `;` lines. Both are stored
/// verbatim (multi-line text joined with `\n`) and re-emitted in front of the
/// binding they belong to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decor {
    pub(crate) comment: Option<String>,
    pub(crate) annotation: Option<String>,
}

impl Decor {
    /// The `#` comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The `;` annotation, if any.
    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Returns `true` when neither a comment nor an annotation is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comment.is_none() && self.annotation.is_none()
    }

    /// Takes over every part of `other` that is present.
    pub(crate) fn absorb(&mut self, other: Decor) {
        if other.comment.is_some() {
            self.comment = other.comment;
        }
        if other.annotation.is_some() {
            self.annotation = other.annotation;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Binding {
    pub(crate) entry: Entry,
    pub(crate) decor: Decor,
}

impl Binding {
    fn new(entry: Entry) -> Self {
        Binding {
            entry,
            decor: Decor::default(),
        }
    }
}

/// An ordered, hierarchical map of keys to entries.
///
/// `==` compares keys and entries recursively without regard to key order,
/// so a node equals the result of rendering and parsing it back. Use
/// [`Node::eq_ordered`] when the order matters too. Comments and annotations
/// are ignored by both.
///
/// # Examples
///
/// ```rust
/// use wax::Node;
///
/// let mut node = Node::new();
/// node.set("x.y.z", 5)?;
///
/// assert_eq!(node.get("x.y.z")?.as_i64(), Some(5));
/// assert!(node.get("x")?.is_node());
/// assert!(node.node("x")?.get("y")?.is_node());
/// # Ok::<(), wax::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Node {
    bindings: IndexMap<String, Binding>,
    trailing: Option<String>,
}

impl Node {
    /// Creates an empty node.
    #[must_use]
    pub fn new() -> Self {
        Node::default()
    }

    /// Builds a node from ordered `(path, value)` pairs using dotted-path
    /// assignment.
    ///
    /// Intermediate sections are created as needed, and a section value whose
    /// path already holds a section is merged into it rather than replacing it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::{node, Entry, Node};
    ///
    /// let node = Node::from_pairs([
    ///     ("aa.bb.cc", Entry::from(1)),
    ///     ("aa", Entry::from(node! { "dd": 2 })),
    /// ])?;
    /// assert_eq!(node.get("aa.bb.cc")?.as_i64(), Some(1));
    /// assert_eq!(node.get("aa.dd")?.as_i64(), Some(2));
    /// # Ok::<(), wax::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidKey`] or [`Error::TypeConflict`] exactly as
    /// [`Node::set`] does.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Entry)>,
        K: AsRef<str>,
    {
        let mut node = Node::new();
        for (path, value) in pairs {
            node.absorb(path.as_ref(), value)?;
        }
        Ok(node)
    }

    fn absorb(&mut self, path: &str, value: Entry) -> Result<()> {
        if let Entry::Child(incoming) = value {
            if let Ok(existing) = self.node_mut(path) {
                existing.merge(incoming);
                return Ok(());
            }
            return self.set(path, Entry::Child(incoming));
        }
        self.set(path, value)
    }

    /// Returns the number of keys directly under this node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if this node holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    // ---- dotted-path API -------------------------------------------------

    /// Looks up the entry at a dotted path.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if any segment is absent, [`Error::TypeConflict`]
    /// if a non-final segment holds something other than a section.
    pub fn get(&self, path: &str) -> Result<&Entry> {
        self.binding(path).map(|b| &b.entry)
    }

    /// Looks up the entry at a dotted path, returning a copy of `default` when
    /// the lookup fails for any reason.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::{Entry, Node};
    ///
    /// let node = Node::new();
    /// assert_eq!(node.get_or("missing.key", "no problem"), Entry::from("no problem"));
    /// ```
    #[must_use]
    pub fn get_or(&self, path: &str, default: impl Into<Entry>) -> Entry {
        match self.get(path) {
            Ok(entry) => entry.clone(),
            Err(_) => default.into(),
        }
    }

    /// Mutable variant of [`Node::get`].
    pub fn get_mut(&mut self, path: &str) -> Result<&mut Entry> {
        self.binding_mut(path).map(|b| &mut b.entry)
    }

    /// Returns `true` if a dotted path resolves to an entry.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Resolves a dotted path to a nested section.
    ///
    /// # Errors
    ///
    /// As [`Node::get`], plus [`Error::TypeConflict`] when the entry at `path`
    /// is not a section.
    pub fn node(&self, path: &str) -> Result<&Node> {
        match self.get(path)? {
            Entry::Child(node) => Ok(node),
            other => Err(Error::type_conflict(path, other.kind())),
        }
    }

    /// Mutable variant of [`Node::node`].
    pub fn node_mut(&mut self, path: &str) -> Result<&mut Node> {
        match self.get_mut(path)? {
            Entry::Child(node) => Ok(node),
            other => Err(Error::type_conflict(path, other.kind())),
        }
    }

    /// Assigns `value` at a dotted path, creating intermediate sections.
    ///
    /// An existing key keeps its position and decoration; a new key is
    /// appended.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::{Error, Node};
    ///
    /// let mut node = Node::new();
    /// node.set("a", 1)?;
    /// assert!(matches!(node.set("a.b", 2), Err(Error::TypeConflict { .. })));
    /// # Ok::<(), wax::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKey`] for a malformed segment, [`Error::TypeConflict`]
    /// when an intermediate segment holds something other than a section.
    pub fn set(&mut self, path: &str, value: impl Into<Entry>) -> Result<()> {
        let segments = key::split(path)?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| Error::invalid_key(path, "key is empty"))?;
        let node = self.walk_or_create(parents)?;
        node.put(last, value.into());
        Ok(())
    }

    /// Removes the binding at a dotted path and returns its entry.
    ///
    /// The order of the remaining keys is preserved, and ancestors left empty
    /// are kept.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the path does not resolve,
    /// [`Error::TypeConflict`] if it runs through a non-section.
    pub fn delete(&mut self, path: &str) -> Result<Entry> {
        let (parents, last) = split_last(path);
        let node = self.walk_mut(&parents, path)?;
        node.bindings
            .shift_remove(last)
            .map(|b| b.entry)
            .ok_or_else(|| Error::key_not_found(path))
    }

    // ---- literal-key API -------------------------------------------------

    /// Looks up a literal key in this node without splitting on dots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::Node;
    ///
    /// let mut node = Node::new();
    /// node.insert("version.major", 2)?;
    ///
    /// assert_eq!(node.get_key("version.major").and_then(|e| e.as_i64()), Some(2));
    /// assert!(node.get("version.major").is_err());
    /// # Ok::<(), wax::Error>(())
    /// ```
    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<&Entry> {
        self.bindings.get(key).map(|b| &b.entry)
    }

    /// Mutable variant of [`Node::get_key`].
    pub fn get_key_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.bindings.get_mut(key).map(|b| &mut b.entry)
    }

    /// Returns `true` if this node holds the literal key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    /// Binds a literal key in this node, returning the previous entry.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKey`] if `key` is not a well-formed literal key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Entry>) -> Result<Option<Entry>> {
        let key = key.into();
        key::validate_literal(&key)?;
        Ok(self.put(&key, value.into()))
    }

    /// Removes a literal key from this node, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.bindings.shift_remove(key).map(|b| b.entry)
    }

    // ---- attribute sugar -------------------------------------------------

    /// Attribute-style read of a single plain key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::{Error, Node};
    ///
    /// let mut node = Node::new();
    /// node.set_attr("host", "localhost")?;
    /// node.insert("get", 1)?;
    ///
    /// assert_eq!(node.attr("host")?.as_str(), Some("localhost"));
    /// assert!(matches!(node.attr("get"), Err(Error::ReservedName(_))));
    /// assert_eq!(node["get"].as_i64(), Some(1));
    /// # Ok::<(), wax::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::ReservedName`] for names in
    /// [`RESERVED_NAMES`](crate::key::RESERVED_NAMES), [`Error::InvalidKey`]
    /// for anything that is not a single segment, [`Error::KeyNotFound`] when
    /// absent.
    pub fn attr(&self, name: &str) -> Result<&Entry> {
        check_attr(name)?;
        self.get_key(name).ok_or_else(|| Error::key_not_found(name))
    }

    /// Attribute-style write of a single plain key.
    ///
    /// # Errors
    ///
    /// As [`Node::attr`], minus the missing-key case.
    pub fn set_attr(&mut self, name: &str, value: impl Into<Entry>) -> Result<()> {
        check_attr(name)?;
        self.put(name, value.into());
        Ok(())
    }

    // ---- iteration -------------------------------------------------------

    /// Iterates over `(key, entry)` pairs in insertion order.
    ///
    /// The iterator is lazy and can be recreated at any time; it yields the
    /// same order as long as the node is not mutated in between.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::Node;
    ///
    /// let mut node = Node::new();
    /// for key in ["zebra", "apple", "mango"] {
    ///     node.set(key, 0)?;
    /// }
    /// let keys: Vec<_> = node.items().map(|(k, _)| k).collect();
    /// assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    /// # Ok::<(), wax::Error>(())
    /// ```
    pub fn items(&self) -> Items<'_> {
        Items {
            inner: self.bindings.iter(),
        }
    }

    /// Iterates over the keys of this node in insertion order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        self.bindings.keys().map(String::as_str)
    }

    /// Iterates over the entries of this node in insertion order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &Entry> + ExactSizeIterator + '_ {
        self.bindings.values().map(|b| &b.entry)
    }

    /// A read-only view that resolves dotted paths on demand and can list
    /// every leaf under its flattened name.
    pub fn flat(&self) -> Flat<'_> {
        Flat::new(self)
    }

    // ---- decoration ------------------------------------------------------

    /// The comment and annotation attached to the binding at `path`.
    #[must_use]
    pub fn decor(&self, path: &str) -> Option<&Decor> {
        self.binding(path).ok().map(|b| &b.decor)
    }

    /// The `#` comment attached to the binding at `path`.
    #[must_use]
    pub fn comment(&self, path: &str) -> Option<&str> {
        self.decor(path).and_then(Decor::comment)
    }

    /// Attaches a `#` comment to the binding at `path`. `\r\n` line endings
    /// become `\n` and trailing whitespace is stripped.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] or [`Error::TypeConflict`] if `path` does not
    /// resolve.
    pub fn set_comment(&mut self, path: &str, text: impl Into<String>) -> Result<()> {
        self.binding_mut(path)?.decor.comment = Some(tidy(text.into()));
        Ok(())
    }

    /// Detaches the `#` comment from the binding at `path`.
    pub fn remove_comment(&mut self, path: &str) -> Result<Option<String>> {
        Ok(self.binding_mut(path)?.decor.comment.take())
    }

    /// The `;` annotation attached to the binding at `path`.
    #[must_use]
    pub fn annotation(&self, path: &str) -> Option<&str> {
        self.decor(path).and_then(Decor::annotation)
    }

    /// Attaches a `;` annotation to the binding at `path`. `\r\n` line endings
    /// become `\n` and trailing whitespace is stripped.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] or [`Error::TypeConflict`] if `path` does not
    /// resolve.
    pub fn set_annotation(&mut self, path: &str, text: impl Into<String>) -> Result<()> {
        self.binding_mut(path)?.decor.annotation = Some(tidy(text.into()));
        Ok(())
    }

    /// Detaches the `;` annotation from the binding at `path`.
    pub fn remove_annotation(&mut self, path: &str) -> Result<Option<String>> {
        Ok(self.binding_mut(path)?.decor.annotation.take())
    }

    /// Comment text that follows the last binding of a document.
    #[must_use]
    pub fn trailing_comment(&self) -> Option<&str> {
        self.trailing.as_deref()
    }

    /// Sets the comment emitted after everything else when this node is
    /// rendered as a document.
    pub fn set_trailing_comment(&mut self, text: impl Into<String>) {
        self.trailing = Some(tidy(text.into()));
    }

    /// Drops every `#` comment held directly by this node, including the
    /// trailing comment. Annotations and nested sections are left alone.
    pub fn clear_comments(&mut self) {
        self.trailing = None;
        for binding in self.bindings.values_mut() {
            binding.decor.comment = None;
        }
    }

    // ---- merging ---------------------------------------------------------

    /// Deep-merges `other` into this node.
    ///
    /// Bindings of `other` win, except that a section merged into a section
    /// is merged recursively. Decoration from `other` replaces decoration
    /// here when present. New keys are appended in `other`'s order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::node;
    ///
    /// let mut base = node! { "foo": { "a": 1, "c": 3 } };
    /// base.merge(node! { "foo": { "b": 2, "c": 4 } });
    ///
    /// assert_eq!(base, node! { "foo": { "a": 1, "c": 4, "b": 2 } });
    /// ```
    pub fn merge(&mut self, other: Node) {
        for (key, Binding { entry, decor }) in other.bindings {
            match self.bindings.get_mut(&key) {
                Some(existing) => {
                    existing.decor.absorb(decor);
                    match (&mut existing.entry, entry) {
                        (Entry::Child(mine), Entry::Child(theirs)) => mine.merge(theirs),
                        (slot, entry) => *slot = entry,
                    }
                }
                None => {
                    self.bindings.insert(key, Binding { entry, decor });
                }
            }
        }
        if other.trailing.is_some() {
            self.trailing = other.trailing;
        }
    }

    /// Compares two nodes like `==`, but also requires every level to list
    /// its keys in the same order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::node;
    ///
    /// let a = node! { "x": 1, "s": { "y": 2, "z": 3 } };
    /// let b = node! { "s": { "z": 3, "y": 2 }, "x": 1 };
    ///
    /// assert_eq!(a, b);
    /// assert!(!a.eq_ordered(&b));
    /// assert!(a.eq_ordered(&a.clone()));
    /// ```
    #[must_use]
    pub fn eq_ordered(&self, other: &Node) -> bool {
        self.bindings.len() == other.bindings.len()
            && self
                .bindings
                .iter()
                .zip(other.bindings.iter())
                .all(|((ka, a), (kb, b))| ka == kb && entry_eq_ordered(&a.entry, &b.entry))
    }

    // ---- crate internals -------------------------------------------------

    pub(crate) fn bindings(&self) -> indexmap::map::Iter<'_, String, Binding> {
        self.bindings.iter()
    }

    /// Stores the trailing comment verbatim.
    pub(crate) fn set_trailing_raw(&mut self, text: String) {
        self.trailing = Some(text);
    }

    /// Binds `key` with its decoration: later wins, in place.
    pub(crate) fn bind(&mut self, key: &str, entry: Entry, decor: Decor) {
        match self.bindings.get_mut(key) {
            Some(existing) => {
                existing.entry = entry;
                existing.decor.absorb(decor);
            }
            None => {
                self.bindings
                    .insert(key.to_string(), Binding { entry, decor });
            }
        }
    }

    /// Creates (or reopens) the section at `segments` and decorates its
    /// binding in the parent.
    pub(crate) fn open_section<S: AsRef<str>>(&mut self, segments: &[S], decor: Decor) -> Result<()> {
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| Error::invalid_key("", "section path is empty"))?;
        let parent = self.walk_or_create(parents)?;
        let binding = parent
            .bindings
            .entry(last.as_ref().to_string())
            .or_insert_with(|| Binding::new(Entry::Child(Node::new())));
        if !binding.entry.is_node() {
            return Err(Error::type_conflict(&join(segments), binding.entry.kind()));
        }
        binding.decor.absorb(decor);
        Ok(())
    }

    pub(crate) fn walk_mut<S: AsRef<str>>(&mut self, segments: &[S], path: &str) -> Result<&mut Node> {
        let mut node = self;
        for (i, segment) in segments.iter().enumerate() {
            let binding = node
                .bindings
                .get_mut(segment.as_ref())
                .ok_or_else(|| Error::key_not_found(path))?;
            node = match &mut binding.entry {
                Entry::Child(child) => child,
                other => return Err(Error::type_conflict(&join(&segments[..=i]), other.kind())),
            };
        }
        Ok(node)
    }

    fn walk<S: AsRef<str>>(&self, segments: &[S], path: &str) -> Result<&Node> {
        let mut node = self;
        for (i, segment) in segments.iter().enumerate() {
            let binding = node
                .bindings
                .get(segment.as_ref())
                .ok_or_else(|| Error::key_not_found(path))?;
            node = match &binding.entry {
                Entry::Child(child) => child,
                other => return Err(Error::type_conflict(&join(&segments[..=i]), other.kind())),
            };
        }
        Ok(node)
    }

    fn walk_or_create<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<&mut Node> {
        let mut node = self;
        for (i, segment) in segments.iter().enumerate() {
            let binding = node
                .bindings
                .entry(segment.as_ref().to_string())
                .or_insert_with(|| Binding::new(Entry::Child(Node::new())));
            node = match &mut binding.entry {
                Entry::Child(child) => child,
                other => return Err(Error::type_conflict(&join(&segments[..=i]), other.kind())),
            };
        }
        Ok(node)
    }

    fn binding(&self, path: &str) -> Result<&Binding> {
        let (parents, last) = split_last(path);
        self.walk(&parents, path)?
            .bindings
            .get(last)
            .ok_or_else(|| Error::key_not_found(path))
    }

    fn binding_mut(&mut self, path: &str) -> Result<&mut Binding> {
        let (parents, last) = split_last(path);
        self.walk_mut(&parents, path)?
            .bindings
            .get_mut(last)
            .ok_or_else(|| Error::key_not_found(path))
    }

    fn put(&mut self, key: &str, entry: Entry) -> Option<Entry> {
        match self.bindings.get_mut(key) {
            Some(existing) => Some(std::mem::replace(&mut existing.entry, entry)),
            None => {
                self.bindings.insert(key.to_string(), Binding::new(entry));
                None
            }
        }
    }
}

fn split_last(path: &str) -> (Vec<&str>, &str) {
    match path.rsplit_once(SEPARATOR) {
        Some((parents, last)) => (parents.split(SEPARATOR).collect(), last),
        None => (Vec::new(), path),
    }
}

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}

fn check_attr(name: &str) -> Result<()> {
    if key::is_reserved(name) {
        return Err(Error::reserved_name(name));
    }
    key::validate_segment(name)
}

/// Normalizes decoration text to what a rendered document reads back:
/// `\r\n` becomes `\n` and trailing whitespace is dropped.
fn tidy(mut text: String) -> String {
    if text.contains("\r\n") {
        text = text.replace("\r\n", "\n");
    }
    text.truncate(text.trim_end().len());
    text
}

fn entry_eq_ordered(a: &Entry, b: &Entry) -> bool {
    match (a, b) {
        (Entry::Child(a), Entry::Child(b)) => a.eq_ordered(b),
        (Entry::Array(a), Entry::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| entry_eq_ordered(a, b))
        }
        (a, b) => a == b,
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.bindings.len() == other.bindings.len()
            && self.bindings.iter().all(|(key, binding)| {
                other
                    .bindings
                    .get(key)
                    .is_some_and(|theirs| binding.entry == theirs.entry)
            })
    }
}

/// Panics if the literal key is absent, like indexing an `IndexMap`.
impl Index<&str> for Node {
    type Output = Entry;

    fn index(&self, key: &str) -> &Entry {
        match self.get_key(key) {
            Some(entry) => entry,
            None => panic!("key `{}` not found in node", key),
        }
    }
}

impl Add for Node {
    type Output = Node;

    fn add(mut self, other: Node) -> Node {
        self.merge(other);
        self
    }
}

impl AddAssign for Node {
    fn add_assign(&mut self, other: Node) {
        self.merge(other);
    }
}

/// Keys of the left node that the right node lacks; sections present on both
/// sides are diffed recursively and kept when the difference is non-empty.
impl Sub for &Node {
    type Output = Node;

    fn sub(self, other: &Node) -> Node {
        let mut out = Node::new();
        for (key, binding) in &self.bindings {
            match other.bindings.get(key) {
                None => {
                    out.bindings.insert(key.clone(), binding.clone());
                }
                Some(theirs) => {
                    if let (Entry::Child(mine), Entry::Child(theirs)) = (&binding.entry, &theirs.entry) {
                        let diff = mine - theirs;
                        if !diff.is_empty() {
                            out.bindings.insert(
                                key.clone(),
                                Binding {
                                    entry: Entry::Child(diff),
                                    decor: binding.decor.clone(),
                                },
                            );
                        }
                    }
                }
            }
        }
        out
    }
}

impl Sub for Node {
    type Output = Node;

    fn sub(self, other: Node) -> Node {
        &self - &other
    }
}

/// Lazy iterator over the `(key, entry)` pairs of a [`Node`].
#[derive(Clone)]
pub struct Items<'a> {
    inner: indexmap::map::Iter<'a, String, Binding>,
}

impl<'a> Iterator for Items<'a> {
    type Item = (&'a str, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, b)| (k.as_str(), &b.entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Items<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, b)| (k.as_str(), &b.entry))
    }
}

impl ExactSizeIterator for Items<'_> {}

impl fmt::Debug for Items<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = (&'a str, &'a Entry);
    type IntoIter = Items<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}

/// Owning iterator over the `(key, entry)` pairs of a [`Node`].
pub struct IntoIter {
    inner: indexmap::map::IntoIter<String, Binding>,
}

impl Iterator for IntoIter {
    type Item = (String, Entry);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, b)| (k, b.entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl IntoIterator for Node {
    type Item = (String, Entry);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.bindings.into_iter(),
        }
    }
}

/// Binds literal keys in iteration order, without validation. A repeated key
/// replaces the earlier value in place.
impl<K, V> FromIterator<(K, V)> for Node
where
    K: Into<String>,
    V: Into<Entry>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut node = Node::new();
        for (key, value) in iter {
            node.put(&key.into(), value.into());
        }
        node
    }
}

/// Convenience construction from an unordered map.
///
/// The resulting key order is whatever the `HashMap` enumerates, which varies
/// between runs. Prefer [`Node::from_pairs`] or `FromIterator` when order
/// matters.
impl From<HashMap<String, Entry>> for Node {
    fn from(map: HashMap<String, Entry>) -> Self {
        map.into_iter().collect()
    }
}

/// Turns an inline object into a section; nested objects become nested
/// sections, objects inside arrays stay objects.
impl From<Map> for Node {
    fn from(map: Map) -> Self {
        map.into_iter()
            .map(|(key, value)| match value {
                Entry::Object(inner) => (key, Entry::Child(Node::from(inner))),
                other => (key, other),
            })
            .collect()
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, entry) in self.items() {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of keys to values")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry::<String, Entry>()? {
                    values.insert(key, value);
                }
                Ok(Node::from(values))
            }
        }

        deserializer.deserialize_map(NodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node;

    #[test]
    fn test_order_preserved() {
        let mut node = Node::new();
        node.set("c", 1).unwrap();
        node.set("a", 2).unwrap();
        node.set("b", 3).unwrap();
        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["c", "a", "b"]);

        // replacing keeps the position
        node.set("c", 10).unwrap();
        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(node.get("c").unwrap().as_i64(), Some(10));
    }

    #[test]
    fn test_auto_vivification() {
        let mut node = Node::new();
        node.set("x.y.z", 5).unwrap();
        assert_eq!(node.get("x.y.z").unwrap().as_i64(), Some(5));
        let x = node.node("x").unwrap();
        assert!(x.get("y").unwrap().is_node());
    }

    #[test]
    fn test_type_conflict() {
        let mut node = Node::new();
        node.set("a", 1).unwrap();
        let err = node.set("a.b", 2).unwrap_err();
        assert_eq!(err, Error::type_conflict("a", "an integer"));

        let err = node.get("a.b").unwrap_err();
        assert!(err.is_type_conflict());
        assert_eq!(node.get("a").unwrap().as_i64(), Some(1));
    }

    #[test]
    fn test_missing_keys() {
        let node = node! { "b": { "c": { "d": 1 } } };
        assert!(node.get("x").unwrap_err().is_key_not_found());
        assert!(node.get("b.x.d").unwrap_err().is_key_not_found());
        assert_eq!(node.get_or("b.c.d", 2), Entry::from(1));
        assert_eq!(node.get_or("x", 2), Entry::from(2));
        // descending through a scalar also falls back to the default
        assert_eq!(node.get_or("b.c.d.e", 1), Entry::from(1));
        assert_eq!(node.get_or("b.c.d.e", Entry::Null), Entry::Null);
    }

    #[test]
    fn test_contains() {
        let node = node! { "foo": 1, "sub": { "bar": 2 } };
        assert!(node.contains("foo"));
        assert!(node.contains("sub.bar"));
        assert!(!node.contains("bar"));
        assert!(!node.contains("foo.bar"));
    }

    #[test]
    fn test_delete() {
        let mut node = node! { "foo": 1, "bar": 2, "baz": 3 };
        assert_eq!(node.delete("bar").unwrap(), Entry::from(2));
        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["foo", "baz"]);
        assert!(node.delete("bar").unwrap_err().is_key_not_found());
        assert!(node.delete("foo.bar").unwrap_err().is_type_conflict());
    }

    #[test]
    fn test_dotted_delete_keeps_empty_parent() {
        let mut node = node! { "foo": { "bar": {} } };
        node.delete("foo.bar").unwrap();
        assert_eq!(node, node! { "foo": {} });
    }

    #[test]
    fn test_reassign_child_discards_subtree() {
        let mut node = node! { "db": { "host": "x", "port": 1 } };
        node.set("db", 7).unwrap();
        assert_eq!(node.get("db").unwrap().as_i64(), Some(7));
        assert!(node.get("db.host").is_err());
    }

    #[test]
    fn test_literal_keys() {
        let mut node = Node::new();
        node.insert("a.b", 1).unwrap();
        node.set("a.b", 2).unwrap();

        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["a.b", "a"]);
        assert_eq!(node["a.b"].as_i64(), Some(1));
        assert_eq!(node.get("a.b").unwrap().as_i64(), Some(2));
        assert_eq!(node.remove("a.b"), Some(Entry::from(1)));
        assert!(node.insert("a..b", 1).is_err());
        assert!(node.insert("", 1).is_err());
    }

    #[test]
    #[should_panic(expected = "not found")]
    fn test_index_panics_on_missing_key() {
        let node = Node::new();
        let _ = &node["missing"];
    }

    #[test]
    fn test_invalid_keys() {
        let mut node = Node::new();
        for key in ["1key", "?:", "%", "a b", "a..b", ""] {
            assert!(
                matches!(node.set(key, 1), Err(Error::InvalidKey { .. })),
                "{} should be rejected",
                key
            );
        }
        assert!(node.is_empty());
    }

    #[test]
    fn test_attr_sugar() {
        let mut node = Node::new();
        node.set_attr("port", 80).unwrap();
        assert_eq!(node.attr("port").unwrap().as_i64(), Some(80));
        assert!(node.attr("missing").unwrap_err().is_key_not_found());

        for name in crate::key::RESERVED_NAMES {
            assert_eq!(node.set_attr(name, 1), Err(Error::reserved_name(name)));
        }
        assert!(matches!(node.set_attr("a.b", 1), Err(Error::InvalidKey { .. })));

        // reserved names are ordinary keys through the other APIs
        node.set("items", vec![1, 2]).unwrap();
        assert!(node["items"].is_array());
    }

    #[test]
    fn test_items_restartable() {
        let node = node! { "foo": 1, "bar": 2, "abc": 3, "xyz": 4 };
        let first: Vec<_> = node.items().map(|(k, _)| k).collect();
        let second: Vec<_> = node.items().map(|(k, _)| k).collect();
        assert_eq!(first, vec!["foo", "bar", "abc", "xyz"]);
        assert_eq!(first, second);
        assert_eq!(node.items().len(), 4);
        assert_eq!(node.items().next_back().map(|(k, _)| k), Some("xyz"));
    }

    #[test]
    fn test_decoration() {
        let mut node = node! { "a": 123, "sub": { "b": 1 } };
        node.set_annotation("a", "hi there  \n").unwrap();
        node.set_comment("sub.b", "about b").unwrap();

        assert_eq!(node.annotation("a"), Some("hi there"));
        assert_eq!(node.comment("sub.b"), Some("about b"));
        assert_eq!(node.annotation("zzz"), None);
        assert!(node.set_comment("zzz", "x").unwrap_err().is_key_not_found());

        assert_eq!(node.remove_annotation("a").unwrap(), Some("hi there".to_string()));
        assert!(node.decor("a").unwrap().is_empty());

        // replacing a value keeps its decoration, deleting drops it
        node.set("sub.b", 2).unwrap();
        assert_eq!(node.comment("sub.b"), Some("about b"));
        node.delete("sub.b").unwrap();
        node.set("sub.b", 3).unwrap();
        assert_eq!(node.comment("sub.b"), None);
    }

    #[test]
    fn test_decoration_line_endings_normalized() {
        let mut node = node! { "a": 1 };
        node.set_comment("a", "first\r\nsecond\r\n").unwrap();
        node.set_annotation("a", "one\r\ntwo").unwrap();
        node.set_trailing_comment("end\r\n");

        assert_eq!(node.comment("a"), Some("first\nsecond"));
        assert_eq!(node.annotation("a"), Some("one\ntwo"));
        assert_eq!(node.trailing_comment(), Some("end"));

        let back: Node = crate::render(&node).unwrap().parse().unwrap();
        assert_eq!(back.comment("a"), node.comment("a"));
        assert_eq!(back.annotation("a"), node.annotation("a"));
        assert_eq!(back.trailing_comment(), node.trailing_comment());
    }

    #[test]
    fn test_clear_comments() {
        let mut node = node! { "a": 1, "sub": { "b": 1 } };
        node.set_comment("a", "one").unwrap();
        node.set_annotation("a", "note").unwrap();
        node.set_comment("sub.b", "three").unwrap();
        node.set_trailing_comment("the end");

        node.clear_comments();
        assert_eq!(node.comment("a"), None);
        assert_eq!(node.annotation("a"), Some("note"));
        assert_eq!(node.comment("sub.b"), Some("three"));
        assert_eq!(node.trailing_comment(), None);
    }

    #[test]
    fn test_equality_ignores_decoration_and_order() {
        let a = node! { "x": 1, "y": 2 };
        let mut b = node! { "x": 1, "y": 2 };
        b.set_comment("x", "hello").unwrap();
        assert_eq!(a, b);
        assert!(a.eq_ordered(&b));

        let c = node! { "y": 2, "x": 1 };
        assert_eq!(a, c);
        assert!(!a.eq_ordered(&c));

        let nested = node! { "s": { "p": 1, "q": 2 } };
        let swapped = node! { "s": { "q": 2, "p": 1 } };
        assert_eq!(nested, swapped);
        assert!(!nested.eq_ordered(&swapped));

        assert_ne!(a, node! { "x": 1 });
        assert_ne!(a, node! { "x": 1, "y": 3 });
        assert_ne!(a, node! { "x": 1, "z": 2 });
    }

    #[test]
    fn test_merge() {
        let w1 = node! { "foo": 1 };
        let w2 = node! { "bar": 2 };
        assert_eq!(w1 + w2, node! { "foo": 1, "bar": 2 });

        let mut w1 = node! { "foo": 1 };
        w1 += node! { "foo": 2 };
        assert_eq!(w1, node! { "foo": 2 });

        let w1 = node! { "foo": { "a": 1, "c": 3 } };
        let w2 = node! { "foo": { "b": 2, "d": 4 } };
        assert_eq!(w1 + w2, node! { "foo": { "a": 1, "c": 3, "b": 2, "d": 4 } });
    }

    #[test]
    fn test_merge_decoration() {
        let mut base = node! { "a": 1, "b": 2 };
        base.set_annotation("a", "old").unwrap();
        base.set_annotation("b", "keep").unwrap();

        let mut other = node! { "a": 5 };
        other.set_annotation("a", "new").unwrap();
        other.set_trailing_comment("tail");

        base.merge(other);
        assert_eq!(base.annotation("a"), Some("new"));
        assert_eq!(base.annotation("b"), Some("keep"));
        assert_eq!(base.trailing_comment(), Some("tail"));
    }

    #[test]
    fn test_subtract() {
        let w1 = node! { "foo": 1 };
        let w2 = node! { "foo": 1 };
        let w3 = node! { "bar": 2 };
        let w4 = node! { "foo": 1, "bar": 2 };
        assert_eq!(&w1 - &w2, Node::new());
        assert_eq!(&w1 - &w3, w1);
        assert_eq!(&w4 - &w1, w3);

        let w1 = node! { "foo": 1, "sub": { "x": 1, "y": 2 } };
        let w2 = node! { "foo": 2, "sub": { "x": 1, "z": 3 } };
        assert_eq!(w1 - w2, node! { "sub": { "y": 2 } });
    }

    #[test]
    fn test_from_pairs_merges_sections() {
        let node = Node::from_pairs([
            ("aa", Entry::from(1)),
            ("bb", Entry::Child(node! { "cc": 2, "dd": { "ee": 3 } })),
            ("bb", Entry::Child(node! { "cc": 6, "ff": 7 })),
            ("bb.dd.gg", Entry::from(8)),
        ])
        .unwrap();

        assert_eq!(node.get("aa").unwrap().as_i64(), Some(1));
        assert_eq!(node.get("bb.cc").unwrap().as_i64(), Some(6));
        assert_eq!(node.get("bb.dd.ee").unwrap().as_i64(), Some(3));
        assert_eq!(node.get("bb.dd.gg").unwrap().as_i64(), Some(8));
        assert_eq!(node.get("bb.ff").unwrap().as_i64(), Some(7));

        let err = Node::from_pairs([("a", Entry::from(1)), ("a.b", Entry::from(2))]);
        assert!(err.unwrap_err().is_type_conflict());
    }

    #[test]
    fn test_from_hashmap() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), Entry::from(1));
        map.insert("b".to_string(), Entry::from(2));
        let node = Node::from(map);
        assert_eq!(node.len(), 2);
        assert_eq!(node.get("b").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_owned_iteration() {
        let node = node! { "a": 1, "b": "two" };
        let pairs: Vec<(String, Entry)> = node.into_iter().collect();
        assert_eq!(pairs[0], ("a".to_string(), Entry::from(1)));
        assert_eq!(pairs[1], ("b".to_string(), Entry::from("two")));
    }

    #[test]
    fn test_serde_json_conversion() {
        let node: Node =
            serde_json::from_str(r#"{"a":{"b":{"c":{"d":1}}},"list":[{"x":1}]}"#).unwrap();
        assert!(node.get("a.b.c").unwrap().is_node());
        assert_eq!(node.get("a.b.c.d").unwrap().as_i64(), Some(1));
        // objects inside arrays stay inline objects
        assert!(node.get("list").unwrap().as_array().unwrap()[0].is_object());

        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"a":{"b":{"c":{"d":1}}},"list":[{"x":1}]}"#);
    }
}
