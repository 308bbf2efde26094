//! Ordered map type for inline JSON objects.
//!
//! This module provides [`Map`], a wrapper around [`IndexMap`] used by
//! [`Entry::Object`](crate::Entry::Object). An object is an opaque leaf value:
//! it renders inline as JSON and never turns into a section.
//!
//! ## Why IndexMap?
//!
//! JSON objects are unordered, but the renderer must produce the same text for
//! the same object every time. `IndexMap` keeps insertion order for output,
//! while its equality ignores order, which is exactly the JSON object contract.
//!
//! ## Examples
//!
//! ```rust
//! use wax::{Entry, Map};
//!
//! let mut map = Map::new();
//! map.insert("name".to_string(), Entry::from("Alice"));
//! map.insert("age".to_string(), Entry::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Entry;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to entries, rendered as an inline JSON object.
///
/// # Examples
///
/// ```rust
/// use wax::{Entry, Map};
///
/// let mut a = Map::new();
/// a.insert("x".to_string(), Entry::from(1));
/// a.insert("y".to_string(), Entry::from(2));
///
/// let mut b = Map::new();
/// b.insert("y".to_string(), Entry::from(2));
/// b.insert("x".to_string(), Entry::from(1));
///
/// // Iteration keeps insertion order, equality does not care about it.
/// assert_eq!(a.keys().collect::<Vec<_>>(), vec!["x", "y"]);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map(IndexMap<String, Entry>);

impl Map {
    /// Creates an empty `Map`.
    #[must_use]
    pub fn new() -> Self {
        Map(IndexMap::new())
    }

    /// Creates an empty `Map` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Map(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced in place
    /// and the old value is returned.
    pub fn insert(&mut self, key: String, value: Entry) -> Option<Entry> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.0.get_mut(key)
    }

    /// Removes a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.0.shift_remove(key)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Entry> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Entry> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Entry> {
        self.0.iter()
    }
}

impl From<HashMap<String, Entry>> for Map {
    fn from(map: HashMap<String, Entry>) -> Self {
        Map(map.into_iter().collect())
    }
}

impl From<Map> for HashMap<String, Entry> {
    fn from(map: Map) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Map {
    type Item = (String, Entry);
    type IntoIter = indexmap::map::IntoIter<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Entry);
    type IntoIter = indexmap::map::Iter<'a, String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Entry)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Entry)>>(iter: T) -> Self {
        Map(IndexMap::from_iter(iter))
    }
}
