//! Flattened, read-only access to a node tree.
//!
//! [`Flat`] answers dotted-path lookups without copying anything, and its
//! iterator walks the tree depth-first, yielding each leaf under its full
//! dotted name. It is the usual source for [`substitute`](crate::template::substitute).

use crate::key;
use crate::node::Items;
use crate::{Entry, Node, Result};

/// Something that can resolve a dotted path to an entry.
pub trait Lookup {
    /// Resolves `path`, failing with [`Error::KeyNotFound`](crate::Error::KeyNotFound)
    /// or [`Error::TypeConflict`](crate::Error::TypeConflict).
    fn lookup(&self, path: &str) -> Result<&Entry>;
}

impl Lookup for Node {
    fn lookup(&self, path: &str) -> Result<&Entry> {
        self.get(path)
    }
}

/// A read-only flattened view of a [`Node`].
///
/// # Examples
///
/// ```rust
/// use wax::node;
///
/// let config = node! { "db": { "host": "localhost", "port": 5432 }, "debug": true };
/// let flat = config.flat();
///
/// assert_eq!(flat.get("db.port")?.as_i64(), Some(5432));
/// let paths: Vec<String> = flat.iter().map(|(path, _)| path).collect();
/// assert_eq!(paths, vec!["db.host", "db.port", "debug"]);
/// # Ok::<(), wax::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Flat<'a> {
    root: &'a Node,
}

impl<'a> Flat<'a> {
    pub(crate) fn new(root: &'a Node) -> Self {
        Flat { root }
    }

    /// Resolves a dotted path against the underlying tree.
    pub fn get(&self, path: &str) -> Result<&'a Entry> {
        self.root.get(path)
    }

    /// Lazily yields `(dotted_path, entry)` for every leaf, depth-first in
    /// insertion order. Sections themselves are not yielded.
    ///
    /// Every yielded path resolves through [`Flat::get`]. Bindings under a
    /// literal key containing `.` have no such path and are skipped, along
    /// with anything nested below them; reach them with
    /// [`Node::get_key`](crate::Node::get_key).
    pub fn iter(&self) -> FlatIter<'a> {
        FlatIter {
            stack: vec![(String::new(), self.root.items())],
        }
    }
}

impl Lookup for Flat<'_> {
    fn lookup(&self, path: &str) -> Result<&Entry> {
        self.get(path)
    }
}

impl<'a> IntoIterator for Flat<'a> {
    type Item = (String, &'a Entry);
    type IntoIter = FlatIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first iterator returned by [`Flat::iter`].
#[derive(Debug, Clone)]
pub struct FlatIter<'a> {
    stack: Vec<(String, Items<'a>)>,
}

impl<'a> Iterator for FlatIter<'a> {
    type Item = (String, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, items) = self.stack.last_mut()?;
            match items.next() {
                None => {
                    self.stack.pop();
                }
                Some((name, _)) if name.contains(key::SEPARATOR) => {}
                Some((name, Entry::Child(child))) => {
                    let path = key::join(prefix, name);
                    self.stack.push((path, child.items()));
                }
                Some((name, entry)) => return Some((key::join(prefix, name), entry)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node;

    #[test]
    fn test_flat_iteration_order() {
        let node = node! {
            "a": 1,
            "b": { "c": 2, "d": { "e": 3 }, "f": 4 },
            "empty": {},
            "g": [1, 2]
        };
        let flat: Vec<(String, Entry)> = node
            .flat()
            .iter()
            .map(|(path, entry)| (path, entry.clone()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("a".to_string(), Entry::from(1)),
                ("b.c".to_string(), Entry::from(2)),
                ("b.d.e".to_string(), Entry::from(3)),
                ("b.f".to_string(), Entry::from(4)),
                ("g".to_string(), Entry::from(vec![1, 2])),
            ]
        );
    }

    #[test]
    fn test_flat_lookup() {
        let node = node! { "foo": { "bar": "baz" } };
        let flat = node.flat();
        assert_eq!(flat.lookup("foo.bar").unwrap().as_str(), Some("baz"));
        assert!(flat.lookup("foo.nope").unwrap_err().is_key_not_found());
        assert!(flat.lookup("foo").unwrap().is_node());
    }

    #[test]
    fn test_dotted_literal_keys_are_skipped() {
        let mut node = node! { "a": { "x": 1 } };
        node.node_mut("a").unwrap().insert("b.c", 2).unwrap();
        node.insert("d.e", node! { "f": 3 }).unwrap();

        let flat = node.flat();
        let paths: Vec<String> = flat.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["a.x"]);
        for path in &paths {
            assert!(flat.get(path).is_ok());
        }
        assert_eq!(node.node("a").unwrap().get_key("b.c"), Some(&Entry::from(2)));
    }

    #[test]
    fn test_empty_tree() {
        let node = Node::new();
        assert_eq!(node.flat().iter().count(), 0);
    }
}
