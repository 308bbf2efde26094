//! Key grammar and dotted path handling.
//!
//! A *segment* starts with an ASCII letter or `_` and continues with ASCII
//! letters, digits, `_` or `-`. A *literal key* is one or more segments joined
//! by `.`; a *dotted path* has the same shape but is split on `.` and walked
//! through nested sections.

use crate::{Error, Result};

/// Names that attribute-style access refuses, because they collide with the
/// operations of [`Node`](crate::Node) itself.
///
/// Keys with these names can still be stored and read through the dotted and
/// subscript APIs; only [`Node::attr`](crate::Node::attr) and
/// [`Node::set_attr`](crate::Node::set_attr) reject them.
pub const RESERVED_NAMES: &[&str] = &[
    "annotation",
    "attr",
    "clear_comments",
    "comment",
    "contains",
    "delete",
    "flat",
    "get",
    "get_key",
    "get_mut",
    "get_or",
    "insert",
    "is_empty",
    "items",
    "keys",
    "len",
    "merge",
    "node",
    "remove",
    "set",
    "set_attr",
    "values",
];

/// Separator between the segments of a dotted path.
pub const SEPARATOR: char = '.';

#[inline]
pub(crate) fn is_segment_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

#[inline]
pub(crate) fn is_segment_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Checks that `segment` is a single, well-formed key segment.
///
/// # Examples
///
/// ```rust
/// use wax::key::validate_segment;
///
/// assert!(validate_segment("listen_port").is_ok());
/// assert!(validate_segment("1st").is_err());
/// assert!(validate_segment("a.b").is_err());
/// ```
pub fn validate_segment(segment: &str) -> Result<()> {
    let mut chars = segment.chars();
    match chars.next() {
        None => Err(Error::invalid_key(segment, "key is empty")),
        Some(ch) if !is_segment_start(ch) => Err(Error::invalid_key(
            segment,
            "key must start with a letter or underscore",
        )),
        Some(_) => match chars.find(|&ch| !is_segment_char(ch)) {
            Some(SEPARATOR) => Err(Error::invalid_key(
                segment,
                "key segment cannot contain a dot",
            )),
            Some(_) => Err(Error::invalid_key(segment, "key contains illegal characters")),
            None => Ok(()),
        },
    }
}

/// Checks that `key` is a well-formed literal key: segments joined by dots.
pub fn validate_literal(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_key(key, "key is empty"));
    }
    for segment in key.split(SEPARATOR) {
        if segment.is_empty() {
            return Err(Error::invalid_key(key, "key contains an empty segment"));
        }
        validate_segment(segment).map_err(|_| {
            Error::invalid_key(key, "key contains illegal characters")
        })?;
    }
    Ok(())
}

/// Splits a dotted path into its segments, validating each one.
pub fn split(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split(SEPARATOR).collect();
    for segment in &segments {
        validate_segment(segment).map_err(|err| match err {
            Error::InvalidKey { reason, .. } => Error::invalid_key(path, &reason),
            other => other,
        })?;
    }
    Ok(segments)
}

/// Returns `true` if `name` is reserved for the node's own operations.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Joins `parent` and `key` into a dotted path.
pub(crate) fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", parent, SEPARATOR, key)
    }
}
