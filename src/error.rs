//! Error types for wax documents and context objects.
//!
//! Every fallible operation in the crate returns [`Result`], whose error type is
//! the single [`Error`] enum below.
//!
//! ## Error Categories
//!
//! - **Lookup errors**: a dotted path names a key that does not exist
//!   ([`Error::KeyNotFound`]) or tries to descend through a value that is not a
//!   section ([`Error::TypeConflict`])
//! - **Syntax errors**: malformed document text, with line/column information
//! - **Unsupported values**: an entry that has no representation in the text format
//! - **Key errors**: malformed key names and reserved attribute names
//!
//! ## Examples
//!
//! ```rust
//! use wax::{parse, Error};
//!
//! let result = parse("[server]\nport = 12.");
//! match result {
//!     Err(Error::Syntax { line, .. }) => assert_eq!(line, 2),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
///
/// Each variant carries enough context to point at the offending path or line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A dotted path named a key that does not exist.
    #[error("key not found: `{path}`")]
    KeyNotFound { path: String },

    /// A dotted path tried to descend through an entry that is not a section.
    #[error("cannot descend through `{path}`: it holds {found}, not a section")]
    TypeConflict { path: String, found: String },

    /// Malformed document text.
    #[error("syntax error at line {line}, column {column}: {reason}")]
    Syntax {
        line: usize,
        column: usize,
        reason: String,
    },

    /// An entry reached the serializer that the text format cannot represent.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// A key or path segment does not follow the key grammar.
    #[error("invalid key `{key}`: {reason}")]
    InvalidKey { key: String, reason: String },

    /// An attribute-style access used one of the node's own operation names.
    #[error("`{0}` is a reserved name; use the subscript form to reach this key")]
    ReservedName(String),

    /// A substitution template contained a malformed placeholder.
    #[error("template error at offset {offset}: {reason}")]
    Template { offset: usize, reason: String },

    /// Custom error raised through serde.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a key-not-found error for `path`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::Error;
    ///
    /// let err = Error::key_not_found("server.port");
    /// assert!(err.to_string().contains("server.port"));
    /// ```
    pub fn key_not_found(path: &str) -> Self {
        Error::KeyNotFound {
            path: path.to_string(),
        }
    }

    /// Creates a type conflict error; `found` names the kind of the blocking entry.
    pub fn type_conflict(path: &str, found: &str) -> Self {
        Error::TypeConflict {
            path: path.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::Error;
    ///
    /// let err = Error::syntax(10, 5, "unterminated string");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, column: usize, reason: &str) -> Self {
        Error::Syntax {
            line,
            column,
            reason: reason.to_string(),
        }
    }

    /// Creates an unsupported value error.
    pub fn unsupported_value(msg: &str) -> Self {
        Error::UnsupportedValue(msg.to_string())
    }

    /// Creates an invalid key error.
    pub fn invalid_key(key: &str, reason: &str) -> Self {
        Error::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a reserved name error.
    pub fn reserved_name(name: &str) -> Self {
        Error::ReservedName(name.to_string())
    }

    /// Creates a template error at byte `offset` of the template.
    pub fn template(offset: usize, reason: &str) -> Self {
        Error::Template {
            offset,
            reason: reason.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` for [`Error::KeyNotFound`].
    #[must_use]
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }

    /// Returns `true` for [`Error::TypeConflict`].
    #[must_use]
    pub fn is_type_conflict(&self) -> bool {
        matches!(self, Error::TypeConflict { .. })
    }

    /// Returns `true` for [`Error::Syntax`].
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }

    /// Line number for syntax errors, `None` otherwise.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::type_conflict("a.b", "an integer");
        assert_eq!(
            err.to_string(),
            "cannot descend through `a.b`: it holds an integer, not a section"
        );

        let err = Error::syntax(3, 7, "invalid number");
        assert_eq!(
            err.to_string(),
            "syntax error at line 3, column 7: invalid number"
        );
    }

    #[test]
    fn test_predicates() {
        assert!(Error::key_not_found("x").is_key_not_found());
        assert!(Error::type_conflict("x", "null").is_type_conflict());
        assert!(Error::syntax(1, 1, "bad").is_syntax());
        assert_eq!(Error::syntax(4, 1, "bad").line(), Some(4));
        assert_eq!(Error::unsupported_value("NaN").line(), None);
    }
}
