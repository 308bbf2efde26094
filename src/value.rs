//! Dynamic value representation for wax entries.
//!
//! This module provides the [`Entry`] enum, the tagged value stored under every
//! key of a [`Node`], and [`Number`].
//!
//! ## Core Types
//!
//! - [`Entry`]: null, bool, number, string, array, inline JSON object, or a nested section
//! - [`Number`]: an exact integer of any size, or a float
//!
//! ## Objects versus sections
//!
//! [`Entry::Object`] and [`Entry::Child`] both map strings to entries, but they
//! are not interchangeable. An object is a leaf that renders inline as JSON
//! (`limits = {"cpu":2}`), while a child node is a section that renders under
//! its own `[header]`.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use wax::{Entry, Number};
//!
//! let number = Entry::from(42);
//! let text = Entry::from("hello");
//! let list = Entry::from(vec![1, 2, 3]);
//!
//! assert!(number.is_number());
//! assert_eq!(text.as_str(), Some("hello"));
//! assert_eq!(list.as_array().map(Vec::len), Some(3));
//! assert_eq!(number, Entry::Number(Number::Integer(42)));
//! ```

use crate::{Map, Node};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed value stored under a key of a [`Node`].
///
/// # Examples
///
/// ```rust
/// use wax::{Entry, Node};
///
/// let null = Entry::Null;
/// let section = Entry::Child(Node::new());
///
/// assert!(null.is_null());
/// assert!(section.is_node());
/// assert_eq!(section.kind(), "a section");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Entry {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Entry>),
    Object(Map),
    Child(Node),
}

/// A numeric value: an exact integer or a float.
///
/// Integers that fit in an `i64` are stored as [`Number::Integer`], larger
/// ones as [`Number::BigInt`]; either way they round-trip exactly. Floats are rendered with the shortest
/// representation that parses back to the same value, and always carry a `.`
/// or an exponent so they never come back as integers.
///
/// # Examples
///
/// ```rust
/// use wax::Number;
///
/// assert_eq!(Number::Integer(42).to_string(), "42");
/// assert_eq!(Number::Float(300.0).to_string(), "300.0");
/// assert_eq!(Number::Float(0.5).to_string(), "0.5");
/// assert_eq!(Number::Float(1e21).to_string(), "1e21");
/// assert_eq!(Number::from(u64::MAX).to_string(), "18446744073709551615");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
    /// An integer outside the `i64` range. Never holds a value that would fit
    /// in [`Number::Integer`].
    BigInt(BigInt),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::BigInt(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns `true` unless this is an infinite or NaN float.
    ///
    /// Non-finite floats have no JSON representation and cannot be rendered.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Integer(_) | Number::BigInt(_) => true,
            Number::Float(f) => f.is_finite(),
        }
    }

    /// Converts this number to an `i64` if possible.
    ///
    /// Returns `Some(i64)` for integers and floats with no fractional part
    /// that fit in the `i64` range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            Number::BigInt(_) => None,
        }
    }

    /// Converts this number to an `f64`, rounding integers that have no exact
    /// `f64` form.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
            Number::BigInt(big) => big.to_string().parse().unwrap_or(f64::NAN),
        }
    }

    /// Returns the integer value of this number at any size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use num_bigint::BigInt;
    /// use wax::Number;
    ///
    /// assert_eq!(Number::Integer(7).as_bigint(), Some(BigInt::from(7)));
    /// assert_eq!(Number::Float(7.0).as_bigint(), None);
    /// ```
    #[must_use]
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Number::Integer(i) => Some(BigInt::from(*i)),
            Number::BigInt(big) => Some(big.clone()),
            Number::Float(_) => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            // Debug output is the shortest round-trip form and keeps a `.0` on
            // whole numbers.
            Number::Float(fl) => write!(f, "{:?}", fl),
            Number::BigInt(big) => write!(f, "{}", big),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// Narrows to [`Number::Integer`] whenever the value fits.
impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        match i64::try_from(&value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(value),
        }
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::from(BigInt::from(value))
    }
}

impl From<i128> for Number {
    fn from(value: i128) -> Self {
        Number::from(BigInt::from(value))
    }
}

impl From<u128> for Number {
    fn from(value: u128) -> Self {
        Number::from(BigInt::from(value))
    }
}

impl Entry {
    /// Returns `true` if the entry is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Entry::Null)
    }

    /// Returns `true` if the entry is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Entry::Bool(_))
    }

    /// Returns `true` if the entry is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Entry::Number(_))
    }

    /// Returns `true` if the entry is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Entry::String(_))
    }

    /// Returns `true` if the entry is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Entry::Array(_))
    }

    /// Returns `true` if the entry is an inline JSON object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Entry::Object(_))
    }

    /// Returns `true` if the entry is a nested section.
    #[inline]
    #[must_use]
    pub const fn is_node(&self) -> bool {
        matches!(self, Entry::Child(_))
    }

    /// A short description of the entry's kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Entry::Null => "null",
            Entry::Bool(_) => "a boolean",
            Entry::Number(Number::Integer(_) | Number::BigInt(_)) => "an integer",
            Entry::Number(Number::Float(_)) => "a float",
            Entry::String(_) => "a string",
            Entry::Array(_) => "an array",
            Entry::Object(_) => "an object",
            Entry::Child(_) => "a section",
        }
    }

    /// If the entry is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Entry::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the entry is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Entry::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the entry is an integer or a whole-number float, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wax::Entry;
    ///
    /// assert_eq!(Entry::from(42).as_i64(), Some(42));
    /// assert_eq!(Entry::from(42.5).as_i64(), None);
    /// assert_eq!(Entry::from("42").as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Entry::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the entry is a number, returns it as an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Entry::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the entry is an array, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Entry>> {
        match self {
            Entry::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the entry is an inline object, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Entry::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// If the entry is a nested section, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Entry::Child(node) => Some(node),
            _ => None,
        }
    }

    /// If the entry is a nested section, returns a mutable reference to it.
    #[inline]
    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Entry::Child(node) => Some(node),
            _ => None,
        }
    }
}

/// Writes the entry as JSON text.
///
/// Sections are written as JSON objects and non-finite floats as `null`, so
/// this never fails; use [`render`](crate::render) for the strict document form.
///
/// # Examples
///
/// ```rust
/// use wax::Entry;
///
/// assert_eq!(Entry::from("a \"b\"").to_string(), r#""a \"b\"""#);
/// assert_eq!(Entry::from(vec![1, 2]).to_string(), "[1,2]");
/// ```
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        crate::ser::encode_json(&mut out, self, crate::ser::JsonStyle::lossy())
            .map_err(|_| fmt::Error)?;
        f.write_str(&out)
    }
}

impl Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Entry::Null => serializer.serialize_unit(),
            Entry::Bool(b) => serializer.serialize_bool(*b),
            Entry::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Entry::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            // Formats without arbitrary precision get the exact digits as text.
            Entry::Number(Number::BigInt(big)) => match u64::try_from(big) {
                Ok(u) => serializer.serialize_u64(u),
                Err(_) => serializer.collect_str(big),
            },
            Entry::String(s) => serializer.serialize_str(s),
            Entry::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Entry::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Entry::Child(node) => node.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = Entry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any JSON-compatible value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Entry::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Entry::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Entry::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(Entry::from(value))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(Entry::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Entry::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Entry::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Entry::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Entry::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Entry::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Entry::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Entry::Object(values))
            }
        }

        deserializer.deserialize_any(EntryVisitor)
    }
}

// TryFrom implementations for extracting values from Entry
impl TryFrom<Entry> for i64 {
    type Error = crate::Error;

    fn try_from(value: Entry) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| crate::Error::custom(format!("expected integer, found {}", value.kind())))
    }
}

impl TryFrom<Entry> for f64 {
    type Error = crate::Error;

    fn try_from(value: Entry) -> crate::Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| crate::Error::custom(format!("expected number, found {}", value.kind())))
    }
}

impl TryFrom<Entry> for bool {
    type Error = crate::Error;

    fn try_from(value: Entry) -> crate::Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| crate::Error::custom(format!("expected bool, found {}", value.kind())))
    }
}

impl TryFrom<Entry> for String {
    type Error = crate::Error;

    fn try_from(value: Entry) -> crate::Result<Self> {
        match value {
            Entry::String(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected string, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Entry> for Node {
    type Error = crate::Error;

    fn try_from(value: Entry) -> crate::Result<Self> {
        match value {
            Entry::Child(node) => Ok(node),
            other => Err(crate::Error::custom(format!(
                "expected section, found {}",
                other.kind()
            ))),
        }
    }
}

// From implementations for creating entries from primitives
impl From<bool> for Entry {
    fn from(value: bool) -> Self {
        Entry::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Entry {
                fn from(value: $ty) -> Self {
                    Entry::Number(Number::Integer(value as i64))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! from_wide_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Entry {
                fn from(value: $ty) -> Self {
                    Entry::Number(Number::from(value))
                }
            }
        )*
    };
}

from_wide_integer!(u64, i128, u128, BigInt);

impl From<f32> for Entry {
    fn from(value: f32) -> Self {
        Entry::Number(Number::Float(value as f64))
    }
}

impl From<f64> for Entry {
    fn from(value: f64) -> Self {
        Entry::Number(Number::Float(value))
    }
}

impl From<Number> for Entry {
    fn from(value: Number) -> Self {
        Entry::Number(value)
    }
}

impl From<String> for Entry {
    fn from(value: String) -> Self {
        Entry::String(value)
    }
}

impl From<&str> for Entry {
    fn from(value: &str) -> Self {
        Entry::String(value.to_string())
    }
}

impl<T: Into<Entry>> From<Vec<T>> for Entry {
    fn from(value: Vec<T>) -> Self {
        Entry::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Entry>> From<Option<T>> for Entry {
    fn from(value: Option<T>) -> Self {
        value.map_or(Entry::Null, Into::into)
    }
}

impl From<Map> for Entry {
    fn from(value: Map) -> Self {
        Entry::Object(value)
    }
}

impl From<Node> for Entry {
    fn from(value: Node) -> Self {
        Entry::Child(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_i64() {
        let value = Entry::Number(Number::Integer(42));
        assert_eq!(i64::try_from(value).unwrap(), 42);

        let value = Entry::Number(Number::Float(42.0));
        assert_eq!(i64::try_from(value).unwrap(), 42);

        let value = Entry::String("test".to_string());
        assert!(i64::try_from(value).is_err());
    }

    #[test]
    fn test_tryfrom_other() {
        assert_eq!(f64::try_from(Entry::from(3)).unwrap(), 3.0);
        assert!(bool::try_from(Entry::from(true)).unwrap());
        assert!(bool::try_from(Entry::from(1)).is_err());
        assert_eq!(String::try_from(Entry::from("hi")).unwrap(), "hi");
        assert!(Node::try_from(Entry::Child(Node::new())).is_ok());
        assert!(Node::try_from(Entry::Null).is_err());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Entry::from(true), Entry::Bool(true));
        assert_eq!(Entry::from(42i32), Entry::Number(Number::Integer(42)));
        assert_eq!(Entry::from(42u64), Entry::Number(Number::Integer(42)));
        assert_eq!(
            Entry::from(u64::MAX),
            Entry::Number(Number::BigInt(BigInt::from(u64::MAX)))
        );
        assert_eq!(Entry::from(-5i128), Entry::from(-5));
        assert_eq!(Entry::from(BigInt::from(9)), Entry::Number(Number::Integer(9)));
        assert_eq!(Entry::from(3.5f64), Entry::Number(Number::Float(3.5)));
        assert_eq!(Entry::from("test"), Entry::String("test".to_string()));
        assert_eq!(Entry::from(None::<i32>), Entry::Null);
        assert_eq!(Entry::from(Some("x")), Entry::from("x"));
    }

    #[test]
    fn test_from_collections() {
        let value = Entry::from(vec![1, 2]);
        assert_eq!(
            value,
            Entry::Array(vec![Entry::from(1), Entry::from(2)])
        );

        let mut map = Map::new();
        map.insert("key".to_string(), Entry::from(42));
        assert_eq!(Entry::from(map.clone()), Entry::Object(map));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Integer(-7).to_string(), "-7");
        assert_eq!(Number::Float(3.14159).to_string(), "3.14159");
        assert_eq!(Number::Float(300.0).to_string(), "300.0");
        assert_eq!(Number::Float(-0.25).to_string(), "-0.25");
        assert_eq!(Number::Float(1.5e-7).to_string(), "1.5e-7");
        assert_eq!(Number::from(i128::MIN).to_string(), "-170141183460469231731687303715884105728");
    }

    #[test]
    fn test_big_integers() {
        let big = Number::from(u64::MAX);
        assert!(big.is_integer());
        assert!(!big.is_float());
        assert_eq!(big.as_i64(), None);
        assert_eq!(big.as_f64(), u64::MAX as f64);
        assert_eq!(big.as_bigint(), Some(BigInt::from(u64::MAX)));
        assert_eq!(Entry::Number(big).kind(), "an integer");
    }

    #[test]
    fn test_big_integer_serde() {
        let entry = Entry::from(u64::MAX);
        assert_eq!(serde_json::to_string(&entry).unwrap(), "18446744073709551615");
        let back: Entry = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(back, entry);

        let huge = Entry::from(u128::MAX);
        assert_eq!(
            serde_json::to_string(&huge).unwrap(),
            "\"340282366920938463463374607431768211455\""
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(Entry::Null.kind(), "null");
        assert_eq!(Entry::from(1).kind(), "an integer");
        assert_eq!(Entry::from(1.5).kind(), "a float");
        assert_eq!(Entry::Object(Map::new()).kind(), "an object");
        assert_eq!(Entry::Child(Node::new()).kind(), "a section");
    }

    #[test]
    fn test_display_is_json() {
        let mut map = Map::new();
        map.insert("a".to_string(), Entry::from(vec![Entry::Null, Entry::from(false)]));
        assert_eq!(Entry::Object(map).to_string(), r#"{"a":[null,false]}"#);
        assert_eq!(Entry::from(f64::INFINITY).to_string(), "null");
    }

    #[test]
    fn test_serde_json_roundtrip() {
        let json = r#"{"name":"Alice","tags":["a","b"],"n":null,"x":1.5}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert!(entry.is_object());
        assert_eq!(serde_json::to_string(&entry).unwrap(), json);
    }
}
