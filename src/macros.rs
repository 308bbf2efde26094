/// Builds an [`Entry`](crate::Entry) from JSON-like syntax.
///
/// `null`, arrays and objects are written as in JSON; any other expression is
/// converted with `Entry::from`. Objects become inline [`Entry::Object`]
/// values; use [`node!`] for sections.
///
/// ```rust
/// use wax::{entry, Entry};
///
/// let value = entry!({ "ids": [1, 2, -3], "name": "x", "missing": null });
/// assert!(value.is_object());
/// assert_eq!(value.to_string(), r#"{"ids":[1,2,-3],"name":"x","missing":null}"#);
/// assert_eq!(entry!(1.5 * 2.0), Entry::from(3.0));
/// ```
///
/// [`Entry::Object`]: crate::Entry::Object
#[macro_export]
macro_rules! entry {
    (null) => {
        $crate::Entry::Null
    };

    ([]) => {
        $crate::Entry::Array(::std::vec::Vec::new())
    };

    ([ $($tt:tt)+ ]) => {{
        let mut items = ::std::vec::Vec::new();
        $crate::__entry_items!(items; $($tt)+);
        $crate::Entry::Array(items)
    }};

    ({}) => {
        $crate::Entry::Object($crate::Map::new())
    };

    ({ $($tt:tt)+ }) => {{
        let mut object = $crate::Map::new();
        $crate::__entry_members!(object; $($tt)+);
        $crate::Entry::Object(object)
    }};

    ($value:expr) => {
        $crate::Entry::from($value)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __entry_items {
    ($items:ident;) => {};

    ($items:ident; null $(, $($rest:tt)*)?) => {
        $items.push($crate::Entry::Null);
        $crate::__entry_items!($items; $($($rest)*)?);
    };

    ($items:ident; [ $($inner:tt)* ] $(, $($rest:tt)*)?) => {
        $items.push($crate::entry!([ $($inner)* ]));
        $crate::__entry_items!($items; $($($rest)*)?);
    };

    ($items:ident; { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $items.push($crate::entry!({ $($inner)* }));
        $crate::__entry_items!($items; $($($rest)*)?);
    };

    ($items:ident; $value:expr $(, $($rest:tt)*)?) => {
        $items.push($crate::entry!($value));
        $crate::__entry_items!($items; $($($rest)*)?);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __entry_members {
    ($object:ident;) => {};

    ($object:ident; $key:literal : null $(, $($rest:tt)*)?) => {
        $object.insert(::std::string::String::from($key), $crate::Entry::Null);
        $crate::__entry_members!($object; $($($rest)*)?);
    };

    ($object:ident; $key:literal : [ $($inner:tt)* ] $(, $($rest:tt)*)?) => {
        $object.insert(::std::string::String::from($key), $crate::entry!([ $($inner)* ]));
        $crate::__entry_members!($object; $($($rest)*)?);
    };

    ($object:ident; $key:literal : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $object.insert(::std::string::String::from($key), $crate::entry!({ $($inner)* }));
        $crate::__entry_members!($object; $($($rest)*)?);
    };

    ($object:ident; $key:literal : $value:expr $(, $($rest:tt)*)?) => {
        $object.insert(::std::string::String::from($key), $crate::entry!($value));
        $crate::__entry_members!($object; $($($rest)*)?);
    };
}

/// Builds a [`Node`](crate::Node) in the order the keys are written.
///
/// Braced values become nested sections, everything else goes through
/// [`entry!`]. Keys are bound literally, like `FromIterator`: they are not
/// split on dots, and a repeated key replaces the earlier value in place.
///
/// ```rust
/// use wax::node;
///
/// let config = node! {
///     "name": "demo",
///     "server": { "host": "localhost", "ports": [80, 443] },
///     "limits": null
/// };
/// assert_eq!(config.keys().collect::<Vec<_>>(), vec!["name", "server", "limits"]);
/// assert!(config.get("server")?.is_node());
/// assert_eq!(config.get("server.ports")?.to_string(), "[80,443]");
/// # Ok::<(), wax::Error>(())
/// ```
#[macro_export]
macro_rules! node {
    () => {
        $crate::Node::new()
    };

    ($($tt:tt)+) => {{
        let mut pairs: ::std::vec::Vec<(::std::string::String, $crate::Entry)> =
            ::std::vec::Vec::new();
        $crate::__node_pairs!(pairs; $($tt)+);
        pairs.into_iter().collect::<$crate::Node>()
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __node_pairs {
    ($pairs:ident;) => {};

    ($pairs:ident; $key:literal : null $(, $($rest:tt)*)?) => {
        $pairs.push((::std::string::String::from($key), $crate::Entry::Null));
        $crate::__node_pairs!($pairs; $($($rest)*)?);
    };

    ($pairs:ident; $key:literal : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $pairs.push((
            ::std::string::String::from($key),
            $crate::Entry::Child($crate::node!($($inner)*)),
        ));
        $crate::__node_pairs!($pairs; $($($rest)*)?);
    };

    ($pairs:ident; $key:literal : [ $($inner:tt)* ] $(, $($rest:tt)*)?) => {
        $pairs.push((::std::string::String::from($key), $crate::entry!([ $($inner)* ])));
        $crate::__node_pairs!($pairs; $($($rest)*)?);
    };

    ($pairs:ident; $key:literal : $value:expr $(, $($rest:tt)*)?) => {
        $pairs.push((::std::string::String::from($key), $crate::entry!($value)));
        $crate::__node_pairs!($pairs; $($($rest)*)?);
    };
}

#[cfg(test)]
mod tests {
    use crate::{Entry, Map, Node, Number};

    #[test]
    fn test_entry_macro_primitives() {
        assert_eq!(entry!(null), Entry::Null);
        assert_eq!(entry!(true), Entry::Bool(true));
        assert_eq!(entry!(42), Entry::Number(Number::Integer(42)));
        assert_eq!(entry!(-7), Entry::Number(Number::Integer(-7)));
        assert_eq!(entry!(3.5), Entry::Number(Number::Float(3.5)));
        assert_eq!(entry!("hello"), Entry::String("hello".to_string()));
    }

    #[test]
    fn test_entry_macro_collections() {
        assert_eq!(entry!([]), Entry::Array(vec![]));
        assert_eq!(entry!({}), Entry::Object(Map::new()));
        assert_eq!(
            entry!([1, null, [true], {}]),
            Entry::Array(vec![
                Entry::from(1),
                Entry::Null,
                Entry::Array(vec![Entry::Bool(true)]),
                Entry::Object(Map::new()),
            ])
        );

        let name = "computed";
        let obj = entry!({ "name": name, "len": name.len() as i64, });
        let map = obj.as_object().unwrap();
        assert_eq!(map.get("name"), Some(&Entry::from("computed")));
        assert_eq!(map.get("len"), Some(&Entry::from(8)));
    }

    #[test]
    fn test_node_macro() {
        assert_eq!(node! {}, Node::new());

        let node = node! {
            "a": 1,
            "sub": { "deep": { "x": null } },
            "list": [{ "inline": true }],
            "a": 2,
        };
        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["a", "sub", "list"]);
        assert_eq!(node.get("a").unwrap().as_i64(), Some(2));
        assert!(node.get("sub.deep.x").unwrap().is_null());
        assert!(node.get("list").unwrap().as_array().unwrap()[0].is_object());
    }

    #[test]
    fn test_node_macro_literal_keys() {
        let node = node! { "a.b": 1 };
        assert_eq!(node.get_key("a.b"), Some(&Entry::from(1)));
        assert!(node.get("a.b").is_err());
    }
}
