//! # wax
//!
//! An ordered, hierarchical context object with a human-editable text format
//! that round-trips exactly.
//!
//! ## What is wax?
//!
//! A wax document is a sequence of `key = value` lines grouped under
//! `[section.headers]`, where every value is a JSON literal. In memory the same
//! data is a [`Node`]: an insertion-ordered map whose entries can be nested
//! nodes, addressed either by literal key or by dotted path.
//!
//! ```text
//! # service settings
//! name = "api"
//!
//! [server]
//! ; reviewed
//! host = "0.0.0.0"
//! ports = [80,443]
//! ```
//!
//! ## Key Features
//!
//! - **Ordered**: keys come back in the order they were written, through every
//!   mutation, iteration and rendering
//! - **Dotted paths**: `node.set("a.b.c", 1)` creates the sections on the way
//! - **Lossless**: comments (`#`) and annotations (`;`) are kept and re-emitted
//! - **JSON values**: strings, numbers, booleans, null, arrays and objects use
//!   plain JSON syntax
//! - **Serde Compatible**: [`Node`] and [`Entry`] implement `Serialize` and
//!   `Deserialize`, and [`to_node`] converts any serializable struct
//!
//! ## Quick Start
//!
//! ```rust
//! use wax::{parse, render, Node};
//!
//! let mut config = Node::new();
//! config.set("server.host", "localhost")?;
//! config.set("server.port", 8080)?;
//! config.set_comment("server", "where to listen")?;
//!
//! let text = render(&config)?;
//! assert_eq!(text, "# where to listen\n[server]\nhost = \"localhost\"\nport = 8080\n");
//!
//! let back = parse(&text)?;
//! assert_eq!(back, config);
//! assert_eq!(back.get_or("server.tls", false).as_bool(), Some(false));
//! # Ok::<(), wax::Error>(())
//! ```
//!
//! ### Building values with macros
//!
//! ```rust
//! use wax::{node, entry};
//!
//! let config = node! {
//!     "name": "api",
//!     "server": { "host": "0.0.0.0", "ports": [80, 443] },
//!     "limits": entry!({ "cpu": 2 })
//! };
//! assert!(config.get("server")?.is_node());
//! assert!(config.get("limits")?.is_object());
//! # Ok::<(), wax::Error>(())
//! ```
//!
//! ### Substitution
//!
//! ```rust
//! use wax::{node, template::substitute};
//!
//! let config = node! { "db": { "host": "db1", "port": 5432 } };
//! let url = substitute("postgres://%(db.host)s:%(db.port)s", &config.flat())?;
//! assert_eq!(url, "postgres://db1:5432");
//! # Ok::<(), wax::Error>(())
//! ```
//!
//! ## Logging
//!
//! Parsing and rendering emit `tracing` events at `debug` and `trace` level.
//! The crate never installs a subscriber.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Build, render and parse a document
//! - **`macro.rs`** - Building nodes with the `node!` and `entry!` macros
//! - **`sections.rs`** - Dotted paths, sections, comments and annotations
//! - **`dynamic_values.rs`** - Working with `Entry` dynamically
//! - **`custom_options.rs`** - Customizing the rendered layout
//! - **`interpolation.rs`** - Flattened views and `%(path)s` substitution
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod flat;
pub mod key;
pub mod macros;
pub mod map;
pub mod node;
pub mod options;
pub mod ser;
pub mod template;
pub mod value;

pub use de::Parser;
pub use error::{Error, Result};
pub use flat::{Flat, Lookup};
pub use map::Map;
pub use node::{Decor, Node};
pub use options::RenderOptions;
pub use ser::{to_entry, to_node, EntrySerializer, Renderer};
pub use value::{Entry, Number};

/// Renders a node as a document with default options.
///
/// # Examples
///
/// ```rust
/// use wax::{node, render};
///
/// let config = node! { "a": 1, "b": { "c": [true, null] } };
/// assert_eq!(render(&config)?, "a = 1\n\n[b]\nc = [true,null]\n");
/// # Ok::<(), wax::Error>(())
/// ```
///
/// # Errors
///
/// [`Error::UnsupportedValue`] for non-finite floats, sections nested inside
/// arrays or objects, and sections bound under dotted keys;
/// [`Error::InvalidKey`] for keys outside the key grammar.
pub fn render(node: &Node) -> Result<String> {
    render_with_options(node, RenderOptions::default())
}

/// Renders a node as a document with custom options.
///
/// # Examples
///
/// ```rust
/// use wax::{node, render_with_options, RenderOptions};
///
/// let config = node! { "a": 1, "b": { "c": 2 } };
/// let text = render_with_options(&config, RenderOptions::compact())?;
/// assert_eq!(text, "a = 1\n[b]\nc = 2\n");
/// # Ok::<(), wax::Error>(())
/// ```
pub fn render_with_options(node: &Node, options: RenderOptions) -> Result<String> {
    let mut renderer = Renderer::new(options);
    renderer.render_document(node)?;
    Ok(renderer.into_inner())
}

/// Parses a document into a [`Node`].
///
/// # Examples
///
/// ```rust
/// use wax::parse;
///
/// let node = parse("[a.b]\nc = \"d\"\n")?;
/// assert_eq!(node.get("a.b.c")?.as_str(), Some("d"));
/// # Ok::<(), wax::Error>(())
/// ```
///
/// # Errors
///
/// [`Error::Syntax`] with the line and column of the first problem.
pub fn parse(text: &str) -> Result<Node> {
    de::parse(text)
}

/// Parses a document and merges it into `dest`.
///
/// Sections merge recursively and later values win. `dest` is left untouched
/// when the text does not parse.
///
/// # Examples
///
/// ```rust
/// use wax::{node, parse_into};
///
/// let mut config = node! { "debug": false, "db": { "host": "localhost" } };
/// parse_into("debug = true\n[db]\nport = 5432\n", &mut config)?;
///
/// assert_eq!(config.get("debug")?.as_bool(), Some(true));
/// assert_eq!(config.get("db.host")?.as_str(), Some("localhost"));
/// assert_eq!(config.get("db.port")?.as_i64(), Some(5432));
/// # Ok::<(), wax::Error>(())
/// ```
pub fn parse_into(text: &str, dest: &mut Node) -> Result<()> {
    de::parse_into(text, dest)
}
