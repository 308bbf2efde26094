//! Basic wax rendering and parsing.
//!
//! Run with: cargo run --example simple

use serde::Serialize;
use std::error::Error;
use wax::{parse, render, to_node};

#[derive(Debug, Serialize)]
struct Server {
    host: String,
    port: u16,
}

#[derive(Debug, Serialize)]
struct Config {
    name: String,
    debug: bool,
    server: Server,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "inventory".to_string(),
        debug: false,
        server: Server {
            host: "localhost".to_string(),
            port: 8080,
        },
    };

    // Convert to a node and render it
    let mut node = to_node(&config)?;
    node.set_comment("server", "where to listen")?;
    let text = render(&node)?;
    println!("wax output:\n{}", text);

    // Parse it back
    let back = parse(&text)?;
    assert_eq!(back, node);
    assert_eq!(back.comment("server"), Some("where to listen"));
    println!("port is {}", back.get("server.port")?);
    println!("✓ Round-trip successful");

    Ok(())
}
