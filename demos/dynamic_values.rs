//! Working with Entry for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::Serialize;
use std::error::Error;
use wax::{parse, to_entry, Entry, Node};

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn describe(path: &str, entry: &Entry) {
    match entry {
        Entry::Child(node) => println!("  {} is a section with {} keys", path, node.len()),
        Entry::Array(items) => println!("  {} is an array of {}", path, items.len()),
        other => println!("  {} is {}: {}", path, other.kind(), other),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut config = parse(
        "host = \"localhost\"\nport = 8080\nfeatures = [\"auth\", \"logging\"]\n\n[tls]\nenabled = false\n",
    )?;

    println!("Inspecting entries:");
    for (key, entry) in config.items() {
        describe(key, entry);
    }

    // Typed extraction
    let port: i64 = config.get("port")?.clone().try_into()?;
    println!("\nport as i64: {}", port);
    println!("timeout or default: {}", config.get_or("timeout", 30));

    // In-place mutation
    if let Some(Entry::Array(features)) = config.get_key_mut("features") {
        features.push(Entry::from("metrics"));
    }
    config.set("tls.enabled", true)?;
    config.set("tls.cert", "/etc/certs/server.pem")?;

    // Convert a struct to an Entry and store it inline
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };
    config.set("owner", to_entry(&user)?)?;

    // A section built separately and attached
    let mut limits = Node::new();
    limits.set("cpu", 2)?;
    config.set("limits", limits)?;

    println!("\nAfter mutation:");
    println!("{}", wax::render(&config)?);

    Ok(())
}
