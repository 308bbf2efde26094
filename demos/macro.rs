//! Using the node! and entry! macros to build trees in code.
//!
//! Run with: cargo run --example macro

use std::error::Error;
use wax::{entry, node, render, Entry};

fn main() -> Result<(), Box<dyn Error>> {
    println!("Entries:");
    println!("  null:   {}", entry!(null));
    println!("  bool:   {}", entry!(true));
    println!("  number: {}", entry!(42));
    println!("  text:   {}", entry!("Hello, wax!"));
    println!("  mixed:  {}\n", entry!([1, "two", true, null]));

    let config = node! {
        "debug": true,
        "features": ["auth", "logging", "metrics"],
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432,
            "pool": entry!({ "min": 1, "max": 8 })
        }
    };

    println!("Nested sections:");
    println!("{}", render(&config)?);

    let items: Vec<Entry> = (1..=3)
        .map(|id| entry!({ "id": id, "status": if id == 3 { "done" } else { "open" } }))
        .collect();
    let summary = node! { "total": items.len() as i64, "items": items };

    println!("Dynamic construction:");
    println!("{}", render(&summary)?);

    println!("Accessing values:");
    println!("  App name: {}", config.get("app.name")?);
    if let Some(features) = config.get("features")?.as_array() {
        println!("  Features: {}", features.len());
    }

    Ok(())
}
