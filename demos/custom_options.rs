//! Customizing rendered output with RenderOptions.
//!
//! Run with: cargo run --example custom_options

use std::error::Error;
use wax::{entry, node, render, render_with_options, RenderOptions};

fn main() -> Result<(), Box<dyn Error>> {
    let mut config = node! {
        "name": "MyApp",
        "limits": entry!({ "cpu": 2, "memory": [512, 1024] }),
        "server": { "host": "0.0.0.0", "port": 80 },
        "db": { "url": "postgres://localhost" }
    };
    config.set_comment("server", "public listener")?;
    config.set_annotation("db.url", "rotated monthly")?;

    println!("Default:");
    println!("{}", render(&config)?);

    println!("Spaced JSON values:");
    let spaced = RenderOptions::new().with_spaced_json(true);
    println!("{}", render_with_options(&config, spaced)?);

    println!("Without comments or blank lines:");
    println!("{}", render_with_options(&config, RenderOptions::compact())?);

    Ok(())
}
