//! Flattened views and `%(path)s` substitution.
//!
//! Run with: cargo run --example interpolation

use std::error::Error;
use wax::template::substitute;
use wax::{node, Error as WaxError};

fn main() -> Result<(), Box<dyn Error>> {
    let config = node! {
        "app": "billing",
        "db": { "user": "svc", "host": "db1.internal", "port": 5432 },
        "cache": { "ttl": 30.5 }
    };

    println!("Every leaf, by dotted path:");
    for (path, entry) in config.flat() {
        println!("  {} = {}", path, entry);
    }

    let flat = config.flat();
    let url = substitute("postgres://%(db.user)s@%(db.host)s:%(db.port)s/%(app)s", &flat)?;
    println!("\nconnection url: {}", url);

    let note = substitute("cache hit rate above 95%% after %(cache.ttl)s seconds", &flat)?;
    println!("note: {}", note);

    match substitute("%(db.password)s", &flat) {
        Err(WaxError::KeyNotFound { path }) => println!("missing key: {}", path),
        other => println!("unexpected: {:?}", other),
    }

    Ok(())
}
