//! Dotted paths, sections, comments and annotations.
//!
//! Run with: cargo run --example sections

use std::error::Error;
use wax::{parse, parse_into, render};

const BASE: &str = "\
# service settings
name = \"api\"

[server]
; reviewed
host = \"0.0.0.0\"
port = 80

[server.tls]
enabled = false
";

const OVERRIDES: &str = "\
[server]
port = 8443

[server.tls]
enabled = true
cert = \"/etc/certs/api.pem\"
";

fn main() -> Result<(), Box<dyn Error>> {
    let mut config = parse(BASE)?;

    println!("Dotted reads:");
    println!("  server.host = {}", config.get("server.host")?);
    println!("  server.tls.enabled = {}", config.get("server.tls.enabled")?);
    println!("  annotation on server.host: {:?}", config.annotation("server.host"));

    // Later documents override earlier ones, section by section
    parse_into(OVERRIDES, &mut config)?;

    // Setting a deep path creates the sections on the way
    config.set("logging.level", "info")?;
    config.set_comment("logging", "added at startup")?;

    // Keys with dots can still be stored literally
    config.node_mut("server")?.insert("x.forwarded", true)?;

    let removed = config.delete("server.tls.cert")?;
    println!("  removed cert: {}", removed);

    println!("\nMerged document:\n{}", render(&config)?);

    let listed: Vec<&str> = config.node("server")?.keys().collect();
    println!("server keys in order: {:?}", listed);

    Ok(())
}
