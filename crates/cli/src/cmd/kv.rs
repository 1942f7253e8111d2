//! Raw key access

use anyhow::Result;
use exhibit_store::{Store, Value};
use owo_colors::OwoColorize;

/// Print the value under `key`
pub fn get(store: &Store, key: &str, default: Option<&str>) -> Result<()> {
    match store.get(key) {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => match default {
            Some(default) => println!("{}", default),
            None => anyhow::bail!("Key not found: {}", key),
        },
    }
    Ok(())
}

/// Store `raw` under `key`
///
/// `raw` is parsed as JSON; anything that does not parse is stored as a
/// plain string.
pub fn set(store: &Store, key: &str, raw: &str) -> Result<()> {
    let value = parse_value(raw);
    store.set(key, value);
    println!("{} {}", "✓".green(), key.cyan());
    Ok(())
}

/// List keys, optionally filtered by prefix
pub fn keys(store: &Store, prefix: Option<&str>) -> Result<()> {
    for key in store.keys() {
        if prefix.map_or(true, |p| key.starts_with(p)) {
            println!("{}", key);
        }
    }
    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
