//! Debounced JSON key-value store
//!
//! This crate provides:
//! - An in-memory table that is the single source of truth for reads
//! - A durability layer that snapshots the whole table to one JSON file
//! - A coalescing scheduler so bursts of writes cost one disk write
//! - Environment/TOML configuration for the data file and flush delay

pub mod config;
pub mod durability;
pub mod error;
pub mod scheduler;
pub mod store;

// Re-exports
pub use config::StoreConfig;
pub use durability::{Durability, JsonFile, Table};
pub use error::{Result, StoreError};
pub use serde_json::Value;
pub use store::Store;
