//! CLI command implementations

pub mod exhibit;
pub mod kv;
