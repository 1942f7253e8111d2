//! Snapshot persistence for the store table
//!
//! The whole table is written as a single JSON object on every save:
//! ```json
//! {
//!   "exhibit-1-1": { "id": 1, "content": "hello" },
//!   "exhibits-1": [1]
//! }
//! ```

use crate::{Result, StoreError};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// In-memory table: string key to opaque JSON value
pub type Table = serde_json::Map<String, Value>;

/// Persistence seam used by the store
///
/// `load` runs once when the store is opened; `save` is the only operation
/// that writes to disk and always receives the full table.
pub trait Durability: Send + Sync + 'static {
    /// Read the persisted table, or an empty one if nothing was persisted yet
    fn load(&self) -> Result<Table>;

    /// Replace the persisted table with `table`
    fn save(&self, table: &Table) -> Result<()>;
}

/// Single JSON file on local disk
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Durability for JsonFile {
    fn load(&self) -> Result<Table> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No data file at {}, starting empty", self.path.display());
                return Ok(Table::new());
            }
            Err(source) => {
                return Err(StoreError::Load {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let value: Value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        match value {
            Value::Object(table) => {
                info!("Loaded {} keys from {}", table.len(), self.path.display());
                Ok(table)
            }
            _ => Err(StoreError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    fn save(&self, table: &Table) -> Result<()> {
        let data = serde_json::to_vec(table).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e.into(),
        })?;

        atomic_write(&self.path, &data)?;
        debug!("Wrote {} keys ({} bytes) to {}", table.len(), data.len(), self.path.display());
        Ok(())
    }
}

/// Atomic write helper
///
/// Writes data to a temporary file next to the target, fsyncs it, then
/// renames it over the target. A crash mid-write leaves the previous
/// snapshot intact.
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| StoreError::Io { path, source }
    };

    // The temp file must live on the same filesystem for rename to be atomic
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_err(parent))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(io_err(parent))?;
    tmp.write_all(data).map_err(io_err(tmp.path()))?;
    tmp.as_file().sync_all().map_err(io_err(tmp.path()))?;
    tmp.persist(target).map_err(|e| StoreError::Io {
        path: target.to_path_buf(),
        source: e.error,
    })?;

    sync_dir(parent);
    Ok(())
}

/// Persist the rename itself (best effort)
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(handle) = fs::File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
