//! The debounced store
//!
//! Reads and writes hit the in-memory table only. Each `set` arms the
//! [`FlushScheduler`]; when it fires, the full table is handed to the
//! [`Durability`] backend as one snapshot.

use crate::durability::{Durability, JsonFile, Table};
use crate::scheduler::FlushScheduler;
use crate::{Result, StoreConfig, StoreError};
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

/// Persistent key-value store with coalesced, delayed flushes
///
/// Cloning is cheap; clones share the same table and scheduler.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    /// Backing file (informational for custom backends)
    path: PathBuf,
    /// Authoritative view of the data
    table: RwLock<Table>,
    /// Persistence backend
    durability: Box<dyn Durability>,
    /// Held from snapshot to end of write so the newest snapshot lands last
    save_lock: Mutex<()>,
    /// Deferred flush timer
    scheduler: FlushScheduler,
}

impl Store {
    /// Open the JSON file named by `config`, or start empty if it is missing
    ///
    /// Must be called from within a tokio runtime; deferred flushes are
    /// spawned on that runtime.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::with_durability(config, JsonFile::new(&config.path))
    }

    /// Open a store against `path` with the default flush delay
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(&StoreConfig::new(path))
    }

    /// Open a store over a custom persistence backend
    pub fn with_durability<D: Durability>(config: &StoreConfig, durability: D) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        let table = durability.load()?;

        Ok(Self {
            inner: Arc::new(Inner {
                path: config.path.clone(),
                table: RwLock::new(table),
                durability: Box::new(durability),
                save_lock: Mutex::new(()),
                scheduler: FlushScheduler::new(config.flush_delay(), runtime),
            }),
        })
    }

    /// Value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.table.read().get(key).cloned()
    }

    /// Value stored under `key`, or `default` when absent
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Typed read
    ///
    /// Returns `Ok(None)` when the key is absent and `Decode` when the
    /// stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Store `value` under `key` and arm a deferred flush
    ///
    /// Visible to `get` immediately. Never touches disk; a failure of the
    /// deferred flush is logged, not returned.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        debug!("set {}", key);
        self.inner.table.write().insert(key, value);

        let inner = Arc::clone(&self.inner);
        self.inner.scheduler.schedule(move || inner.flush_deferred());
    }

    /// Normalize a typed value to plain JSON, then [`set`](Self::set) it
    pub fn set_serialized<T: Serialize + ?Sized>(&self, key: impl Into<String>, value: &T) -> Result<()> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|source| StoreError::Encode {
            key: key.clone(),
            source,
        })?;
        self.set(key, value);
        Ok(())
    }

    /// Write the current table to disk now
    ///
    /// Intended for graceful shutdown. Blocks on disk I/O and waits for an
    /// in-flight deferred flush to finish first. A pending deferred flush is
    /// left armed and will rewrite the same snapshot when it fires.
    pub fn flush(&self) -> Result<()> {
        self.inner.save_current()
    }

    /// Whether a deferred flush is armed
    pub fn is_flush_pending(&self) -> bool {
        self.inner.scheduler.is_pending()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.inner.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.table.read().is_empty()
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.inner.table.read().keys().cloned().collect()
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.inner.path)
            .field("keys", &self.len())
            .field("flush_pending", &self.is_flush_pending())
            .finish()
    }
}

impl Inner {
    /// Copy of the table, taken under the read lock
    fn snapshot(&self) -> Table {
        self.table.read().clone()
    }

    /// Snapshot and write under the save lock
    fn save_current(&self) -> Result<()> {
        let _guard = self.save_lock.lock();
        self.durability.save(&self.snapshot())
    }

    /// Body of the deferred flush; retries once, then gives up
    fn flush_deferred(&self) {
        if let Err(e) = self.save_current() {
            warn!("Deferred flush to {} failed, retrying: {}", self.path.display(), e);

            if let Err(e) = self.save_current() {
                error!(
                    "Deferred flush to {} failed again, changes remain in memory only: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}
