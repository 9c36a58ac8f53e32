//! Local snapshot persistence for cart and wishlist state.
//!
//! Each container serializes its full collection to one keyed blob per
//! mutation; there is no incremental diffing. Persistence is best-effort:
//! the in-memory containers stay authoritative, and a missing or corrupt
//! snapshot simply hydrates to an empty collection.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// A keyed store of serialized collection snapshots.
pub trait SnapshotStore {
    /// Load and deserialize the snapshot stored under `key`.
    ///
    /// Returns `None` when no snapshot exists or the stored bytes fail to
    /// deserialize; a corrupt snapshot is logged and treated as absent.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    /// Serialize `value` and store it under `key`, synchronously.
    ///
    /// Failures (full disk, unwritable directory) are logged and swallowed
    /// so they can never take down the in-memory containers.
    fn save<T: Serialize>(&self, key: &str, value: &T);
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        (**self).load(key)
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) {
        (**self).save(key, value);
    }
}

/// File-backed store writing one JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`.
    ///
    /// The directory is created lazily on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for JsonFileStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(key, "no snapshot on disk");
                return None;
            }
            Err(err) => {
                warn!(key, error = %err, "failed to read snapshot");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "corrupt snapshot, starting empty");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            warn!(key, error = %err, "failed to create snapshot directory");
            return;
        }

        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(key, error = %err, "failed to serialize snapshot");
                return;
            }
        };

        if let Err(err) = fs::write(self.path_for(key), bytes) {
            warn!(key, error = %err, "failed to write snapshot");
        }
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cells: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        let value = cells.get(key)?.clone();
        match serde_json::from_value(value) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "corrupt snapshot, starting empty");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.cells
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key.to_string(), value);
            }
            Err(err) => warn!(key, error = %err, "failed to serialize snapshot"),
        }
    }
}
