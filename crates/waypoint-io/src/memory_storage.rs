//! In-memory storage backend for testing.
//!
//! Provides a HashMap-based storage that implements the Storage trait, so
//! manifest behaviour can be exercised without touching the filesystem.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use waypoint_core::error::{Error, Result};

use crate::storage::Storage;

/// Thread-safe in-memory storage. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A panic while holding the lock can't leave a half-written entry.
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Pre-populate data for a path (used by tests)
    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.lock().insert(path.into(), bytes.into());
    }

    /// Remove a path behind the manifest's back (simulates external deletion).
    pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }

    /// Get the number of stored objects
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Raw contents of a path, if present.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().get(path).cloned()
    }
}

impl Storage for MemoryStorage {
    fn write(&self, path: &str, bytes: &[u8]) -> Result<()> {
        self.lock().insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.lock()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("path not found: {path}")))
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.lock().remove(path);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.contains(path)
    }

    fn size(&self, path: &str) -> Result<u64> {
        self.lock()
            .get(path)
            .map(|b| b.len() as u64)
            .ok_or_else(|| Error::Storage(format!("path not found: {path}")))
    }
}
