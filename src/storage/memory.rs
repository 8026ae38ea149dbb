//! In-memory storage used by tests and benchmarks

use crate::storage::Storage;
use crate::types::StorageError;
use std::collections::HashMap;

/// Map-backed storage that counts writes per key
///
/// `failing()` builds an instance whose writes always fail, for exercising
/// the fire-and-forget save path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    saves: HashMap<String, usize>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose every write returns an I/O error
    pub fn failing() -> Self {
        MemoryStorage {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seed raw contents for `key` without counting it as a save
    pub fn with_raw(mut self, key: &str, contents: impl Into<String>) -> Self {
        self.entries.insert(key.to_string(), contents.into());
        self
    }

    /// Raw contents currently stored under `key`
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of successful writes to `key`
    pub fn save_count(&self, key: &str) -> usize {
        self.saves.get(key).copied().unwrap_or(0)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::io(key, "write rejected"));
        }
        self.entries.insert(key.to_string(), contents.to_string());
        *self.saves.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }
}
