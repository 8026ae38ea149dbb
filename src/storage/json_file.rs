//! File-backed storage: one pretty-printed JSON file per collection
//!
//! Writes go to a hidden temp file in the same directory and are renamed over
//! the target, so a crash mid-write leaves the previous version intact.

use crate::storage::Storage;
use crate::types::StorageError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage adapter rooted at a data directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Open (and create if needed) a data directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::io(&dir.display().to_string(), format!("cannot create data directory: {}", e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key))
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e.to_string())),
        }
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), StorageError> {
        let temp = self.temp_path_for(key);
        let target = self.path_for(key);

        fs::write(&temp, contents).map_err(|e| StorageError::io(key, e.to_string()))?;
        fs::rename(&temp, &target).map_err(|e| {
            let _ = fs::remove_file(&temp);
            StorageError::io(key, e.to_string())
        })?;

        debug!(key, path = %target.display(), bytes = contents.len(), "collection written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("nested").join("data");

        let storage = JsonFileStorage::open(&dir).unwrap();
        assert!(storage.dir().is_dir());
    }

    #[test]
    fn test_read_missing_key_returns_none() {
        let root = TempDir::new().unwrap();
        let storage = JsonFileStorage::open(root.path()).unwrap();

        assert_eq!(storage.read("products").unwrap(), None);
    }

    #[test]
    fn test_write_replaces_contents_and_leaves_no_temp_file() {
        let root = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::open(root.path()).unwrap();

        storage.write("products", "[1]").unwrap();
        storage.write("products", "[1,2]").unwrap();

        assert_eq!(storage.read("products").unwrap().as_deref(), Some("[1,2]"));
        assert!(storage.path_for("products").exists());
        assert!(!storage.temp_path_for("products").exists());
    }
}
