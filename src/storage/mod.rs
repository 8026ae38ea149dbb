//! Persistence adapter
//!
//! The engine persists three independent collections (`products`, `movements`,
//! `settings`) through the [`Storage`] trait. Adapters only move raw JSON text;
//! encoding and the load-or-default policy live in [`load_or_default`] and
//! [`save`].
//!
//! # Adapters
//!
//! - [`JsonFileStorage`] - one `<key>.json` file per collection in a data directory
//! - [`MemoryStorage`] - in-memory map with per-key save counters

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::types::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key of the products collection
pub const PRODUCTS_KEY: &str = "products";

/// Key of the movements collection (newest first)
pub const MOVEMENTS_KEY: &str = "movements";

/// Key of the settings collection
pub const SETTINGS_KEY: &str = "settings";

/// Durable get/set of named collections
///
/// No business logic lives here.
pub trait Storage {
    /// Read the raw contents stored under `key`, or `None` when absent
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the raw contents stored under `key`
    fn write(&mut self, key: &str, contents: &str) -> Result<(), StorageError>;
}

/// Load a collection, falling back to `default` when it was never saved
///
/// # Errors
///
/// Returns an error if the medium cannot be read or the stored JSON does not
/// decode into `T`. A malformed collection is never silently replaced.
pub fn load_or_default<T, S>(storage: &S, key: &str, default: T) -> Result<T, StorageError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    match storage.read(key)? {
        Some(contents) => {
            serde_json::from_str(&contents).map_err(|e| StorageError::corrupt(key, e.to_string()))
        }
        None => Ok(default),
    }
}

/// Encode and store a collection
pub fn save<T, S>(storage: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let contents =
        serde_json::to_string_pretty(value).map_err(|e| StorageError::encode(key, e.to_string()))?;
    storage.write(key, &contents)
}
