//! Key-value persistence for small integer settings
//!
//! Stores:
//! - `MemoryStore`: in-process map (tests, hosts without storage)
//! - `JsonFileStore`: JSON object on disk (native only)
//! - `platform::web::LocalStorageStore`: browser LocalStorage (wasm32 only)

use std::collections::HashMap;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{JsonFileStore, StoreError};

/// Synchronous integer key-value storage.
///
/// Writes are fire-and-forget: implementations log failures instead of
/// returning them.
pub trait KeyValueStore {
    fn get_integer(&self, key: &str) -> Option<i64>;
    fn set_integer(&mut self, key: &str, value: i64);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_integer(&self, key: &str) -> Option<i64> {
        (**self).get_integer(key)
    }

    fn set_integer(&mut self, key: &str, value: i64) {
        (**self).set_integer(key, value)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value
    pub fn with(key: &str, value: i64) -> Self {
        let mut store = Self::new();
        store.set_integer(key, value);
        store
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_integer(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set_integer(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }
}
