//! Per-session collection storage.
//!
//! Mirrors browser tab storage: each key maps to a JSON text blob, nothing
//! outlives the process, and an unreadable blob loads as an empty
//! collection.

use std::collections::HashMap;
use std::sync::Mutex;

use quizgate_core::error::Result;
use quizgate_core::traits::CollectionStore;

/// In-memory `CollectionStore` keyed by collection name.
#[derive(Default)]
pub struct MemoryCollectionStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key`, bypassing serialization.
    pub fn set_raw(&self, key: &str, text: impl Into<String>) {
        self.blobs.lock().unwrap().insert(key.to_string(), text.into());
    }

    /// Raw text under `key`.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.blobs.lock().unwrap().get(key).cloned()
    }

    /// Sorted list of keys currently held.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.blobs.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Drop every collection.
    pub fn clear(&self) {
        self.blobs.lock().unwrap().clear();
    }
}

impl CollectionStore for MemoryCollectionStore {
    fn load_collection(&self, key: &str) -> Result<Vec<serde_json::Value>> {
        let Some(text) = self.get_raw(key) else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&text) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!("collection '{key}' is unreadable, treating as empty: {e}");
                Ok(Vec::new())
            }
        }
    }

    fn save_collection(&self, key: &str, items: &[serde_json::Value]) -> Result<()> {
        let text = serde_json::to_string(items)?;
        self.set_raw(key, text);
        Ok(())
    }
}
