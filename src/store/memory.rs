//! In-memory blob store

use super::BlobStore;
use crate::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

/// A blob store that lives only as long as the process
///
/// Useful for testing without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.blobs.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.blobs.write().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<BTreeSet<String>> {
        Ok(self.blobs.read().keys().cloned().collect())
    }

    async fn clear(&self) -> Result<()> {
        self.blobs.write().clear();
        Ok(())
    }
}
