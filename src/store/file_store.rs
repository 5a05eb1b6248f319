//! Single-file blob store
//!
//! File format: one JSON object mapping every key to its raw value.
//! ```text
//! {
//!   "profile/age": "[{\"timestampMs\":...}]",
//!   "weather/temp": "[...]"
//! }
//! ```
//!
//! The whole map is kept in memory and rewritten on every mutation: the new
//! contents go to `<file>.tmp` first and are then renamed over the original,
//! so a crash leaves either the old or the new map on disk.

use super::BlobStore;
use crate::{Error, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// A durable blob store backed by a single JSON file
pub struct FileStore {
    /// Path to the store file
    path: PathBuf,
    /// In-memory copy of the file
    blobs: RwLock<BTreeMap<String, String>>,
    /// Serializes persists so the file follows mutation order
    persist_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store file, starting empty if it does not exist yet
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let blobs = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                Error::InvalidFile(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = blobs.len(), "opened file store");

        Ok(FileStore {
            path,
            blobs: RwLock::new(blobs),
            persist_lock: Mutex::new(()),
        })
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `mutate` to a copy of the map, write it to disk, then publish it.
    ///
    /// The in-memory map only changes once the file holds the new contents.
    async fn mutate(&self, mutate: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.persist_lock.lock().await;

        let mut next = self.blobs.read().clone();
        mutate(&mut next);
        let content = serde_json::to_string_pretty(&next)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, content.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        *self.blobs.write() = next;

        debug!(path = %self.path.display(), bytes = content.len(), "persisted file store");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[async_trait]
impl BlobStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.mutate(move |blobs| {
            blobs.insert(key, value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if !self.blobs.read().contains_key(key) {
            return Ok(());
        }
        self.mutate(|blobs| {
            blobs.remove(key);
        })
        .await
    }

    async fn keys(&self) -> Result<BTreeSet<String>> {
        Ok(self.blobs.read().keys().cloned().collect())
    }

    async fn clear(&self) -> Result<()> {
        self.mutate(|blobs| blobs.clear()).await
    }
}
