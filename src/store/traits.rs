//! Blob store trait definition

use crate::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// An asynchronous, durable key → string mapping
///
/// The only guarantee the time-series layer relies on is "last write wins per
/// key". Implementations can be:
/// - In-memory maps (tests, ephemeral use)
/// - A single JSON file on disk
/// - A platform key/value plugin behind an adapter
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Raw value under `key`, or `None` if never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Delete `key`; a no-op if absent
    async fn remove(&self, key: &str) -> Result<()>;

    /// All keys holding a value
    async fn keys(&self) -> Result<BTreeSet<String>>;

    /// Delete every key
    async fn clear(&self) -> Result<()>;
}

#[async_trait]
impl<S: BlobStore + ?Sized> BlobStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }

    async fn keys(&self) -> Result<BTreeSet<String>> {
        (**self).keys().await
    }

    async fn clear(&self) -> Result<()> {
        (**self).clear().await
    }
}
