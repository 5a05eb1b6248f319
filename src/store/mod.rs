//! Blob stores
//!
//! The time-series layer persists through the [`BlobStore`] trait, a plain
//! asynchronous key → string mapping. Two implementations ship with the crate:
//! an in-memory map and a single JSON file on disk.

mod file_store;
mod memory;
mod traits;

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use traits::BlobStore;
