//! # daybook_db
//!
//! An append-only, day-aware time-series store layered on an asynchronous
//! key/value blob store.
//!
//! Each key holds a log of timestamped entries. Entries are only ever
//! appended; a log disappears only when its key is removed or the store is
//! cleared. Queries select entries by the calendar day they are about, in a
//! time zone the caller chooses.
//!
//! ## Core Concepts
//!
//! - **Entries**: a payload plus `recorded_at` (when it was stored) and
//!   `effective_date` (what it is about)
//! - **Logs**: the ordered history of entries under one key
//! - **Blob stores**: the durable key → string mapping logs are written to
//! - **Calendars**: decide which day an instant belongs to
//!
//! ## Example
//!
//! ```ignore
//! use daybook_db::{MemoryStore, TimeSeriesStore};
//!
//! let store = TimeSeriesStore::new(MemoryStore::new());
//! store.insert("weather/temp", "10°C", &chrono::Utc::now()).await?;
//! let latest: Option<String> = store.latest("weather/temp").await?;
//! ```

pub mod calendar;
pub mod clock;
pub mod config;
pub mod model;
pub mod store;

mod error;
mod series;

pub use calendar::Calendar;
pub use clock::{Clock, MockClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{Entry, Log};
pub use series::TimeSeriesStore;
pub use store::{BlobStore, FileStore, MemoryStore};
