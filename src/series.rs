//! Time-series store
//!
//! Turns a [`BlobStore`] into a per-key, append-only log of timestamped
//! entries with calendar-day range queries.
//!
//! Every operation reads the key's full log from the blob store, works on it
//! in memory and, for writes, stores the full log back. The blob store is the
//! only source of truth; nothing is cached here.
//!
//! # Concurrency
//!
//! `insert` is an unguarded read-modify-write. Callers must ensure a single
//! writer per key: two concurrent inserts on the same key can both read the
//! same prior log, and the later write then discards the earlier entry.

use crate::calendar::Calendar;
use crate::clock::{Clock, SystemClock};
use crate::model::{Entry, Log};
use crate::store::BlobStore;
use crate::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Append-only time series keyed by string, layered on a blob store
///
/// `Z` is the time zone that decides which calendar day an instant belongs
/// to.
pub struct TimeSeriesStore<S, Z: TimeZone = Utc> {
    blobs: S,
    calendar: Calendar<Z>,
    clock: Arc<dyn Clock>,
}

impl<S: BlobStore> TimeSeriesStore<S, Utc> {
    /// Create a store whose calendar days are UTC days
    pub fn new(blobs: S) -> Self {
        Self::with_time_zone(blobs, Utc)
    }
}

impl<S: BlobStore, Z: TimeZone> TimeSeriesStore<S, Z> {
    /// Create a store whose calendar days follow `zone`
    pub fn with_time_zone(blobs: S, zone: Z) -> Self {
        TimeSeriesStore {
            blobs,
            calendar: Calendar::new(zone),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock that stamps `recorded_at`
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn blob_store(&self) -> &S {
        &self.blobs
    }

    pub fn calendar(&self) -> &Calendar<Z> {
        &self.calendar
    }

    // === Writes ===

    /// Append `value` under `key`, dated `effective_date`.
    ///
    /// Returns the `recorded_at` assigned to the new entry. Earlier entries
    /// are carried over untouched, whatever their payload type.
    pub async fn insert<V, T>(
        &self,
        key: &str,
        value: &V,
        effective_date: &DateTime<T>,
    ) -> Result<i64>
    where
        V: Serialize + ?Sized,
        T: TimeZone,
    {
        let effective_date = effective_date.timestamp_millis();
        self.append(key, serde_json::to_value(value)?, effective_date).await
    }

    /// Append `value` under `key`, dated now
    pub async fn insert_now<V>(&self, key: &str, value: &V) -> Result<i64>
    where
        V: Serialize + ?Sized,
    {
        let now = self.clock.now_millis();
        self.append(key, serde_json::to_value(value)?, now).await
    }

    async fn append(
        &self,
        key: &str,
        value: serde_json::Value,
        effective_date: i64,
    ) -> Result<i64> {
        let mut log: Log<serde_json::Value> = self.load(key).await?;

        // Keep recorded_at non-decreasing even if the wall clock steps back
        let now = self.clock.now_millis();
        let recorded_at = log.last().map_or(now, |last| now.max(last.recorded_at));

        log.push(Entry::new(recorded_at, effective_date, value));
        self.blobs.set(key, log.encode()?).await?;

        debug!(key = %key, recorded_at, entries = log.len(), "appended entry");
        Ok(recorded_at)
    }

    /// Delete the whole log under `key`; a no-op if absent
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.blobs.remove(key).await?;
        info!(key = %key, "removed log");
        Ok(())
    }

    /// Delete every log
    pub async fn clear(&self) -> Result<()> {
        self.blobs.clear().await?;
        info!("cleared all logs");
        Ok(())
    }

    // === Reads ===

    /// The full log under `key`, empty if it was never written
    pub async fn read_all<V: DeserializeOwned>(&self, key: &str) -> Result<Log<V>> {
        self.load(key).await
    }

    /// Entries dated within `[begin, end]`.
    ///
    /// The calendar days of `begin` and `end` are included whole; any other
    /// entry must lie strictly between the two instants. Log order is kept.
    pub async fn read_range<V, T>(
        &self,
        key: &str,
        begin: &DateTime<T>,
        end: &DateTime<T>,
    ) -> Result<Log<V>>
    where
        V: DeserializeOwned,
        T: TimeZone,
    {
        let (begin, end) = (begin.timestamp_millis(), end.timestamp_millis());
        let mut log: Log<V> = self.load(key).await?;

        let mut failure = None;
        log.retain(|entry| match self.calendar.in_range(entry.effective_date, begin, end) {
            Ok(keep) => keep,
            Err(e) => {
                failure.get_or_insert(e);
                false
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }

        trace!(key = %key, begin, end, entries = log.len(), "read range");
        Ok(log)
    }

    /// One entry per visited calendar day: the last one inserted among those
    /// dated that day.
    ///
    /// The walk starts at `begin` and steps one calendar day at a time
    /// (keeping `begin`'s wall-clock time) while the step is no later than
    /// `end` plus one day. Only entries returned by [`Self::read_range`] are
    /// candidates, so the trailing day past `end` never contributes. Days
    /// without entries are skipped; the result is ordered by visit.
    pub async fn daily_snapshot<V, T>(
        &self,
        key: &str,
        begin: &DateTime<T>,
        end: &DateTime<T>,
    ) -> Result<Vec<Entry<V>>>
    where
        V: DeserializeOwned,
        T: TimeZone,
    {
        let range: Log<V> = self.read_range(key, begin, end).await?;

        // Later entries overwrite earlier ones for the same day
        let mut by_day = BTreeMap::new();
        for entry in range {
            by_day.insert(self.calendar.day_of(entry.effective_date)?, entry);
        }

        let limit = self
            .calendar
            .next_day(&self.calendar.at(end.timestamp_millis())?)?;
        let mut cursor = self.calendar.at(begin.timestamp_millis())?;

        let mut snapshot = Vec::new();
        while cursor <= limit {
            if let Some(entry) = by_day.remove(&cursor.date_naive()) {
                snapshot.push(entry);
            }
            cursor = self.calendar.next_day(&cursor)?;
        }

        trace!(key = %key, days = snapshot.len(), "daily snapshot");
        Ok(snapshot)
    }

    /// Payload of the most recently inserted entry, whatever its date
    pub async fn latest<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        let log: Log<V> = self.load(key).await?;
        Ok(log.into_entries().pop().map(|entry| entry.value))
    }

    /// Payload of the most recently inserted entry dated on `date`'s day
    pub async fn latest_on_date<V, T>(&self, key: &str, date: &DateTime<T>) -> Result<Option<V>>
    where
        V: DeserializeOwned,
        T: TimeZone,
    {
        let day = self.calendar.day_of(date.timestamp_millis())?;
        let log: Log<V> = self.load(key).await?;

        for entry in log.into_entries().into_iter().rev() {
            if self.calendar.day_of(entry.effective_date)? == day {
                return Ok(Some(entry.value));
            }
        }
        Ok(None)
    }

    /// All keys currently holding a log
    pub async fn list_keys(&self) -> Result<BTreeSet<String>> {
        self.blobs.keys().await
    }

    async fn load<V: DeserializeOwned>(&self, key: &str) -> Result<Log<V>> {
        let raw = self.blobs.get(key).await?;
        let log = Log::decode(raw.as_deref()).map_err(|source| {
            warn!(key = %key, error = %source, "stored log failed to decode");
            Error::Decode {
                key: key.to_string(),
                source,
            }
        })?;

        trace!(key = %key, entries = log.len(), "loaded log");
        Ok(log)
    }
}
