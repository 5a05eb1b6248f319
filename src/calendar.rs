//! Calendar-day arithmetic in an explicit time zone
//!
//! Every "same day" decision in the store goes through a [`Calendar`], so the
//! result depends on the zone the caller chose and never on the host locale.

use crate::{Error, Result};
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Maps epoch-millisecond instants onto calendar days of one time zone
#[derive(Clone, Debug)]
pub struct Calendar<Z: TimeZone> {
    zone: Z,
}

impl Calendar<Utc> {
    pub fn utc() -> Self {
        Calendar { zone: Utc }
    }
}

impl<Z: TimeZone> Calendar<Z> {
    pub fn new(zone: Z) -> Self {
        Calendar { zone }
    }

    pub fn zone(&self) -> &Z {
        &self.zone
    }

    /// The instant `millis` seen as a wall-clock time in this zone
    pub fn at(&self, millis: i64) -> Result<DateTime<Z>> {
        self.zone
            .timestamp_millis_opt(millis)
            .single()
            .ok_or(Error::InvalidTimestamp(millis))
    }

    /// The calendar day containing `millis`
    pub fn day_of(&self, millis: i64) -> Result<NaiveDate> {
        Ok(self.at(millis)?.date_naive())
    }

    /// Whether two instants fall on the same calendar day
    pub fn same_day(&self, a: i64, b: i64) -> Result<bool> {
        Ok(self.day_of(a)? == self.day_of(b)?)
    }

    /// The same wall-clock time one calendar day later.
    ///
    /// When that time is skipped by a DST jump, falls back to 24 hours later.
    pub fn next_day(&self, at: &DateTime<Z>) -> Result<DateTime<Z>> {
        let overflow = || Error::InvalidTimestamp(at.timestamp_millis());

        let wall = at
            .naive_local()
            .checked_add_days(Days::new(1))
            .ok_or_else(overflow)?;

        match self.zone.from_local_datetime(&wall).earliest() {
            Some(next) => Ok(next),
            None => at
                .clone()
                .checked_add_signed(Duration::days(1))
                .ok_or_else(overflow),
        }
    }

    /// Range membership used by date-range queries.
    ///
    /// The boundary days are inclusive regardless of time of day; anything
    /// else must lie strictly between `begin` and `end` as an instant.
    pub fn in_range(&self, millis: i64, begin: i64, end: i64) -> Result<bool> {
        let day = self.day_of(millis)?;
        Ok(day == self.day_of(begin)?
            || day == self.day_of(end)?
            || (millis > begin && millis < end))
    }

    /// Parse a caller-supplied date in this zone.
    ///
    /// Accepts RFC 3339 instants, `YYYY-MM-DDTHH:MM[:SS]` wall-clock times and
    /// bare `YYYY-MM-DD` dates (taken as local midnight).
    pub fn parse(&self, input: &str) -> Result<DateTime<Z>> {
        let input = input.trim();

        if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
            return Ok(instant.with_timezone(&self.zone));
        }

        let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(input, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| Error::InvalidDate(input.to_string()))?;

        // A wall-clock time skipped by a DST jump has no mapping
        self.zone
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| Error::InvalidDate(format!("{} does not exist in zone", input)))
    }
}

impl Default for Calendar<Utc> {
    fn default() -> Self {
        Self::utc()
    }
}
