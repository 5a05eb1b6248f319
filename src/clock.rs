//! Time source for insertion timestamps

use parking_lot::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Current instant in unix millis
    fn now_millis(&self) -> i64;
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            Err(before) => -(before.duration().as_millis() as i64),
        }
    }
}

/// A manually driven clock for tests
#[derive(Debug)]
pub struct MockClock {
    now: RwLock<i64>,
}

impl MockClock {
    pub fn at_millis(millis: i64) -> Self {
        MockClock {
            now: RwLock::new(millis),
        }
    }

    pub fn advance(&self, duration: Duration) {
        *self.now.write() += duration.as_millis() as i64;
    }

    pub fn set_millis(&self, millis: i64) {
        *self.now.write() = millis;
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> i64 {
        *self.now.read()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}
