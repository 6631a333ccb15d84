use chrono::{Duration, Utc};
use parking_lot::Mutex;

use crate::domain::block::Timestamp;
use crate::ports::outbound::TimeSource;

/// Default time source using the system clock (UTC).
#[derive(Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Deterministic clock for tests: returns `start`, then advances by `step`
/// on every call.
#[derive(Debug)]
pub struct ManualTimeSource {
    next: Mutex<Timestamp>,
    step: Duration,
}

impl ManualTimeSource {
    pub fn new(start: Timestamp, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// A clock that never advances.
    pub fn frozen(at: Timestamp) -> Self {
        Self::new(at, Duration::zero())
    }

    /// Move the clock to `at` without consuming a tick.
    pub fn set(&self, at: Timestamp) {
        *self.next.lock() = at;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        let mut next = self.next.lock();
        let now = *next;
        *next = now + self.step;
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::t0;

    #[test]
    fn test_manual_time_source_steps() {
        let clock = ManualTimeSource::new(t0(), Duration::milliseconds(10));
        assert_eq!(clock.now(), t0());
        assert_eq!(clock.now(), t0() + Duration::milliseconds(10));

        clock.set(t0());
        assert_eq!(clock.now(), t0());
    }

    #[test]
    fn test_frozen_clock() {
        let clock = ManualTimeSource::frozen(t0());
        assert_eq!(clock.now(), clock.now());
    }
}
