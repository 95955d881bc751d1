use jiff::{SignedDuration, Timestamp};

/// Length of one tick, the time unit of the elapsed-time field.
pub const TICK: SignedDuration = SignedDuration::from_millis(10);

const TICK_NANOS: i128 = 10_000_000;

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Block and wait until the clock reaches the target time.
    fn wait_until(&self, target: Timestamp);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn wait_until(&self, target: Timestamp) {
        // Re-check after every sleep; the OS may wake us early.
        loop {
            let now = Timestamp::now();
            if now >= target {
                return;
            }
            std::thread::sleep(target.duration_since(now).unsigned_abs());
        }
    }
}

/// Quantizes a timestamp into whole ticks since the Unix epoch.
///
/// Truncates toward zero, so instants less than one tick before the Unix
/// epoch land on tick 0.
pub fn to_ticks(timestamp: Timestamp) -> i64 {
    (timestamp.as_nanosecond() / TICK_NANOS) as i64
}

/// Returns the instant at which the given tick begins.
///
/// Saturates at [`Timestamp::MAX`] for ticks beyond the representable range.
pub fn tick_start(ticks: i64) -> Timestamp {
    Timestamp::from_nanosecond(i128::from(ticks) * TICK_NANOS).unwrap_or(Timestamp::MAX)
}

#[cfg(any(test, feature = "test-util"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-util"))]
mod manual {
    use super::Clock;
    use jiff::{SignedDuration, Timestamp};
    use std::sync::{Arc, Mutex, MutexGuard};

    /// A clock that only moves when told to.
    ///
    /// Clones share the same time, so a test can keep a handle while the
    /// worker owns another.
    #[derive(Clone)]
    pub struct ManualClock {
        inner: Arc<Mutex<ManualClockState>>,
    }

    struct ManualClockState {
        now: Timestamp,
        waits: Vec<Timestamp>,
    }

    impl ManualClock {
        pub fn new(now: Timestamp) -> Self {
            Self {
                inner: Arc::new(Mutex::new(ManualClockState {
                    now,
                    waits: Vec::new(),
                })),
            }
        }

        pub fn set(&self, now: Timestamp) {
            self.state().now = now;
        }

        pub fn advance(&self, by: SignedDuration) {
            let mut state = self.state();
            state.now = state
                .now
                .checked_add(by)
                .expect("manual clock advanced out of range");
        }

        /// Targets of every `wait_until` call so far, oldest first.
        pub fn waits(&self) -> Vec<Timestamp> {
            self.state().waits.clone()
        }

        fn state(&self) -> MutexGuard<'_, ManualClockState> {
            self.inner
                .lock()
                .expect("manual clock lock should not be poisoned")
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            self.state().now
        }

        fn wait_until(&self, target: Timestamp) {
            let mut state = self.state();
            state.waits.push(target);
            // jump instead of blocking
            if target > state.now {
                state.now = target;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_works() {
        let base = Timestamp::from_second(0).unwrap();
        let clock = ManualClock::new(base);
        assert_eq!(clock.now(), base);

        let target = Timestamp::from_second(1000).unwrap();
        clock.wait_until(target);
        assert_eq!(clock.now(), target);
        assert_eq!(clock.waits(), vec![target]);

        // waiting for the past never rewinds
        clock.wait_until(base);
        assert_eq!(clock.now(), target);

        clock.advance(SignedDuration::from_millis(15));
        assert_eq!(clock.now(), Timestamp::from_millisecond(1_000_015).unwrap());

        clock.set(base);
        assert_eq!(clock.now(), base);
    }

    #[test]
    fn ticks_are_ten_milliseconds() {
        let ts = Timestamp::from_millisecond(1_557_100_800_019).unwrap();
        assert_eq!(to_ticks(ts), 155_710_080_001);
        assert_eq!(
            tick_start(155_710_080_002),
            Timestamp::from_millisecond(1_557_100_800_020).unwrap()
        );
        assert_eq!(tick_start(1).duration_since(tick_start(0)), TICK);
    }

    #[test]
    fn ticks_truncate_toward_zero_before_unix_epoch() {
        assert_eq!(to_ticks(Timestamp::from_millisecond(-5).unwrap()), 0);
        assert_eq!(to_ticks(Timestamp::from_millisecond(-15).unwrap()), -1);
        assert_eq!(to_ticks(Timestamp::from_millisecond(-20).unwrap()), -2);
    }

    #[test]
    fn tick_start_saturates() {
        assert_eq!(tick_start(i64::MAX), Timestamp::MAX);
    }

    #[test]
    fn system_clock_waits_until_target() {
        let clock = SystemClock;
        let target = clock.now() + SignedDuration::from_millis(20);
        clock.wait_until(target);
        assert!(clock.now() >= target);
    }
}
