use super::{Clock, ReasonablyRealtime};

use crate::timestamp::Timestamp;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// The monotonic clock implemented by [`Instant`].
///
/// Timestamps count from the moment the clock was constructed; clones
/// share that origin.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().into()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

impl ReasonablyRealtime for MonotonicClock {}

/// The non-monotonic clock implemented by [`SystemTime`].
///
/// Timestamps count from the unix epoch. If the system clock is set to
/// before the epoch, `now` reports the epoch itself.
#[derive(Clone, Debug, Default)]
pub struct SystemClock();

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .into()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

impl ReasonablyRealtime for SystemClock {}
