//! Time sources for rate limiters.
//!
//! A pacing limiter needs two things from its environment: the current
//! time and a way to wait. Both come from the [`Clock`] trait, which
//! allows the limiter to run against the wall clock, a monotonic clock,
//! or a [`FakeRelativeClock`] that tests can advance by hand.

use crate::timestamp::Timestamp;
use portable_atomic::{AtomicU64, Ordering};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// A time source used by rate limiters.
pub trait Clock: Clone + Debug {
    /// Returns a measurement of the clock.
    fn now(&self) -> Timestamp;

    /// Blocks the calling thread for (at least) the given duration, as
    /// this clock measures it.
    fn sleep(&self, duration: Duration);
}

/// A clock that advances on its own, in step with real time.
///
/// The purpose of this trait is to restrict availability of the `async`
/// functions, as they wait real amounts of time - if a measurement is
/// "off" or fake, the async function would still cause the program to
/// wait, but the limiter's bookkeeping would not see that time pass.
pub trait ReasonablyRealtime: Clock {}

/// A mock implementation of a clock. All it does is keep track of
/// what "now" is (relative to some point meaningful to the program),
/// and returns that.
///
/// Sleeping on a fake clock does not block; it advances the clock by the
/// requested amount instead, so paced operations finish instantly while
/// their timestamps still reflect the schedule.
///
/// # Thread safety
/// The mock time is represented as an atomic u64 count of nanoseconds, behind an [`Arc`].
/// Clones of this clock will all show the same time, even if the original advances.
#[derive(Debug, Clone, Default)]
pub struct FakeRelativeClock {
    now: Arc<AtomicU64>,
}

impl FakeRelativeClock {
    /// Advances the fake clock by the given amount.
    pub fn advance(&self, by: Duration) {
        let by: u64 = by
            .as_nanos()
            .try_into()
            .expect("Can not represent times past ~584 years");

        let mut prev = self.now.load(Ordering::Acquire);
        let mut next = prev + by;
        while let Err(next_prev) =
            self.now
                .compare_exchange_weak(prev, next, Ordering::Release, Ordering::Relaxed)
        {
            prev = next_prev;
            next = prev + by;
        }
    }
}

impl PartialEq for FakeRelativeClock {
    fn eq(&self, other: &Self) -> bool {
        self.now.load(Ordering::Relaxed) == other.now.load(Ordering::Relaxed)
    }
}

impl Clock for FakeRelativeClock {
    fn now(&self) -> Timestamp {
        Duration::from_nanos(self.now.load(Ordering::Relaxed)).into()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

mod with_std;
pub use with_std::*;

#[cfg(feature = "quanta")]
mod quanta;
#[cfg(feature = "quanta")]
pub use self::quanta::*;

/// The default clock for rate limiters.
pub type DefaultClock = MonotonicClock;
