//! The rate limiter and its configuration.

mod blocking;
pub use blocking::*;

#[cfg(feature = "async")]
mod with_async;

use crate::bandwidth::{ideal_duration, Bandwidth, DEFAULT_MAX_CHUNK};
use crate::clock::{self, Clock};
use crate::middleware::{NoOpMiddleware, PacingMiddleware};
use crate::schedule::{Direction, PacingSchedule, ScheduleSnapshot};
use crate::timestamp::TimeDelta;
use parking_lot::Mutex;
use portable_atomic::{AtomicU64, AtomicUsize, Ordering};
use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::time::Duration;

/// A bandwidth limiter that paces the bytes moved through it.
///
/// One limiter can be shared (by reference or in an [`Arc`][std::sync::Arc])
/// between any number of threads and connections; all of them then draw on
/// the same rate budget. Sending and receiving are paced independently.
///
/// Pacing guarantees the configured rate on average only: every chunk
/// (at most [`max_chunk`][RateLimiter::max_chunk] bytes) goes out in one
/// burst, followed or preceded by the wait that chunk is worth.
///
/// The time that transfers spend blocked in the transport is measured and
/// credited against later waits, so that slow transports do not drag the
/// long-run rate below the target.
#[derive(Debug)]
pub struct RateLimiter<C = clock::DefaultClock, MW = NoOpMiddleware>
where
    C: Clock,
    MW: PacingMiddleware,
{
    bits_per_second: AtomicU64,
    max_chunk: AtomicUsize,
    send: Mutex<PacingSchedule>,
    receive: Mutex<PacingSchedule>,
    clock: C,
    middleware: PhantomData<MW>,
}

/// # Constructors using the default clock
impl RateLimiter {
    /// Constructs a rate limiter for the given bandwidth, measuring time
    /// with a [`MonotonicClock`][clock::MonotonicClock].
    pub fn new(bandwidth: Bandwidth) -> Self {
        let clock = clock::DefaultClock::default();
        Self::with_clock(bandwidth, &clock)
    }

    /// Constructs a rate limiter that does not pace at all until a rate is set.
    pub fn unlimited() -> Self {
        Self::new(Bandwidth::unlimited())
    }
}

impl<C> RateLimiter<C, NoOpMiddleware>
where
    C: Clock,
{
    /// Constructs a rate limiter for the given bandwidth with a custom clock.
    ///
    /// Both schedules start out eligible at the clock's current time, with
    /// no credit.
    pub fn with_clock(bandwidth: Bandwidth, clock: &C) -> Self {
        let now = clock.now();
        RateLimiter {
            bits_per_second: AtomicU64::new(bandwidth.bits_per_second()),
            max_chunk: AtomicUsize::new(bandwidth.max_chunk().get()),
            send: Mutex::new(PacingSchedule::new(now)),
            receive: Mutex::new(PacingSchedule::new(now)),
            clock: clock.clone(),
            middleware: PhantomData,
        }
    }
}

impl<C, MW> RateLimiter<C, MW>
where
    C: Clock,
    MW: PacingMiddleware,
{
    /// Convert the given rate limiter into one that uses a different middleware.
    pub fn with_middleware<Outer: PacingMiddleware>(self) -> RateLimiter<C, Outer> {
        RateLimiter {
            bits_per_second: self.bits_per_second,
            max_chunk: self.max_chunk,
            send: self.send,
            receive: self.receive,
            clock: self.clock,
            middleware: PhantomData,
        }
    }

    /// The current target rate in bits per second; zero means unlimited.
    pub fn rate_bps(&self) -> u64 {
        self.bits_per_second.load(Ordering::Relaxed)
    }

    /// The largest number of bytes handed to the transport at once.
    pub fn max_chunk(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_chunk.load(Ordering::Relaxed)).unwrap_or(DEFAULT_MAX_CHUNK)
    }

    /// The current configuration.
    pub fn bandwidth(&self) -> Bandwidth {
        Bandwidth::bps(self.rate_bps()).allow_chunk(self.max_chunk())
    }

    /// Changes the target rate to `kbits` kilobits per second, keeping the
    /// chunk size. Zero disables pacing.
    pub fn set_rate_kbps(&self, kbits: u64) {
        self.bits_per_second
            .store(Bandwidth::kbps(kbits).bits_per_second(), Ordering::Relaxed);
    }

    /// Changes both the target rate and the chunk size.
    ///
    /// Operations already in progress keep the configuration they started
    /// with; pacing state carries over.
    pub fn set_bandwidth(&self, bandwidth: Bandwidth) {
        self.max_chunk
            .store(bandwidth.max_chunk().get(), Ordering::Relaxed);
        self.bits_per_second
            .store(bandwidth.bits_per_second(), Ordering::Relaxed);
    }

    /// Returns a copy of the pacing state for one direction.
    pub fn snapshot(&self, direction: Direction) -> ScheduleSnapshot {
        self.schedule(direction).lock().snapshot()
    }

    /// The clock this limiter measures and sleeps with.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn schedule(&self, direction: Direction) -> &Mutex<PacingSchedule> {
        match direction {
            Direction::Send => &self.send,
            Direction::Receive => &self.receive,
        }
    }

    /// Reserves a slot for a chunk of `bytes` about to be transferred and
    /// returns how long to sleep before starting it.
    pub(crate) fn reserve(&self, direction: Direction, bytes: usize, rate: u64) -> Duration {
        let ideal = ideal_duration(bytes, rate);
        let (delay, state) = {
            let mut schedule = self.schedule(direction).lock();
            // Time spent waiting for the lock is not backlog.
            let now = self.clock.now();
            let delay = schedule.reserve(now, ideal);
            (delay, schedule.snapshot())
        };
        MW::reserved(direction, bytes, state, delay);
        delay
    }

    /// Credits the time a finished transfer spent in the transport.
    pub(crate) fn book(&self, direction: Direction, bytes: usize, elapsed: TimeDelta) {
        self.schedule(direction).lock().book(elapsed);
        MW::transferred(direction, bytes, elapsed);
    }

    /// Accounts for a completed receive of `bytes` that took `elapsed` and
    /// returns how long to sleep before handing the data to the caller.
    ///
    /// Unlike sends, the receive's own duration is credited before the wait
    /// is computed, in the same critical section.
    pub(crate) fn settle_receive(&self, bytes: usize, rate: u64, elapsed: TimeDelta) -> Duration {
        let ideal = ideal_duration(bytes, rate);
        let (delay, state) = {
            let mut schedule = self.receive.lock();
            let now = self.clock.now();
            schedule.book(elapsed);
            let delay = schedule.reserve(now, ideal);
            (delay, schedule.snapshot())
        };
        MW::transferred(Direction::Receive, bytes, elapsed);
        MW::reserved(Direction::Receive, bytes, state, delay);
        delay
    }
}
