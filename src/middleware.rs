//! Additional, customizable behavior for rate limiters.
//!
//! Pacing should be cheap, and unless users desire more behavior, they
//! should not pay any extra price. If you do want to know what the
//! limiter does (for logging, metrics, or tests), attach a
//! [`PacingMiddleware`]. Its hooks run at two points of every paced
//! chunk:
//!
//! * [`reserved`][PacingMiddleware::reserved], right after a chunk has
//!   been given a slot on its direction's schedule, with the delay the
//!   caller is about to sleep for.
//! * [`transferred`][PacingMiddleware::transferred], after the transport
//!   has moved the chunk, with the time that took.
//!
//! Middleware can not change pacing decisions. Hooks are never called
//! while the schedule lock is held.
//!
//! ## Using a custom middleware
//!
//! Middlewares are attached to the
//! [`RateLimiter`][crate::RateLimiter] at construction time using
//! [`RateLimiter::with_middleware`][crate::RateLimiter::with_middleware]:
//!
//! ```rust
//! use ratepace::{Bandwidth, Direction, RateLimiter, ScheduleSnapshot};
//! use ratepace::middleware::PacingMiddleware;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//!
//! static CHUNKS: AtomicUsize = AtomicUsize::new(0);
//!
//! #[derive(Debug)]
//! struct CountChunks;
//!
//! impl PacingMiddleware for CountChunks {
//!     fn reserved(_: Direction, _: usize, _: ScheduleSnapshot, _: Duration) {
//!         CHUNKS.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! let lim = RateLimiter::new(Bandwidth::bps(80_000_000)).with_middleware::<CountChunks>();
//! let mut sink = Vec::new();
//! lim.send(&mut sink, &[0u8; 25_000]).unwrap();
//! assert_eq!(CHUNKS.load(Ordering::Relaxed), 3);
//! ```
use crate::schedule::{Direction, ScheduleSnapshot};
use crate::timestamp::TimeDelta;
use std::fmt;
use std::time::Duration;

/// Hooks that observe a rate limiter's pacing decisions.
///
/// All hooks have empty default implementations, so middleware only has
/// to implement the ones it cares about.
pub trait PacingMiddleware: fmt::Debug {
    /// Called when a chunk of `bytes` has been given its slot.
    ///
    /// `state` is the schedule right after the reservation and `delay` is
    /// how long the caller sleeps before (on send) or after (on receive)
    /// the transfer.
    fn reserved(direction: Direction, bytes: usize, state: ScheduleSnapshot, delay: Duration) {
        let _ = (direction, bytes, state, delay);
    }

    /// Called when the transport has moved `bytes` in `elapsed`.
    fn transferred(direction: Direction, bytes: usize, elapsed: TimeDelta) {
        let _ = (direction, bytes, elapsed);
    }
}

#[derive(PartialEq, Eq, Debug)]
/// A middleware that does nothing.
pub struct NoOpMiddleware {}

impl PacingMiddleware for NoOpMiddleware {}
