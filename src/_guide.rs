//! # A more in-depth guide to `ratepace`
//!
//! # Constructing a rate limiter
//!
//! A limiter needs a [`Bandwidth`][crate::Bandwidth]: a rate and the
//! largest chunk it should hand to the transport at once. Rates are
//! given in kilobits (1000 bits) or bits per second:
//!
//! ```rust
//! # use nonzero_ext::*;
//! use ratepace::{Bandwidth, RateLimiter};
//! let lim = RateLimiter::new(Bandwidth::kbps(64).allow_chunk(nonzero!(1400usize)));
//! assert_eq!(lim.rate_bps(), 64_000);
//! ```
//!
//! Bandwidths can also be parsed, which is handy for command-line flags
//! and config files. A bare number is in kbit/s; `@` sets the chunk size:
//!
//! ```rust
//! # use ratepace::Bandwidth;
//! let b: Bandwidth = "2mbit@1400".parse().unwrap();
//! assert_eq!(b.bits_per_second(), 2_000_000);
//! assert_eq!(b.max_chunk().get(), 1400);
//! ```
//!
//! A rate of zero means "unlimited". Unlimited limiters pass every call
//! straight to the underlying reader or writer; the rate can be changed
//! later with [`set_rate_kbps`][crate::RateLimiter::set_rate_kbps] or
//! [`set_bandwidth`][crate::RateLimiter::set_bandwidth], even while the
//! limiter is in use.
//!
//! # Clocks
//!
//! By default, limiters measure time with a
//! [`MonotonicClock`][crate::clock::MonotonicClock] and sleep with
//! [`std::thread::sleep`]. For tests, the
//! [`FakeRelativeClock`][crate::clock::FakeRelativeClock] makes pacing
//! deterministic: sleeping on it just advances it, so a paced transfer
//! finishes immediately, but the clock reads exactly as if it had waited.
//!
//! ```rust
//! # use nonzero_ext::*;
//! # use ratepace::{clock::{Clock, FakeRelativeClock}, Bandwidth, RateLimiter, Timestamp};
//! let clock = FakeRelativeClock::default();
//! let lim = RateLimiter::with_clock(Bandwidth::kbps(8).allow_chunk(nonzero!(500usize)), &clock);
//! let mut sink = Vec::new();
//! lim.send(&mut sink, &[0u8; 1000]).unwrap();
//! // 1000 bytes at 1000 bytes per second:
//! assert_eq!(clock.now(), Timestamp::new(1, 0));
//! ```
//!
//! # Send, receive and files
//!
//! * [`send`][crate::RateLimiter::send] waits *before* each chunk, then
//!   writes it in full. It returns once the whole buffer is written.
//! * [`receive`][crate::RateLimiter::receive] reads one chunk, then waits
//!   for what the received bytes are worth before returning. The data is
//!   there early; it is the *next* receive that gets held back.
//! * [`send_file`][crate::RateLimiter::send_file] pumps a reader into a
//!   writer through `send`, 1024 bytes at a time.
//!
//! With the `async` feature, all three have `_async` counterparts over the
//! `futures` I/O traits.
//!
//! # Usage in multiple threads
//!
//! Sharing references to a rate limiter across threads is completely
//! OK (rate limiters are Send and Sync), and it is how you limit the
//! combined rate of several connections. Use `crossbeam` scoped threads
//! or wrap the limiter in an [`Arc`][std::sync::Arc]:
//!
//! ```rust
//! # use std::sync::Arc;
//! # use std::thread;
//! # use ratepace::{Bandwidth, RateLimiter};
//! let lim = Arc::new(RateLimiter::new(Bandwidth::kbps(8_000)));
//! let workers: Vec<_> = (0..4)
//!     .map(|_| {
//!         let lim = Arc::clone(&lim);
//!         thread::spawn(move || {
//!             let mut sink = Vec::new();
//!             lim.send(&mut sink, &[1u8; 500]).unwrap()
//!         })
//!     })
//!     .collect();
//! for worker in workers {
//!     assert_eq!(worker.join().unwrap(), 500);
//! }
//! ```
//!
//! The limiter's lock only covers its bookkeeping; sleeps and I/O run
//! unlocked, so concurrent transfers overlap in time while their virtual
//! start times still line up in one queue.
