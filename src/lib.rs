//! # ratepace - paced byte transfers
//!
//! This crate throttles the bytes an application moves through sockets,
//! pipes and files to a configured bit rate, without any help from the
//! remote peer or the transport. It works by scheduling: every chunk of a
//! transfer is given a virtual start time on a per-direction schedule, and
//! the caller sleeps until that time comes.
//!
//! The time transfers spend blocked inside the transport is measured and
//! credited against later waits, so the long-run rate converges to the
//! target even when I/O latency is unpredictable.
//!
//! # Quick example
//!
//! ```rust
//! # use nonzero_ext::nonzero;
//! use ratepace::{Bandwidth, RateLimiter};
//!
//! // 800 kbit/s (100 kB/s), sent 1000 bytes at a time:
//! let lim = RateLimiter::new(Bandwidth::kbps(800).allow_chunk(nonzero!(1000usize)));
//! let mut sink = Vec::new();
//! assert_eq!(lim.send(&mut sink, &[7u8; 3000]).unwrap(), 3000);
//! ```
//!
//! A [`RateLimiter`] may be shared between threads (it is `Sync`); all
//! connections using it then share one budget. See the [guide][crate::_guide]
//! for details.
//!
//! # What it isn't
//!
//! The pacing is bursty: each chunk goes out at transport speed. Only the
//! average rate is guaranteed, and chunk sizes bound the bursts. There is
//! no fairness between callers or between limiters. Accuracy degrades at
//! rates above roughly 1 Mbit/s, where sleep granularity and syscall
//! overhead become comparable to the time a chunk is worth.

pub mod _guide;
mod bandwidth;
pub mod clock;
mod errors;
mod limiter;
pub mod middleware;
mod schedule;
#[cfg(unix)]
mod socket;
mod timestamp;

pub use bandwidth::{Bandwidth, DEFAULT_MAX_CHUNK};
pub use errors::*;
pub use limiter::{RateLimiter, FILE_BLOCK_SIZE};
pub use schedule::{Direction, ScheduleSnapshot};
#[cfg(unix)]
pub use socket::FlaggedSocket;
pub use timestamp::{TimeDelta, Timestamp};
