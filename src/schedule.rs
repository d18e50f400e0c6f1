//! Per-direction pacing state.
//!
//! Each direction of a [`RateLimiter`][crate::RateLimiter] keeps a
//! [`PacingSchedule`]: the earliest instant at which the next chunk may
//! start, and a credit of seconds that earlier transfers already spent
//! blocking in the transport. Reservations against a schedule are made
//! under a lock so that concurrent callers form a single queue of
//! virtual start times; the sleeping and the transfers themselves happen
//! outside the lock.

use crate::timestamp::{TimeDelta, Timestamp};
use std::fmt;
use std::time::Duration;

/// The direction a paced transfer flows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Bytes written to a sink.
    Send,
    /// Bytes read from a source.
    Receive,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Send => f.write_str("send"),
            Direction::Receive => f.write_str("receive"),
        }
    }
}

/// A point-in-time copy of a direction's pacing state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleSnapshot {
    next_eligible: Timestamp,
    credit_secs: f64,
}

impl ScheduleSnapshot {
    /// The earliest time at which the next chunk in this direction may begin.
    pub fn next_eligible(&self) -> Timestamp {
        self.next_eligible
    }

    /// Seconds of transport blocking time not yet repaid by skipped delays.
    pub fn credit_secs(&self) -> f64 {
        self.credit_secs
    }
}

/// The mutable state of one direction.
///
/// `next_eligible` never moves backwards and `credit_secs` never goes
/// below zero.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PacingSchedule {
    next_eligible: Timestamp,
    credit_secs: f64,
}

impl PacingSchedule {
    pub(crate) fn new(now: Timestamp) -> Self {
        PacingSchedule {
            next_eligible: now,
            credit_secs: 0.0,
        }
    }

    pub(crate) fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot {
            next_eligible: self.next_eligible,
            credit_secs: self.credit_secs,
        }
    }

    /// Pays for as much of `ideal` seconds as possible out of the credit and
    /// returns the part that is still owed.
    pub(crate) fn draw_down(&mut self, ideal: f64) -> f64 {
        if ideal >= self.credit_secs {
            let owed = ideal - self.credit_secs;
            self.credit_secs = 0.0;
            owed
        } else {
            self.credit_secs -= ideal;
            0.0
        }
    }

    /// Adds the measured duration of a finished transfer to the credit.
    ///
    /// Backwards spans (a wall clock that was set back mid-transfer) count
    /// as zero.
    pub(crate) fn book(&mut self, elapsed: TimeDelta) {
        if !elapsed.is_negative() {
            self.credit_secs += elapsed.as_secs_f64();
        }
    }

    /// Reserves a slot of `ideal` seconds (after credit) behind all previous
    /// reservations and returns how long the caller has to sleep before its
    /// transfer may start.
    ///
    /// An idle schedule (one whose next eligible time has already passed)
    /// restarts at `now`, so idle time is never banked as burst capacity.
    pub(crate) fn reserve(&mut self, now: Timestamp, ideal: f64) -> Duration {
        let owed = self.draw_down(ideal);
        let backlog = if self.next_eligible.precedes(&now) {
            self.next_eligible = now;
            Duration::ZERO
        } else {
            self.next_eligible.since(now).saturating_duration()
        };
        self.next_eligible = self.next_eligible.add_secs_f64(owed);
        backlog + Duration::from_secs_f64(owed)
    }
}
