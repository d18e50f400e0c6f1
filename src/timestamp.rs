//! Second/nanosecond time values used by the pacing schedules.

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A point in time, as whole seconds plus a nanosecond remainder
/// measured from some clock-specific origin.
///
/// The nanosecond part is always in `[0, 1e9)`; every constructor and
/// operation normalizes overflow into the seconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    secs: u64,
    nanos: u32,
}

impl Timestamp {
    /// The clock origin.
    pub const ZERO: Timestamp = Timestamp { secs: 0, nanos: 0 };

    /// Constructs a timestamp, carrying excess nanoseconds into the seconds.
    pub const fn new(secs: u64, nanos: u32) -> Timestamp {
        Timestamp {
            secs: secs.saturating_add((nanos / NANOS_PER_SEC) as u64),
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    /// Whole seconds since the origin.
    pub const fn secs(&self) -> u64 {
        self.secs
    }

    /// Sub-second nanoseconds, always below one billion.
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Returns true iff `self` lies strictly before `other`.
    ///
    /// Seconds are compared first; nanoseconds break ties.
    pub fn precedes(&self, other: &Timestamp) -> bool {
        self.secs < other.secs || (self.secs == other.secs && self.nanos < other.nanos)
    }

    /// Advances the timestamp by a fractional number of seconds.
    ///
    /// The whole part is added to the seconds and the fractional part
    /// (truncated to nanosecond resolution) to the nanoseconds. Negative
    /// and NaN amounts leave the timestamp unchanged.
    pub fn add_secs_f64(self, secs: f64) -> Timestamp {
        if !(secs > 0.0) {
            return self;
        }
        let whole = secs.trunc();
        // `as` saturates for out-of-range floats.
        let frac_nanos = ((secs - whole) * f64::from(NANOS_PER_SEC)).trunc() as u32;
        let mut nanos = self.nanos + frac_nanos.min(NANOS_PER_SEC - 1);
        let mut carry = 0;
        if nanos >= NANOS_PER_SEC {
            carry = 1;
            nanos -= NANOS_PER_SEC;
        }
        Timestamp {
            secs: self.secs.saturating_add(whole as u64).saturating_add(carry),
            nanos,
        }
    }

    /// Signed difference `self - earlier`, borrowing a second when the
    /// nanosecond subtraction goes negative.
    pub fn since(&self, earlier: Timestamp) -> TimeDelta {
        let mut secs = self.secs as i64 - earlier.secs as i64;
        let mut nanos = self.nanos as i64 - earlier.nanos as i64;
        if nanos < 0 {
            secs -= 1;
            nanos += NANOS_PER_SEC as i64;
        }
        TimeDelta {
            secs,
            nanos: nanos as u32,
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.precedes(other) {
            Ordering::Less
        } else if other.precedes(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl From<Duration> for Timestamp {
    fn from(d: Duration) -> Self {
        Timestamp {
            secs: d.as_secs(),
            nanos: d.subsec_nanos(),
        }
    }
}

impl From<Timestamp> for Duration {
    fn from(t: Timestamp) -> Self {
        Duration::new(t.secs, t.nanos)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.secs, self.nanos)
    }
}

/// A signed span between two [`Timestamp`]s.
///
/// Negative spans keep a non-negative nanosecond part: -0.25s is
/// `{ secs: -1, nanos: 750_000_000 }`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimeDelta {
    secs: i64,
    nanos: u32,
}

impl TimeDelta {
    /// The empty span.
    pub const ZERO: TimeDelta = TimeDelta { secs: 0, nanos: 0 };

    /// Whole seconds, rounded towards negative infinity.
    pub const fn secs(&self) -> i64 {
        self.secs
    }

    /// Nanoseconds to add to [`secs`](Self::secs), in `[0, 1e9)`.
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Returns true if the span runs backwards.
    pub const fn is_negative(&self) -> bool {
        self.secs < 0
    }

    /// The span as fractional seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.secs as f64 + f64::from(self.nanos) / f64::from(NANOS_PER_SEC)
    }

    /// Converts to a [`Duration`], clamping negative spans to zero.
    pub fn saturating_duration(&self) -> Duration {
        if self.is_negative() {
            Duration::ZERO
        } else {
            Duration::new(self.secs as u64, self.nanos)
        }
    }
}

impl From<Duration> for TimeDelta {
    fn from(d: Duration) -> Self {
        TimeDelta {
            secs: i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
            nanos: d.subsec_nanos(),
        }
    }
}

impl fmt::Debug for TimeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.9}s", self.as_secs_f64())
    }
}
