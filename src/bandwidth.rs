use crate::errors::ParseBandwidthError;
use nonzero_ext::nonzero;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// The largest slice of a transfer that is handed to the transport in
/// one go, unless configured otherwise.
pub const DEFAULT_MAX_CHUNK: NonZeroUsize = nonzero!(10_000usize);

/// A pacing configuration: a target rate and the largest chunk that may be
/// transferred at once.
///
/// Rates are stored in bits per second. A rate of zero means "unlimited":
/// limiters configured that way pass every operation straight to the
/// transport.
///
/// # Chunk sizes
/// The rate is only conformed to on average. A limiter sends each chunk in
/// a single burst and then waits out the time that chunk is worth at the
/// target rate, so the chunk size bounds how bursty the resulting stream
/// looks. Smaller chunks give a smoother stream at the cost of more wakeups.
///
/// # Examples
///
/// 64 kbit/s in chunks of at most 10000 bytes:
/// ```rust
/// # use ratepace::Bandwidth;
/// let b = Bandwidth::kbps(64);
/// assert_eq!(b.bits_per_second(), 64_000);
/// assert_eq!(b.max_chunk().get(), 10_000);
/// ```
///
/// 1000 bytes per second, sent 500 bytes at a time:
/// ```rust
/// # use ratepace::Bandwidth;
/// # use nonzero_ext::nonzero;
/// let b = Bandwidth::kbps(8).allow_chunk(nonzero!(500usize));
/// assert_eq!(b, "8kbit@500".parse::<Bandwidth>().unwrap());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Bandwidth {
    pub(crate) bits_per_second: u64,
    pub(crate) max_chunk: NonZeroUsize,
}

impl Default for Bandwidth {
    fn default() -> Self {
        Bandwidth::unlimited()
    }
}

/// Constructors for Bandwidths
impl Bandwidth {
    /// No pacing at all.
    pub const fn unlimited() -> Bandwidth {
        Bandwidth::bps(0)
    }

    /// Construct a bandwidth of the given number of kilobits (1000 bits) per second.
    pub const fn kbps(kbits: u64) -> Bandwidth {
        Bandwidth::bps(kbits.saturating_mul(1000))
    }

    /// Construct a bandwidth of the given number of bits per second.
    pub const fn bps(bits: u64) -> Bandwidth {
        Bandwidth {
            bits_per_second: bits,
            max_chunk: DEFAULT_MAX_CHUNK,
        }
    }

    /// Adjusts the largest number of bytes transferred in one chunk.
    pub const fn allow_chunk(self, max_chunk: NonZeroUsize) -> Bandwidth {
        Bandwidth { max_chunk, ..self }
    }
}

/// Retrieving information about a bandwidth
impl Bandwidth {
    /// The target rate in bits per second; zero if unlimited.
    pub const fn bits_per_second(&self) -> u64 {
        self.bits_per_second
    }

    /// The largest number of bytes handed to the transport at once.
    pub const fn max_chunk(&self) -> NonZeroUsize {
        self.max_chunk
    }

    /// Whether this configuration disables pacing.
    pub const fn is_unlimited(&self) -> bool {
        self.bits_per_second == 0
    }
}

/// Seconds that `bytes` are worth at `bits_per_second`.
pub(crate) fn ideal_duration(bytes: usize, bits_per_second: u64) -> f64 {
    debug_assert!(bits_per_second > 0);
    (bytes as f64 * 8.0) / bits_per_second as f64
}

/// Parses `unlimited`, a bare number of kbit/s, or a number with a
/// `bit`/`kbit`/`mbit` unit, optionally followed by `@<bytes>` for the
/// chunk size.
impl FromStr for Bandwidth {
    type Err = ParseBandwidthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (rate, chunk) = match s.split_once('@') {
            Some((rate, chunk)) => (rate.trim(), Some(chunk.trim())),
            None => (s, None),
        };

        let lower = rate.to_ascii_lowercase();
        let bandwidth = if lower == "unlimited" {
            Bandwidth::unlimited()
        } else {
            // Fractional rates are taken up to the unit so they fail as
            // rates, not as units.
            let unit_at = lower
                .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
                .unwrap_or(lower.len());
            let (digits, unit) = lower.split_at(unit_at);
            if digits.is_empty() {
                return Err(ParseBandwidthError::InvalidRate(rate.to_string()));
            }
            let value: u64 = digits
                .parse()
                .map_err(|_| ParseBandwidthError::InvalidRate(rate.to_string()))?;
            let unit = unit.trim().trim_end_matches("/s");
            let multiplier: u64 = match unit {
                "" | "k" | "kbit" | "kbps" => 1_000,
                "bit" | "bps" => 1,
                "m" | "mbit" | "mbps" => 1_000_000,
                _ => return Err(ParseBandwidthError::UnknownUnit(unit.to_string())),
            };
            Bandwidth::bps(value.saturating_mul(multiplier))
        };

        match chunk {
            None => Ok(bandwidth),
            Some(chunk) => {
                let size: usize = chunk
                    .parse()
                    .map_err(|_| ParseBandwidthError::InvalidChunk(chunk.to_string()))?;
                let size = NonZeroUsize::new(size)
                    .ok_or_else(|| ParseBandwidthError::InvalidChunk(chunk.to_string()))?;
                Ok(bandwidth.allow_chunk(size))
            }
        }
    }
}
