use std::fmt;

/// Error returned when a [`Bandwidth`][crate::Bandwidth] can not be
/// parsed from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseBandwidthError {
    /// The rate is not a non-negative integer.
    InvalidRate(String),
    /// The rate carries a unit other than `bit`, `kbit` or `mbit`.
    UnknownUnit(String),
    /// The chunk size after `@` is not a positive integer.
    InvalidChunk(String),
}

impl fmt::Display for ParseBandwidthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseBandwidthError::InvalidRate(s) => write!(f, "invalid rate {:?}", s),
            ParseBandwidthError::UnknownUnit(s) => {
                write!(f, "unknown rate unit {:?}, expected bit, kbit or mbit", s)
            }
            ParseBandwidthError::InvalidChunk(s) => {
                write!(f, "chunk size {:?} is not a positive byte count", s)
            }
        }
    }
}

impl std::error::Error for ParseBandwidthError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn coverage() {
        let display_output = format!("{}", ParseBandwidthError::InvalidChunk("0".into()));
        assert!(display_output.contains("\"0\""));
        let display_output = format!("{}", ParseBandwidthError::UnknownUnit("gbit".into()));
        assert!(display_output.contains("gbit"));
        let debug_output = format!("{:?}", ParseBandwidthError::InvalidRate("x".into()));
        assert!(debug_output.contains("InvalidRate"));
    }
}
