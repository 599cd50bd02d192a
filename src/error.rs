use core::fmt;

/// Failures reported by rank- and position-addressed operations.
///
/// Absence of a key is not an error: key lookups and removals report it with
/// `Option`/`bool`, matching the standard collections. `Error` covers the two
/// conditions that must be surfaced rather than absorbed: a rank outside the
/// live range (never clamped) and a position whose node has been removed
/// (never read through).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A rank outside `[0, len)` was passed to a select-style operation.
    OutOfRange {
        /// The offending rank.
        rank: usize,
        /// The collection length at the time of the call.
        len: usize,
    },
    /// A position naming a removed node, or the past-the-end position where a
    /// live element was required.
    InvalidPosition,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { rank, len } => {
                write!(f, "rank {rank} is out of range for length {len}")
            }
            Error::InvalidPosition => f.write_str("position does not name a live element"),
        }
    }
}

impl core::error::Error for Error {}
