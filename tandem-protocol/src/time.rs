//! Wall-clock instants carried on the wire

use core::ops::{Add, Sub};

/// Signed epoch-millisecond instant
///
/// A timestamp read from a message is always interpreted against the
/// receiver's own clock. Two devices never agree on what "now" is, only on
/// the number they were told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from epoch milliseconds
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Epoch milliseconds
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Offset by a (possibly negative) number of milliseconds
    pub const fn offset_ms(self, ms: i64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Milliseconds from `earlier` to `self`, negative if `self` is earlier
    pub const fn millis_since(self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Big-endian wire representation
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Parse the big-endian wire representation
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(i64::from_be_bytes(bytes))
    }
}

impl Add<u64> for Timestamp {
    type Output = Timestamp;

    fn add(self, ms: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(ms.min(i64::MAX as u64) as i64))
    }
}

impl Sub for Timestamp {
    type Output = i64;

    fn sub(self, rhs: Timestamp) -> i64 {
        self.millis_since(rhs)
    }
}
