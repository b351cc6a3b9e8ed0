//! Beat anchor

use crate::time::Timestamp;

/// Fixed reference for a running beat sequence
///
/// Beat `n` is due at `start + n * period_millis`, rounded to the nearest
/// millisecond. Rounding error stays below a millisecond for every `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeatAnchor {
    /// Instant of beat 0
    pub start: Timestamp,
    /// 60000 / bpm
    pub period_millis: f64,
    /// Beats fired (or skipped) so far
    pub beat_count: u64,
}

impl BeatAnchor {
    /// Anchor a sequence at `start`; `bpm` must be non-zero
    pub fn new(start: Timestamp, bpm: u32) -> Self {
        Self {
            start,
            period_millis: 60_000.0 / bpm as f64,
            beat_count: 0,
        }
    }

    /// Due instant of beat `n`
    pub fn beat_at(&self, n: u64) -> Timestamp {
        // Offsets are non-negative, so +0.5 then truncation rounds
        self.start.offset_ms((n as f64 * self.period_millis + 0.5) as i64)
    }

    /// Due instant of the next beat
    pub fn next_due(&self) -> Timestamp {
        self.beat_at(self.beat_count)
    }

    /// Index of the most recent beat due at or before `now`
    ///
    /// Returns `None` before `start`.
    pub fn latest_due(&self, now: Timestamp) -> Option<u64> {
        if now < self.start {
            return None;
        }
        let elapsed = now.millis_since(self.start) as f64;
        let mut n = (elapsed / self.period_millis) as u64;
        // Correct the float estimate against the exact due instants
        while n > 0 && self.beat_at(n) > now {
            n -= 1;
        }
        while self.beat_at(n + 1) <= now {
            n += 1;
        }
        Some(n)
    }
}
