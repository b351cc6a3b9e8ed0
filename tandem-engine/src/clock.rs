//! Wall clock on top of the embassy time driver

use embassy_time::{Duration, Instant};
use tandem_core::{Clock, Timestamp};

/// Epoch-millisecond clock derived from the monotonic embassy clock
///
/// The platform supplies the epoch time once at boot; afterwards the clock
/// advances with [`Instant`], so it never jumps backwards when the
/// platform's wall clock is adjusted.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    boot_epoch: Timestamp,
    boot_instant: Instant,
}

impl WallClock {
    /// Anchor the clock: `epoch_now` is the wall-clock time right now
    pub fn new(epoch_now: Timestamp) -> Self {
        Self {
            boot_epoch: epoch_now,
            boot_instant: Instant::now(),
        }
    }

    /// Monotonic instant corresponding to a wall-clock timestamp
    ///
    /// Timestamps before the anchor map to the anchor instant.
    pub fn instant_at(&self, at: Timestamp) -> Instant {
        let offset = at.millis_since(self.boot_epoch).max(0) as u64;
        self.boot_instant + Duration::from_millis(offset)
    }
}

impl Clock for WallClock {
    fn now(&self) -> Timestamp {
        let elapsed = self.boot_instant.elapsed().as_millis();
        self.boot_epoch.offset_ms(elapsed.min(i64::MAX as u64) as i64)
    }
}
