//! Lock-free sensor sample cell

use portable_atomic::{AtomicU32, Ordering};

use crate::config::ReactiveConfig;

/// Latest sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReactiveSample {
    /// Raw magnitude as reported by the sensor
    pub raw_magnitude: f32,
    /// Normalized, exponentially averaged intensity in `[0, 1]`
    pub smoothed_intensity: f32,
}

/// Normalization and averaging parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Smoothing {
    /// Raw magnitude mapped to 1.0
    pub ceiling: f32,
    /// Weight of the newest sample
    pub alpha: f32,
}

impl Smoothing {
    pub fn from_config(config: &ReactiveConfig) -> Self {
        Self {
            ceiling: config.sensor_ceiling,
            alpha: config.smoothing,
        }
    }

    /// Map a raw magnitude to `[0, 1]`
    pub fn normalize(&self, raw: f32) -> f32 {
        if raw.is_nan() {
            return 0.0;
        }
        (raw / self.ceiling).clamp(0.0, 1.0)
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Self::from_config(&ReactiveConfig::default())
    }
}

/// Single-writer, single-reader sample cell
///
/// The writer is the sensor callback, the reader is the reactive loop.
/// Values are stored as `f32` bit patterns; the reader may observe a raw
/// magnitude one sample newer than the smoothed value, which is harmless.
#[derive(Debug)]
pub struct SampleCell {
    raw: AtomicU32,
    smoothed: AtomicU32,
}

impl Default for SampleCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleCell {
    pub const fn new() -> Self {
        // 0x0000_0000 is 0.0f32
        Self {
            raw: AtomicU32::new(0),
            smoothed: AtomicU32::new(0),
        }
    }

    /// Publish a raw sample (writer side)
    pub fn publish(&self, raw_magnitude: f32, smoothing: &Smoothing) {
        let target = smoothing.normalize(raw_magnitude);
        let previous = f32::from_bits(self.smoothed.load(Ordering::Relaxed));
        let next = previous + smoothing.alpha * (target - previous);
        self.raw.store(raw_magnitude.to_bits(), Ordering::Relaxed);
        self.smoothed.store(next.to_bits(), Ordering::Release);
    }

    /// Latest sample (reader side)
    pub fn latest(&self) -> ReactiveSample {
        let smoothed = f32::from_bits(self.smoothed.load(Ordering::Acquire));
        let raw = f32::from_bits(self.raw.load(Ordering::Relaxed));
        ReactiveSample {
            raw_magnitude: raw,
            smoothed_intensity: smoothed,
        }
    }
}
