//! Pulse shaping
//!
//! A profile chooses how a pulse feels, never when it fires. Each function
//! here maps a profile, an intensity and the actuator capability to a
//! [`Pulse`]; callers decide the timing.

use heapless::Vec;
use tandem_protocol::ProfileId;

use crate::traits::{Capability, Entropy};

/// Maximum segments in a waveform pulse
pub const MAX_WAVEFORM_SEGMENTS: usize = 4;

/// Predefined effects available on every actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    Click,
    Tick,
    HeavyClick,
    DoubleClick,
}

/// One constant-amplitude piece of a waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    pub duration_ms: u16,
    /// 0 = off, 255 = full
    pub amplitude: u8,
}

impl Segment {
    pub const fn new(duration_ms: u16, amplitude: u8) -> Self {
        Self {
            duration_ms,
            amplitude,
        }
    }
}

/// A fire-and-forget haptic output
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pulse {
    /// Single vibration at a fixed amplitude
    OneShot { duration_ms: u16, amplitude: u8 },
    /// Sequence of segments played back to back
    Waveform(Vec<Segment, MAX_WAVEFORM_SEGMENTS>),
    /// Predefined effect
    Effect(Effect),
}

impl Pulse {
    pub const fn one_shot(duration_ms: u16, amplitude: u8) -> Self {
        Pulse::OneShot {
            duration_ms,
            amplitude,
        }
    }

    /// Build a waveform, dropping segments past the capacity
    pub fn waveform(segments: &[Segment]) -> Self {
        let mut out = Vec::new();
        for segment in segments.iter().take(MAX_WAVEFORM_SEGMENTS) {
            // Capacity checked by take()
            let _ = out.push(*segment);
        }
        Pulse::Waveform(out)
    }

    /// Acknowledgement pulse for a received configuration
    pub const fn ack() -> Self {
        Pulse::Effect(Effect::DoubleClick)
    }

    /// Total rendered length in milliseconds, if known
    pub fn duration_ms(&self) -> Option<u32> {
        match self {
            Pulse::OneShot { duration_ms, .. } => Some(*duration_ms as u32),
            Pulse::Waveform(segments) => {
                Some(segments.iter().map(|s| s.duration_ms as u32).sum())
            }
            Pulse::Effect(_) => None,
        }
    }
}

/// Minimum amplitude for a beat or mirrored pulse
const MIN_AMPLITUDE: u8 = 10;

// Beat pulse lengths
const BEAT_PULSE_MS: u16 = 50;
const BEAT_THROB_MS: u16 = 100;

// Mirrored telemetry pulse lengths
const MIRROR_PULSE_MS: u16 = 40;
const MIRROR_THROB_HALF_MS: u16 = 50;
const MIRROR_THROB_FULL_MS: u16 = 100;

/// Mirrored samples at or below this percentage are not rendered
pub const MIRROR_THRESHOLD_PERCENT: u8 = 5;

fn percent_to_amplitude(percent: u8) -> u8 {
    let amp = (percent.min(100) as u32 * 255 / 100) as u8;
    amp.max(MIN_AMPLITUDE)
}

/// Pulse for one precision beat
///
/// Returns `None` for a silent tick (`intensity == 0`).
pub fn beat_pulse(profile: ProfileId, intensity: u8, capability: Capability) -> Option<Pulse> {
    if intensity == 0 {
        return None;
    }
    if !capability.has_amplitude_control() {
        return Some(Pulse::Effect(Effect::Click));
    }
    let amp = percent_to_amplitude(intensity);
    Some(match profile {
        ProfileId::Pulse => Pulse::one_shot(BEAT_PULSE_MS, amp),
        ProfileId::Geiger => Pulse::Effect(Effect::Tick),
        ProfileId::Throb => Pulse::one_shot(BEAT_THROB_MS, amp),
    })
}

/// Pulse mirroring one telemetry sample from the peer
///
/// Shaped with the receiver's own profile; samples at or below
/// [`MIRROR_THRESHOLD_PERCENT`] produce nothing.
pub fn mirror_pulse(
    profile: ProfileId,
    intensity_percent: u8,
    capability: Capability,
) -> Option<Pulse> {
    if intensity_percent <= MIRROR_THRESHOLD_PERCENT {
        return None;
    }
    if !capability.has_amplitude_control() {
        return Some(Pulse::Effect(Effect::Click));
    }
    let amp = percent_to_amplitude(intensity_percent);
    Some(match profile {
        ProfileId::Pulse => Pulse::one_shot(MIRROR_PULSE_MS, amp),
        ProfileId::Geiger => Pulse::Effect(Effect::Tick),
        ProfileId::Throb => Pulse::waveform(&[
            Segment::new(MIRROR_THROB_HALF_MS, amp / 2),
            Segment::new(MIRROR_THROB_HALF_MS, 0),
            Segment::new(MIRROR_THROB_FULL_MS, amp),
        ]),
    })
}

/// Delays used by the reactive profiles
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReactiveTiming {
    /// Cadence after a Pulse or Throb firing
    pub cadence_ms: u32,
    /// Delay after a Geiger click
    pub geiger_hit_ms: u32,
    /// Delay after a Geiger miss
    pub geiger_miss_ms: u32,
}

/// One reactive firing decision
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReactiveAction {
    pub pulse: Option<Pulse>,
    /// Wait before the next iteration
    pub delay_ms: u32,
}

const REACTIVE_PULSE_MS: u16 = 30;
const REACTIVE_THROB_MS: u16 = 80;
const GEIGER_PROBABILITY: f32 = 0.45;

/// Reactive firing for an above-threshold intensity in `[0, 1]`
pub fn reactive_action<E: Entropy + ?Sized>(
    profile: ProfileId,
    intensity: f32,
    capability: Capability,
    timing: &ReactiveTiming,
    entropy: &mut E,
) -> ReactiveAction {
    let intensity = intensity.clamp(0.0, 1.0);
    match profile {
        ProfileId::Pulse => {
            let amp = ((intensity * 200.0) as u8).max(10);
            let pulse = if capability.has_amplitude_control() {
                Pulse::one_shot(REACTIVE_PULSE_MS, amp)
            } else {
                Pulse::Effect(Effect::Click)
            };
            ReactiveAction {
                pulse: Some(pulse),
                delay_ms: timing.cadence_ms,
            }
        }
        ProfileId::Geiger => {
            if entropy.next_unit() < intensity * GEIGER_PROBABILITY {
                ReactiveAction {
                    pulse: Some(Pulse::Effect(Effect::Click)),
                    delay_ms: timing.geiger_hit_ms,
                }
            } else {
                ReactiveAction {
                    pulse: None,
                    delay_ms: timing.geiger_miss_ms,
                }
            }
        }
        ProfileId::Throb => {
            let heavy = (intensity * 1.5).min(1.0);
            let amp = ((heavy * 255.0) as u8).max(20);
            let pulse = if capability.has_amplitude_control() {
                Pulse::one_shot(REACTIVE_THROB_MS, amp)
            } else {
                Pulse::Effect(Effect::HeavyClick)
            };
            ReactiveAction {
                pulse: Some(pulse),
                delay_ms: timing.cadence_ms,
            }
        }
    }
}
