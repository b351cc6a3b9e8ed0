//! Haptic actuator trait

use crate::error::EngineError;
use crate::shaping::Pulse;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the actuator hardware can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Capability {
    /// Arbitrary one-shots and waveforms with per-segment amplitude
    AmplitudeControl,
    /// Only predefined effects (click, tick, heavy click)
    #[default]
    FixedEffect,
}

impl Capability {
    /// Check whether amplitude-shaped pulses can be rendered
    pub fn has_amplitude_control(self) -> bool {
        matches!(self, Capability::AmplitudeControl)
    }
}

/// Haptic output device
///
/// Implementations must accept a new pulse while a previous one is still
/// rendering; the new one replaces it.
pub trait Actuator {
    /// Query what the hardware can render
    ///
    /// Returns [`EngineError::ActuatorUnavailable`] when no hardware is
    /// present. Callers degrade to [`Capability::FixedEffect`].
    fn capability(&self) -> Result<Capability, EngineError>;

    /// Start rendering a pulse
    fn fire(&mut self, pulse: &Pulse);

    /// Set the continuous audio-proxy tone amplitude in `[0, 1]`
    ///
    /// An amplitude of `0.0` mutes the tone.
    fn set_tone(&mut self, amplitude: f32);

    /// Stop any pulse and mute the tone
    fn silence(&mut self);
}
