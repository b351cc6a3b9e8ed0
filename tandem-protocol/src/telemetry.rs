//! Reactive-mode telemetry streamed from the wrist unit

/// Mode class byte carried by telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeClass {
    /// Reactive mode with audio proxy muted
    ReactiveSilent,
    /// Reactive mode with audio proxy enabled
    ReactiveAudible,
}

// Wire format values
const MODE_REACTIVE_SILENT: u8 = 1;
const MODE_REACTIVE_AUDIBLE: u8 = 3;

impl ModeClass {
    /// Mode class for a reactive loop
    pub fn reactive(audible: bool) -> Self {
        if audible {
            ModeClass::ReactiveAudible
        } else {
            ModeClass::ReactiveSilent
        }
    }

    /// Parse a mode class from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            MODE_REACTIVE_SILENT => Some(ModeClass::ReactiveSilent),
            MODE_REACTIVE_AUDIBLE => Some(ModeClass::ReactiveAudible),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ModeClass::ReactiveSilent => MODE_REACTIVE_SILENT,
            ModeClass::ReactiveAudible => MODE_REACTIVE_AUDIBLE,
        }
    }

    /// Check whether the sender's audio proxy is enabled
    pub fn is_audible(self) -> bool {
        matches!(self, ModeClass::ReactiveAudible)
    }
}

/// One telemetry sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    /// Sender's mode class
    pub mode: ModeClass,
    /// Sender's current intensity (0-100)
    pub intensity_percent: u8,
}

impl Telemetry {
    /// Build a sample from a normalized intensity in `[0, 1]`
    ///
    /// Out-of-range input is clamped; the percentage is truncated.
    pub fn from_intensity(audible: bool, intensity: f32) -> Self {
        let clamped = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        Self {
            mode: ModeClass::reactive(audible),
            intensity_percent: (clamped * 100.0) as u8,
        }
    }

    /// Intensity as a fraction in `[0, 1]`
    pub fn intensity(&self) -> f32 {
        self.intensity_percent as f32 / 100.0
    }
}
