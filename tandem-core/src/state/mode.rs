//! Device modes

use core::fmt::Write;

use heapless::String;
use tandem_protocol::ProfileId;

/// Maximum status label length
pub const MAX_LABEL_LEN: usize = 32;

/// Human-readable status label
pub type Label = String<MAX_LABEL_LEN>;

/// Actuation mode; exactly one is active per device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Nothing running, actuator silent
    #[default]
    Standby,
    /// Sensor-driven loop
    Reactive { audible: bool, profile: ProfileId },
    /// Anchored beat loop, including the wait for its start instant
    Precision {
        bpm: u32,
        intensity: u8,
        profile: ProfileId,
    },
}

impl Mode {
    /// Check if a loop is running in this mode
    pub fn is_active(&self) -> bool {
        !matches!(self, Mode::Standby)
    }

    pub fn is_reactive(&self) -> bool {
        matches!(self, Mode::Reactive { .. })
    }

    pub fn is_precision(&self) -> bool {
        matches!(self, Mode::Precision { .. })
    }

    /// Profile shaping the running loop
    pub fn profile(&self) -> Option<ProfileId> {
        match self {
            Mode::Standby => None,
            Mode::Reactive { profile, .. } | Mode::Precision { profile, .. } => Some(*profile),
        }
    }

    /// Status label, e.g. `PRECISION (60 BPM)`
    pub fn label(&self) -> Label {
        let mut label = Label::new();
        // Every label fits MAX_LABEL_LEN
        let _ = match self {
            Mode::Standby => label.push_str("STANDBY"),
            Mode::Reactive { audible: true, .. } => label.push_str("REACTIVE (AUDIBLE)"),
            Mode::Reactive { audible: false, .. } => label.push_str("REACTIVE (SILENT)"),
            Mode::Precision { bpm, .. } => {
                write!(label, "PRECISION ({} BPM)", bpm).map_err(|_| ())
            }
        };
        label
    }
}
