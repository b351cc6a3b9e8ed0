//! Configuration payload shared by config-sync and engage messages

use crate::codec::ProtocolError;
use crate::profile::ProfileId;
use crate::time::Timestamp;

/// Maximum intensity percentage
pub const MAX_INTENSITY: u8 = 100;

/// Payload used to configure or engage the peer device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncEnvelope {
    /// Pulse-shaping profile
    pub profile: ProfileId,
    /// Beats per minute (must be > 0)
    pub bpm: u32,
    /// Intensity percentage (0-100)
    pub intensity: u8,
    /// Presentation-only sleep flag; never changes actuation
    pub sleep: bool,
    /// Shared start instant, present only on engage messages
    pub target: Option<Timestamp>,
}

impl SyncEnvelope {
    /// Create a config-sync envelope (no target instant)
    pub const fn config(profile: ProfileId, bpm: u32, intensity: u8, sleep: bool) -> Self {
        Self {
            profile,
            bpm,
            intensity,
            sleep,
            target: None,
        }
    }

    /// Create an engage envelope with a shared start instant
    pub const fn engage(profile: ProfileId, bpm: u32, intensity: u8, target: Timestamp) -> Self {
        Self {
            profile,
            bpm,
            intensity,
            sleep: false,
            target: Some(target),
        }
    }

    /// Same configuration, bound to a start instant
    pub const fn with_target(mut self, target: Timestamp) -> Self {
        self.target = Some(target);
        self
    }

    /// Same configuration, without a start instant
    pub const fn without_target(mut self) -> Self {
        self.target = None;
        self
    }

    /// Check whether this envelope engages the receiver
    pub fn is_engage(&self) -> bool {
        self.target.is_some()
    }

    /// Validate field ranges
    ///
    /// `bpm` must be positive and fit the signed 32-bit wire field;
    /// `intensity` must be a percentage.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.bpm == 0 || self.bpm > i32::MAX as u32 {
            return Err(ProtocolError::InvalidConfig);
        }
        if self.intensity > MAX_INTENSITY {
            return Err(ProtocolError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for SyncEnvelope {
    fn default() -> Self {
        Self::config(ProfileId::Pulse, 60, 50, false)
    }
}
