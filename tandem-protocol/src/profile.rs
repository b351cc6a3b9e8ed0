//! Actuation profile identifiers

/// Pulse-shaping profile
///
/// Selects how each pulse feels. It never changes when pulses happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileId {
    /// Short amplitude-scaled tap
    #[default]
    Pulse,
    /// Fixed tick, fired stochastically in reactive mode
    Geiger,
    /// Long, amplitude-boosted thump
    Throb,
}

// Wire format values
const PROFILE_PULSE: u8 = 0;
const PROFILE_GEIGER: u8 = 1;
const PROFILE_THROB: u8 = 2;

impl ProfileId {
    /// All profiles in wire order
    pub const ALL: [ProfileId; 3] = [ProfileId::Pulse, ProfileId::Geiger, ProfileId::Throb];

    /// Parse a profile from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            PROFILE_PULSE => Some(ProfileId::Pulse),
            PROFILE_GEIGER => Some(ProfileId::Geiger),
            PROFILE_THROB => Some(ProfileId::Throb),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ProfileId::Pulse => PROFILE_PULSE,
            ProfileId::Geiger => PROFILE_GEIGER,
            ProfileId::Throb => PROFILE_THROB,
        }
    }

    /// Short uppercase name for status labels
    pub fn name(self) -> &'static str {
        match self {
            ProfileId::Pulse => "PULSE",
            ProfileId::Geiger => "GEIGER",
            ProfileId::Throb => "THROB",
        }
    }
}
