//! Events flowing into and out of the mode controller

use tandem_protocol::{Message, ProfileId, SyncEnvelope};

use super::mode::Label;
use crate::time::Timestamp;

/// Inputs that can change the mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Intent {
    // Presentation-layer commands
    /// Store a configuration without a transition
    ApplyConfig(SyncEnvelope),
    /// Enter precision mode at the envelope's target instant
    ApplyEngage(SyncEnvelope),
    /// Return to standby without telling the peer
    ApplyStop,
    /// Start the reactive loop
    RequestReactive { audible: bool, profile: ProfileId },
    /// Return to standby and tell the peer
    RequestHalt,
    /// Start precision mode here and engage the peer at the same instant
    Initialize {
        profile: ProfileId,
        bpm: u32,
        intensity: u8,
    },
    /// Store a configuration and send it to the peer
    ShareConfig(SyncEnvelope),

    // Peer events
    /// Decoded message from the peer
    Received(Message),
    /// Channel had no peer to deliver to
    PeerUnreachable,
    /// Channel delivered a message
    PeerDelivered,

    // Lifecycle
    /// Emergency stop; overtakes every queued intent
    Kill,
    /// Teardown; nothing is accepted afterwards
    Shutdown,
}

impl Intent {
    /// Check if this is the kill switch
    pub fn is_kill(&self) -> bool {
        matches!(self, Intent::Kill)
    }

    /// Check if this intent originates from the peer or the channel
    pub fn is_peer_event(&self) -> bool {
        matches!(
            self,
            Intent::Received(_) | Intent::PeerUnreachable | Intent::PeerDelivered
        )
    }

    /// Check if this intent comes from the local presentation layer
    pub fn is_local_command(&self) -> bool {
        !self.is_peer_event() && !matches!(self, Intent::Kill | Intent::Shutdown)
    }
}

impl From<Message> for Intent {
    fn from(message: Message) -> Self {
        Intent::Received(message)
    }
}

/// Snapshot published whenever the visible state changes
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub label: Label,
    /// A loop is running
    pub active: bool,
    /// `false` when running local-only because the peer is unreachable
    pub peer_synced: bool,
}

/// One-way notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notification {
    /// Mode or reachability changed; consecutive duplicates are suppressed
    StateChanged(Status),
    /// Stored configuration changed
    ConfigChanged(SyncEnvelope),
    /// A precision beat fired, silent or not
    Beat { index: u64, at: Timestamp },
    /// Telemetry sample received from the peer
    PeerTelemetry { intensity_percent: u8 },
    /// Peer started or stopped being heard from
    PeerLiveness { live: bool },
}
