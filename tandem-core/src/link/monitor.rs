//! Peer link monitor

use crate::time::Timestamp;

/// Reachability of the paired device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Last send was delivered, or nothing has failed yet
    Synced,
    /// The channel reported no peer nodes; actuation runs local-only
    LocalOnly,
}

/// Peer link monitor
///
/// Reachability flips on channel reports. Liveness is a separate signal:
/// the peer is live while it was heard from within the timeout.
#[derive(Debug, Clone)]
pub struct PeerLink {
    /// Last inbound message from the peer
    last_contact: Option<Timestamp>,
    /// Channel reported no peers and nothing has succeeded since
    unreachable: bool,
    /// Silence after which the peer is no longer live (ms)
    timeout_ms: u32,
}

impl PeerLink {
    /// Create a monitor with the given liveness timeout
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            last_contact: None,
            unreachable: false,
            timeout_ms,
        }
    }

    /// Record an inbound message from the peer
    pub fn contact(&mut self, now: Timestamp) {
        self.last_contact = Some(now);
        self.unreachable = false;
    }

    /// Record a successful send
    pub fn delivered(&mut self) {
        self.unreachable = false;
    }

    /// Record that the channel had no peer to send to
    pub fn unreachable(&mut self) {
        self.unreachable = true;
    }

    /// Current reachability
    pub fn status(&self) -> LinkStatus {
        if self.unreachable {
            LinkStatus::LocalOnly
        } else {
            LinkStatus::Synced
        }
    }

    /// Check whether actuation is synchronized with the peer
    pub fn is_synced(&self) -> bool {
        self.status() == LinkStatus::Synced
    }

    /// Check whether the peer was heard from within the timeout
    pub fn is_live(&self, now: Timestamp) -> bool {
        match self.last_contact {
            Some(at) => now.millis_since(at) < self.timeout_ms as i64,
            None => false,
        }
    }

    /// Last inbound contact
    pub fn last_contact(&self) -> Option<Timestamp> {
        self.last_contact
    }
}
