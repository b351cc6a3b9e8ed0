//! Peer link supervision
//!
//! Tracks whether the paired device is reachable and whether it has been
//! heard from recently.

pub mod monitor;

pub use monitor::{LinkStatus, PeerLink};
