//! Collaborator traits
//!
//! These traits define the interface between the engine logic and the
//! platform: the haptic actuator, the peer message channel and the
//! randomness source used by the Geiger profile.

pub mod actuator;
pub mod channel;
pub mod entropy;

pub use actuator::{Actuator, Capability};
pub use channel::PeerChannel;
pub use entropy::Entropy;
