//! Board-agnostic engine logic for paired pulse devices
//!
//! This crate contains all logic that does not depend on a runtime or on
//! specific hardware:
//!
//! - Collaborator traits (actuator, peer channel, entropy)
//! - Mode controller state machine
//! - Anchored precision beat scheduler
//! - Reactive loop and lock-free sensor sample cell
//! - Pulse shaping per profile
//! - Peer link monitoring
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod beat;
pub mod config;
pub mod error;
pub mod link;
pub mod reactive;
pub mod shaping;
pub mod state;
pub mod time;
pub mod traits;

pub use error::EngineError;
pub use time::{Clock, Timestamp};
