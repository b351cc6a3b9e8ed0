//! Tandem engine runtime
//!
//! Async runtime for one device of a synchronized pair, built on embassy.
//! [`Engine::run`] drives three tasks joined into one future:
//!
//! - **controller**: owns the mode state machine and turns intents into effects
//! - **actuation**: owns the actuator and the running beat or reactive loop
//! - **transport**: owns the peer channel and tracks reachability
//!
//! The platform talks to the engine through an [`EngineHandle`]: commands
//! and transport deliveries go in as intents, presentation notifications
//! come out.
//!
//! ```ignore
//! static CHANNELS: EngineChannels = EngineChannels::new();
//!
//! let config = load_config(None);
//! let clock = WallClock::new(Timestamp::from_millis(epoch_millis));
//! let engine = Engine::new(&CHANNELS, config, motor, link, clock, SmallRng::seed_from_u64(seed))?;
//! let handle = engine.handle();
//! spawner.spawn(engine_task(engine))?;
//! handle.initialize(ProfileId::Pulse, 60, 80)?;
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub(crate) mod fmt;

pub mod channels;
pub mod clock;
pub mod config;
pub mod engine;
pub mod handle;
pub mod tasks;

#[cfg(test)]
mod tests;

pub use channels::EngineChannels;
pub use clock::WallClock;
pub use config::{load_config, parse_config, ConfigError};
pub use engine::Engine;
pub use handle::EngineHandle;

pub use tandem_core::config::{DeviceRole, EngineConfig};
pub use tandem_core::shaping::Pulse;
pub use tandem_core::state::{Notification, Status};
pub use tandem_core::traits::{Actuator, Capability, Entropy, PeerChannel};
pub use tandem_core::{Clock, EngineError, Timestamp};
pub use tandem_protocol::{ProfileId, Route, SyncEnvelope};
