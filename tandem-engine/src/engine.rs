//! Engine assembly
//!
//! Binds the collaborators to one set of channels and runs the three tasks
//! as a single future.

use embassy_futures::join::join3;

use tandem_core::config::EngineConfig;
use tandem_core::traits::{Actuator, Entropy, PeerChannel};
use tandem_core::{Clock, EngineError};

use crate::channels::EngineChannels;
use crate::fmt::info;
use crate::handle::EngineHandle;
use crate::tasks::{actuation_task, controller_task, transport_task};

/// A paired pulse engine, ready to run
pub struct Engine<'a, A, P, C, E> {
    channels: &'a EngineChannels,
    config: EngineConfig,
    actuator: A,
    peer: P,
    clock: C,
    entropy: E,
}

impl<'a, A, P, C, E> Engine<'a, A, P, C, E>
where
    A: Actuator,
    P: PeerChannel,
    C: Clock,
    E: Entropy,
{
    /// Assemble an engine
    ///
    /// Fails with [`EngineError::InvalidConfig`] when `config` does not
    /// validate.
    pub fn new(
        channels: &'a EngineChannels,
        config: EngineConfig,
        actuator: A,
        peer: P,
        clock: C,
        entropy: E,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            channels,
            config,
            actuator,
            peer,
            clock,
            entropy,
        })
    }

    /// Handle for the platform's callbacks
    pub fn handle(&self) -> EngineHandle<'a> {
        EngineHandle::new(self.channels, &self.config)
    }

    /// Run until shutdown
    ///
    /// Returns the actuator and the peer channel so the platform can release
    /// them.
    pub async fn run(self) -> (A, P) {
        let Self {
            channels,
            config,
            mut actuator,
            mut peer,
            clock,
            mut entropy,
        } = self;

        info!("Engine starting as {:?}", config.role);
        join3(
            controller_task(channels, &clock, config),
            actuation_task(channels, &clock, &mut actuator, &mut entropy, config),
            transport_task(channels, &mut peer),
        )
        .await;
        info!("Engine stopped");

        (actuator, peer)
    }
}
