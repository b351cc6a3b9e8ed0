//! Platform-facing engine handle
//!
//! Every call validates what it can up front and then only enqueues; nothing
//! here waits on the engine tasks.

use tandem_core::config::EngineConfig;
use tandem_core::reactive::Smoothing;
use tandem_core::state::{Intent, Notification};
use tandem_core::EngineError;
use tandem_protocol::{Message, ProfileId, Route, SyncEnvelope};

use crate::channels::EngineChannels;
use crate::fmt::{debug, warn};

/// Cheap copyable handle onto a running engine
#[derive(Clone, Copy)]
pub struct EngineHandle<'a> {
    channels: &'a EngineChannels,
    smoothing: Smoothing,
}

impl<'a> EngineHandle<'a> {
    pub(crate) fn new(channels: &'a EngineChannels, config: &EngineConfig) -> Self {
        Self {
            channels,
            smoothing: Smoothing::from_config(&config.reactive),
        }
    }

    /// Store a configuration; no transition
    pub fn apply_config(&self, envelope: SyncEnvelope) -> Result<(), EngineError> {
        envelope.validate()?;
        self.enqueue(Intent::ApplyConfig(envelope))
    }

    /// Enter precision mode at the envelope's target instant
    ///
    /// The envelope must carry a target.
    pub fn apply_engage(&self, envelope: SyncEnvelope) -> Result<(), EngineError> {
        envelope.validate()?;
        if envelope.target.is_none() {
            return Err(EngineError::InvalidConfig);
        }
        self.enqueue(Intent::ApplyEngage(envelope))
    }

    /// Return to standby without telling the peer
    pub fn apply_stop(&self) -> Result<(), EngineError> {
        self.enqueue(Intent::ApplyStop)
    }

    /// Start the reactive loop
    pub fn request_reactive(&self, audible: bool, profile: ProfileId) -> Result<(), EngineError> {
        self.enqueue(Intent::RequestReactive { audible, profile })
    }

    /// Return to standby and stop the peer
    pub fn request_halt(&self) -> Result<(), EngineError> {
        self.enqueue(Intent::RequestHalt)
    }

    /// Start precision mode here and engage the peer at the same instant
    pub fn initialize(&self, profile: ProfileId, bpm: u32, intensity: u8) -> Result<(), EngineError> {
        SyncEnvelope::config(profile, bpm, intensity, false).validate()?;
        self.enqueue(Intent::Initialize {
            profile,
            bpm,
            intensity,
        })
    }

    /// Store a configuration and send it to the peer
    pub fn share_config(&self, envelope: SyncEnvelope) -> Result<(), EngineError> {
        envelope.validate()?;
        self.enqueue(Intent::ShareConfig(envelope))
    }

    /// Kill switch
    ///
    /// Bypasses the intent channel, so it lands even when the channel is full.
    pub fn kill(&self) {
        self.channels.kill.signal(());
    }

    /// Tear the engine down; nothing is accepted afterwards
    pub fn shutdown(&self) -> Result<(), EngineError> {
        self.enqueue(Intent::Shutdown)
    }

    /// Raw delivery from the transport on a path
    pub fn deliver(&self, path: &str, bytes: &[u8]) -> Result<(), EngineError> {
        let route = Route::from_path(path).ok_or_else(|| {
            debug!("Unknown route {}", path);
            EngineError::MalformedMessage
        })?;
        self.deliver_route(route, bytes)
    }

    /// Raw delivery from the transport on a known route
    pub fn deliver_route(&self, route: Route, bytes: &[u8]) -> Result<(), EngineError> {
        let message = Message::decode(route, bytes).map_err(|e| {
            warn!("Discarding {} message: {:?}", route.path(), e);
            EngineError::from(e)
        })?;
        self.enqueue(Intent::Received(message))
    }

    /// Sensor callback: publish a raw magnitude to the reactive loop
    pub fn publish_sample(&self, raw_magnitude: f32) {
        self.channels.sample.publish(raw_magnitude, &self.smoothing);
    }

    /// Next notification, if one is waiting
    pub fn try_notification(&self) -> Option<Notification> {
        self.channels.notifications.try_receive().ok()
    }

    /// Wait for the next notification
    pub async fn next_notification(&self) -> Notification {
        self.channels.notifications.receive().await
    }

    fn enqueue(&self, intent: Intent) -> Result<(), EngineError> {
        self.channels.intents.try_send(intent).map_err(|_| {
            warn!("Intent channel full, rejecting {:?}", intent);
            EngineError::QueueFull
        })
    }
}
