//! Inter-task communication channels
//!
//! Groups the channels the engine tasks use to talk to each other and to the
//! platform. One [`EngineChannels`] exists per engine; it is usually placed
//! in a `static` so handles can be `'static`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

use tandem_core::beat::BeatConfig;
use tandem_core::reactive::SampleCell;
use tandem_core::state::{Intent, Notification, PulseRequest};
use tandem_core::Timestamp;
use tandem_protocol::{Message, ProfileId};

/// Channel capacity for intents from the platform and the transport
pub const INTENT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for actuation commands
pub const COMMAND_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outbound transport requests
pub const OUTBOUND_CHANNEL_SIZE: usize = 8;

/// Channel capacity for presentation notifications
pub const NOTIFICATION_CHANNEL_SIZE: usize = 16;

/// Commands from the controller to the actuation task
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuationCommand {
    /// Cancel the running loop
    StopLoop,
    /// Stop any pulse and mute the tone
    Silence,
    /// Adopt a beat loop anchored at `start`
    StartBeat { config: BeatConfig, start: Timestamp },
    /// Adopt a reactive loop
    StartReactive { audible: bool, profile: ProfileId },
    /// Fire one pulse; the running loop continues afterwards
    Pulse(PulseRequest),
    /// Silence and exit
    Release,
}

/// Requests to the transport task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outbound {
    /// Encode and send a message to the peer
    Send(Message),
    /// Look for peer nodes again
    Rediscover,
    /// Exit
    Close,
}

/// Channels shared by the engine tasks
pub struct EngineChannels {
    /// Intents for the controller task
    pub(crate) intents: Channel<CriticalSectionRawMutex, Intent, INTENT_CHANNEL_SIZE>,
    /// Kill switch; bypasses the intent channel
    pub(crate) kill: Signal<CriticalSectionRawMutex, ()>,
    /// Controller to actuation
    pub(crate) commands: Channel<CriticalSectionRawMutex, ActuationCommand, COMMAND_CHANNEL_SIZE>,
    /// Controller and actuation to transport
    pub(crate) outbound: Channel<CriticalSectionRawMutex, Outbound, OUTBOUND_CHANNEL_SIZE>,
    /// Engine to presentation
    pub(crate) notifications:
        Channel<CriticalSectionRawMutex, Notification, NOTIFICATION_CHANNEL_SIZE>,
    /// Sensor callback to reactive loop
    pub(crate) sample: SampleCell,
    /// Transport's view of peer availability, read by the reactive loop
    peers_available: AtomicBool,
}

impl Default for EngineChannels {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineChannels {
    pub const fn new() -> Self {
        Self {
            intents: Channel::new(),
            kill: Signal::new(),
            commands: Channel::new(),
            outbound: Channel::new(),
            notifications: Channel::new(),
            sample: SampleCell::new(),
            peers_available: AtomicBool::new(true),
        }
    }

    pub(crate) fn peers_available(&self) -> bool {
        self.peers_available.load(Ordering::Relaxed)
    }

    pub(crate) fn set_peers_available(&self, available: bool) {
        self.peers_available.store(available, Ordering::Relaxed);
    }

    /// Publish a notification without waiting
    ///
    /// Presentation must never hold up the engine; when the channel is full
    /// the notification is dropped.
    pub(crate) fn notify(&self, notification: Notification) {
        if self.notifications.try_send(notification).is_err() {
            crate::fmt::trace!("Notification channel full, dropping");
        }
    }
}
