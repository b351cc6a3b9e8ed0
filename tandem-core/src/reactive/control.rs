//! Reactive loop state

use tandem_protocol::{ProfileId, Telemetry};

use super::sample::ReactiveSample;
use crate::config::ReactiveConfig;
use crate::shaping::{reactive_action, Pulse};
use crate::time::Timestamp;
use crate::traits::{Capability, Entropy};

/// Audio-proxy tone amplitude at zero intensity
const TONE_FLOOR: f32 = 0.2;
/// Tone amplitude added at full intensity
const TONE_SPAN: f32 = 0.6;

/// What one iteration of the reactive loop does
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReactiveStep {
    /// Tone amplitude; always applied, `0.0` when muted
    pub tone: f32,
    pub pulse: Option<Pulse>,
    /// Wait before the next iteration
    pub delay_ms: u32,
    /// Sample to send to the peer
    pub telemetry: Option<Telemetry>,
    /// Ask the channel to look for peers again
    pub rediscover: bool,
}

/// State carried between reactive iterations
#[derive(Debug, Clone)]
pub struct ReactiveLoop {
    audible: bool,
    profile: ProfileId,
    config: ReactiveConfig,
    emits_telemetry: bool,
    last_telemetry: Option<Timestamp>,
    last_discovery: Option<Timestamp>,
    cancelled: bool,
}

impl ReactiveLoop {
    /// Start a loop; `emits_telemetry` is true on the wrist unit
    pub fn start(
        audible: bool,
        profile: ProfileId,
        config: ReactiveConfig,
        emits_telemetry: bool,
    ) -> Self {
        Self {
            audible,
            profile,
            config,
            emits_telemetry,
            last_telemetry: None,
            last_discovery: None,
            cancelled: false,
        }
    }

    pub fn audible(&self) -> bool {
        self.audible
    }

    pub fn profile(&self) -> ProfileId {
        self.profile
    }

    /// Tone amplitude for an intensity
    pub fn tone_for(&self, intensity: f32) -> f32 {
        if self.audible {
            TONE_FLOOR + TONE_SPAN * intensity.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Run one iteration against the latest sample
    ///
    /// `peers_available` is the channel's view of connected peers. Returns
    /// `None` once cancelled.
    pub fn step<E: Entropy + ?Sized>(
        &mut self,
        sample: ReactiveSample,
        now: Timestamp,
        peers_available: bool,
        capability: Capability,
        entropy: &mut E,
    ) -> Option<ReactiveStep> {
        if self.cancelled {
            return None;
        }
        let intensity = sample.smoothed_intensity.clamp(0.0, 1.0);
        let (telemetry, rediscover) = self.link_step(intensity, now, peers_available);

        let (pulse, delay_ms) = if intensity > self.config.fire_threshold {
            let action = reactive_action(
                self.profile,
                intensity,
                capability,
                &self.config.timing(),
                entropy,
            );
            (action.pulse, action.delay_ms)
        } else {
            (None, self.config.idle_ms)
        };

        Some(ReactiveStep {
            tone: self.tone_for(intensity),
            pulse,
            delay_ms,
            telemetry,
            rediscover,
        })
    }

    fn link_step(
        &mut self,
        intensity: f32,
        now: Timestamp,
        peers_available: bool,
    ) -> (Option<Telemetry>, bool) {
        if !self.emits_telemetry || intensity <= self.config.telemetry_threshold {
            return (None, false);
        }
        let due = |last: Option<Timestamp>, interval: u32| {
            last.map_or(true, |t| now.millis_since(t) >= interval as i64)
        };
        if !due(self.last_telemetry, self.config.telemetry_interval_ms) {
            return (None, false);
        }
        if peers_available {
            self.last_telemetry = Some(now);
            (Some(Telemetry::from_intensity(self.audible, intensity)), false)
        } else if due(self.last_discovery, self.config.rediscovery_interval_ms) {
            self.last_discovery = Some(now);
            (None, true)
        } else {
            (None, false)
        }
    }

    /// Stop the loop; no further steps are produced
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
