//! Beat scheduler
//!
//! The scheduler is a pure state machine over wall-clock instants. The
//! runtime sleeps until [`BeatScheduler::next_deadline`], then calls
//! [`BeatScheduler::poll`] with the instant it woke at.

use tandem_protocol::{ProfileId, SyncEnvelope, MAX_INTENSITY};

use super::anchor::BeatAnchor;
use crate::error::EngineError;
use crate::shaping::{beat_pulse, Pulse};
use crate::time::Timestamp;
use crate::traits::Capability;

/// Precision loop parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeatConfig {
    pub bpm: u32,
    /// 0-100; zero keeps the schedule but fires nothing
    pub intensity: u8,
    pub profile: ProfileId,
}

impl BeatConfig {
    pub const fn new(profile: ProfileId, bpm: u32, intensity: u8) -> Self {
        Self {
            bpm,
            intensity,
            profile,
        }
    }

    /// Loop parameters carried by an envelope
    pub fn from_envelope(envelope: &SyncEnvelope) -> Self {
        Self::new(envelope.profile, envelope.bpm, envelope.intensity)
    }

    /// Reject a zero tempo or an intensity above 100
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.bpm == 0 || self.intensity > MAX_INTENSITY {
            return Err(EngineError::InvalidConfig);
        }
        Ok(())
    }
}

/// One fired beat
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Beat {
    /// Index from the anchor
    pub index: u64,
    /// Instant the beat was due
    pub due: Timestamp,
    /// Beats skipped because the runtime woke late
    pub skipped: u64,
    /// `None` for a silent tick
    pub pulse: Option<Pulse>,
}

/// Anchored precision beat sequence
#[derive(Debug, Clone)]
pub struct BeatScheduler {
    config: BeatConfig,
    anchor: BeatAnchor,
    cancelled: bool,
}

impl BeatScheduler {
    /// Start a sequence anchored at `start`
    ///
    /// A `start` already in the past is treated as `now`: the first beat is
    /// due immediately and nothing is caught up.
    pub fn start(
        config: BeatConfig,
        start: Timestamp,
        now: Timestamp,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let start = start.max(now);
        Ok(Self {
            config,
            anchor: BeatAnchor::new(start, config.bpm),
            cancelled: false,
        })
    }

    pub fn config(&self) -> &BeatConfig {
        &self.config
    }

    pub fn anchor(&self) -> &BeatAnchor {
        &self.anchor
    }

    /// Check whether the sequence is still waiting for its first beat
    pub fn is_engaging(&self, now: Timestamp) -> bool {
        !self.cancelled && self.anchor.beat_count == 0 && now < self.anchor.start
    }

    /// Instant the runtime should wake at, `None` once cancelled
    pub fn next_deadline(&self) -> Option<Timestamp> {
        if self.cancelled {
            None
        } else {
            Some(self.anchor.next_due())
        }
    }

    /// Fire the beat due at `now`, if any
    ///
    /// When `now` lies past several due instants the missed beats are
    /// skipped and only the most recent one fires, keeping phase with the
    /// anchor.
    pub fn poll(&mut self, now: Timestamp, capability: Capability) -> Option<Beat> {
        if self.cancelled {
            return None;
        }
        let latest = self.anchor.latest_due(now)?;
        if latest < self.anchor.beat_count {
            return None;
        }
        let skipped = latest - self.anchor.beat_count;
        self.anchor.beat_count = latest + 1;
        Some(Beat {
            index: latest,
            due: self.anchor.beat_at(latest),
            skipped,
            pulse: beat_pulse(self.config.profile, self.config.intensity, capability),
        })
    }

    /// Stop the sequence; no beat is produced afterwards
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
