//! Configuration type definitions

use crate::error::EngineError;
use crate::shaping::ReactiveTiming;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of the pair this engine runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeviceRole {
    /// Carries the motion sensor and streams reactive telemetry
    #[default]
    Wrist,
    /// Mirrors the wrist's telemetry
    Handheld,
}

impl DeviceRole {
    /// Check whether the reactive loop on this device emits telemetry
    pub fn emits_telemetry(self) -> bool {
        matches!(self, DeviceRole::Wrist)
    }
}

/// Cross-device start alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SyncConfig {
    /// Lead between a local initialize and the shared start instant (ms)
    pub lead_ms: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { lead_ms: 500 }
    }
}

/// Reactive loop tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReactiveConfig {
    /// Raw magnitude mapped to full intensity
    pub sensor_ceiling: f32,
    /// EMA weight of a new sample, in `(0, 1]`
    pub smoothing: f32,
    /// Intensity above which the loop fires
    pub fire_threshold: f32,
    /// Intensity above which telemetry is sent
    pub telemetry_threshold: f32,
    /// Minimum spacing between telemetry messages (ms)
    pub telemetry_interval_ms: u32,
    /// Minimum spacing between peer re-discovery requests (ms)
    pub rediscovery_interval_ms: u32,
    /// Delay while below the firing threshold (ms)
    pub idle_ms: u32,
    /// Delay after a Pulse or Throb firing (ms)
    pub cadence_ms: u32,
    /// Delay after a Geiger click (ms)
    pub geiger_hit_ms: u32,
    /// Delay after a Geiger miss (ms)
    pub geiger_miss_ms: u32,
}

impl Default for ReactiveConfig {
    fn default() -> Self {
        Self {
            sensor_ceiling: 8.0,
            smoothing: 0.35,
            fire_threshold: 0.05,
            telemetry_threshold: 0.1,
            telemetry_interval_ms: 100,
            rediscovery_interval_ms: 5000,
            idle_ms: 40,
            cadence_ms: 60,
            geiger_hit_ms: 40,
            geiger_miss_ms: 30,
        }
    }
}

impl ReactiveConfig {
    /// Profile delays
    pub fn timing(&self) -> ReactiveTiming {
        ReactiveTiming {
            cadence_ms: self.cadence_ms,
            geiger_hit_ms: self.geiger_hit_ms,
            geiger_miss_ms: self.geiger_miss_ms,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        let unit = |v: f32| (0.0..1.0).contains(&v);
        if !(self.sensor_ceiling.is_finite() && self.sensor_ceiling > 0.0) {
            return Err(EngineError::InvalidConfig);
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(EngineError::InvalidConfig);
        }
        if !unit(self.fire_threshold) || !unit(self.telemetry_threshold) {
            return Err(EngineError::InvalidConfig);
        }
        let delays = [
            self.telemetry_interval_ms,
            self.rediscovery_interval_ms,
            self.idle_ms,
            self.cadence_ms,
            self.geiger_hit_ms,
            self.geiger_miss_ms,
        ];
        if delays.iter().any(|&d| d == 0) {
            return Err(EngineError::InvalidConfig);
        }
        Ok(())
    }
}

/// Peer link supervision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// Silence after which the peer is no longer considered live (ms)
    pub peer_timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            peer_timeout_ms: 2500,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub role: DeviceRole,
    pub sync: SyncConfig,
    pub reactive: ReactiveConfig,
    pub link: LinkConfig,
    /// Double-click when a config or engage message arrives
    pub ack_pulses: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            role: DeviceRole::Wrist,
            sync: SyncConfig::default(),
            reactive: ReactiveConfig::default(),
            link: LinkConfig::default(),
            ack_pulses: true,
        }
    }
}

impl EngineConfig {
    /// Default configuration for a role
    pub fn for_role(role: DeviceRole) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sync.lead_ms == 0 || self.link.peer_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig);
        }
        self.reactive.validate()
    }
}
