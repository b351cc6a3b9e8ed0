//! Engine error taxonomy

use core::fmt;

use tandem_protocol::ProtocolError;

/// Errors surfaced by the engine
///
/// None of these are fatal. Invalid input leaves the prior state untouched,
/// unavailable collaborators degrade to a reduced behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// bpm out of range, intensity above 100, or a bad configuration value
    InvalidConfig,
    /// Wrong payload length, unknown enum value or unknown route
    MalformedMessage,
    /// No actuator hardware, or capability query failed
    ActuatorUnavailable,
    /// Channel reports no peer nodes
    ChannelUnreachable,
    /// Intent queue is full
    QueueFull,
}

impl From<ProtocolError> for EngineError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::MalformedMessage => EngineError::MalformedMessage,
            ProtocolError::InvalidConfig => EngineError::InvalidConfig,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidConfig => f.write_str("invalid configuration"),
            EngineError::MalformedMessage => f.write_str("malformed message"),
            EngineError::ActuatorUnavailable => f.write_str("actuator unavailable"),
            EngineError::ChannelUnreachable => f.write_str("no reachable peer"),
            EngineError::QueueFull => f.write_str("intent queue full"),
        }
    }
}
