//! Typed messages and the routes they travel on
//!
//! Message routes:
//! - `/clinical_conf`: configuration sync, never starts or stops anything
//! - `/clinical_engage`: configuration + shared start instant
//! - `/clinical_stop`: halt
//! - `/flux_sync`: reactive telemetry from the wrist unit

use crate::codec::{
    decode_config, decode_engage, decode_stop, decode_telemetry, encode_config, encode_engage,
    encode_stop, encode_telemetry_sample, Payload, ProtocolError,
};
use crate::envelope::SyncEnvelope;
use crate::telemetry::Telemetry;

// Route paths
pub const ROUTE_CONFIG: &str = "/clinical_conf";
pub const ROUTE_ENGAGE: &str = "/clinical_engage";
pub const ROUTE_STOP: &str = "/clinical_stop";
pub const ROUTE_TELEMETRY: &str = "/flux_sync";

/// Channel route a message is sent on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    Config,
    Engage,
    Stop,
    Telemetry,
}

impl Route {
    /// Parse a route from its path
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            ROUTE_CONFIG => Some(Route::Config),
            ROUTE_ENGAGE => Some(Route::Engage),
            ROUTE_STOP => Some(Route::Stop),
            ROUTE_TELEMETRY => Some(Route::Telemetry),
            _ => None,
        }
    }

    /// Path string used by the transport
    pub fn path(self) -> &'static str {
        match self {
            Route::Config => ROUTE_CONFIG,
            Route::Engage => ROUTE_ENGAGE,
            Route::Stop => ROUTE_STOP,
            Route::Telemetry => ROUTE_TELEMETRY,
        }
    }
}

/// A decoded protocol message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Update stored configuration without a transition
    Config(SyncEnvelope),
    /// Configure and start at the envelope's target instant
    Engage(SyncEnvelope),
    /// Halt actuation
    Stop,
    /// Reactive-mode intensity sample
    Telemetry(Telemetry),
}

impl Message {
    /// Parse a message received on `route`
    pub fn decode(route: Route, bytes: &[u8]) -> Result<Self, ProtocolError> {
        match route {
            Route::Config => decode_config(bytes).map(Message::Config),
            Route::Engage => decode_engage(bytes).map(Message::Engage),
            Route::Stop => decode_stop(bytes).map(|()| Message::Stop),
            Route::Telemetry => decode_telemetry(bytes).map(Message::Telemetry),
        }
    }

    /// Parse a message received on a raw path
    pub fn decode_path(path: &str, bytes: &[u8]) -> Result<Self, ProtocolError> {
        let route = Route::from_path(path).ok_or(ProtocolError::MalformedMessage)?;
        Self::decode(route, bytes)
    }

    /// Route this message travels on
    pub fn route(&self) -> Route {
        match self {
            Message::Config(_) => Route::Config,
            Message::Engage(_) => Route::Engage,
            Message::Stop => Route::Stop,
            Message::Telemetry(_) => Route::Telemetry,
        }
    }

    /// Encode this message into its payload
    pub fn encode(&self) -> Result<Payload, ProtocolError> {
        match self {
            Message::Config(envelope) => encode_config(envelope),
            Message::Engage(envelope) => encode_engage(envelope),
            Message::Stop => Ok(encode_stop()),
            Message::Telemetry(sample) => Ok(encode_telemetry_sample(sample)),
        }
    }
}
