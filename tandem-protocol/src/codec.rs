//! Fixed-width payload encoding and decoding
//!
//! Layouts (big-endian):
//! - config: PROFILE (1) + BPM (4, signed) + INTENSITY (1) + SLEEP (1) = 7 bytes
//! - engage: config fields + TARGET (8, signed epoch ms) = 15 bytes
//! - stop: empty
//! - telemetry: MODE (1) + RESERVED (1) + INTENSITY (1) = 3 bytes

use core::fmt;

use heapless::Vec;

use crate::envelope::{SyncEnvelope, MAX_INTENSITY};
use crate::profile::ProfileId;
use crate::telemetry::{ModeClass, Telemetry};
use crate::time::Timestamp;

/// Config payload length
pub const CONFIG_LEN: usize = 7;

/// Engage payload length
pub const ENGAGE_LEN: usize = CONFIG_LEN + 8;

/// Stop payload length
pub const STOP_LEN: usize = 0;

/// Telemetry payload length
pub const TELEMETRY_LEN: usize = 3;

/// Largest payload of any message
pub const MAX_PAYLOAD_SIZE: usize = ENGAGE_LEN;

/// Value written into the telemetry reserved byte
const TELEMETRY_RESERVED: u8 = 0;

/// Encoded message payload
pub type Payload = Vec<u8, MAX_PAYLOAD_SIZE>;

/// Errors that can occur during encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Buffer has the wrong size or carries an unknown enum byte
    MalformedMessage,
    /// Field outside its allowed range (bpm <= 0, intensity > 100)
    InvalidConfig,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MalformedMessage => f.write_str("malformed message"),
            ProtocolError::InvalidConfig => f.write_str("invalid configuration"),
        }
    }
}

/// Encode a config-sync payload
///
/// Any target instant on the envelope is ignored.
pub fn encode_config(envelope: &SyncEnvelope) -> Result<Payload, ProtocolError> {
    envelope.validate()?;
    let mut payload = Payload::new();
    push_config_fields(&mut payload, envelope)?;
    Ok(payload)
}

/// Decode a config-sync payload
pub fn decode_config(bytes: &[u8]) -> Result<SyncEnvelope, ProtocolError> {
    if bytes.len() != CONFIG_LEN {
        return Err(ProtocolError::MalformedMessage);
    }
    parse_config_fields(bytes)
}

/// Encode an engage payload
///
/// The envelope must carry a target instant.
pub fn encode_engage(envelope: &SyncEnvelope) -> Result<Payload, ProtocolError> {
    envelope.validate()?;
    let target = envelope.target.ok_or(ProtocolError::InvalidConfig)?;

    let mut payload = Payload::new();
    push_config_fields(&mut payload, envelope)?;
    payload
        .extend_from_slice(&target.to_be_bytes())
        .map_err(|_| ProtocolError::MalformedMessage)?;
    Ok(payload)
}

/// Decode an engage payload
pub fn decode_engage(bytes: &[u8]) -> Result<SyncEnvelope, ProtocolError> {
    if bytes.len() != ENGAGE_LEN {
        return Err(ProtocolError::MalformedMessage);
    }
    let envelope = parse_config_fields(&bytes[..CONFIG_LEN])?;

    let mut target = [0u8; 8];
    target.copy_from_slice(&bytes[CONFIG_LEN..ENGAGE_LEN]);
    Ok(envelope.with_target(Timestamp::from_be_bytes(target)))
}

/// Encode a stop payload
pub fn encode_stop() -> Payload {
    Payload::new()
}

/// Decode a stop payload
pub fn decode_stop(bytes: &[u8]) -> Result<(), ProtocolError> {
    if bytes.len() != STOP_LEN {
        return Err(ProtocolError::MalformedMessage);
    }
    Ok(())
}

/// Encode a telemetry payload from a normalized intensity
pub fn encode_telemetry(audible: bool, intensity: f32) -> Payload {
    encode_telemetry_sample(&Telemetry::from_intensity(audible, intensity))
}

/// Encode an already-quantized telemetry sample
pub fn encode_telemetry_sample(sample: &Telemetry) -> Payload {
    let mut payload = Payload::new();
    // Capacity is always sufficient for three bytes
    let _ = payload.extend_from_slice(&[
        sample.mode.to_byte(),
        TELEMETRY_RESERVED,
        sample.intensity_percent,
    ]);
    payload
}

/// Decode a telemetry payload
///
/// The reserved byte is ignored.
pub fn decode_telemetry(bytes: &[u8]) -> Result<Telemetry, ProtocolError> {
    if bytes.len() != TELEMETRY_LEN {
        return Err(ProtocolError::MalformedMessage);
    }
    let mode = ModeClass::from_byte(bytes[0]).ok_or(ProtocolError::MalformedMessage)?;
    let intensity_percent = bytes[2];
    if intensity_percent > MAX_INTENSITY {
        return Err(ProtocolError::InvalidConfig);
    }
    Ok(Telemetry {
        mode,
        intensity_percent,
    })
}

fn push_config_fields(payload: &mut Payload, envelope: &SyncEnvelope) -> Result<(), ProtocolError> {
    // validate() guarantees bpm fits in i32
    let bpm = envelope.bpm as i32;

    payload
        .push(envelope.profile.to_byte())
        .map_err(|_| ProtocolError::MalformedMessage)?;
    payload
        .extend_from_slice(&bpm.to_be_bytes())
        .map_err(|_| ProtocolError::MalformedMessage)?;
    payload
        .push(envelope.intensity)
        .map_err(|_| ProtocolError::MalformedMessage)?;
    payload
        .push(envelope.sleep as u8)
        .map_err(|_| ProtocolError::MalformedMessage)?;
    Ok(())
}

fn parse_config_fields(bytes: &[u8]) -> Result<SyncEnvelope, ProtocolError> {
    let profile = ProfileId::from_byte(bytes[0]).ok_or(ProtocolError::MalformedMessage)?;
    let bpm = i32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
    if bpm <= 0 {
        return Err(ProtocolError::InvalidConfig);
    }

    let envelope = SyncEnvelope::config(profile, bpm as u32, bytes[5], bytes[6] == 1);
    envelope.validate()?;
    Ok(envelope)
}
