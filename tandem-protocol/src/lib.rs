//! Device-pair synchronization protocol
//!
//! This crate defines the messages exchanged between the wrist unit and the
//! handheld unit to configure, start and stop actuation, plus the throttled
//! telemetry the wrist unit streams while it is in reactive mode.
//!
//! # Protocol Overview
//!
//! Every message travels on its own route of an abstract reliable channel.
//! Payloads are fixed width and big-endian:
//! ```text
//! config     ┌─────────┬──────────┬───────────┬───────┐
//!            │ PROFILE │ BPM      │ INTENSITY │ SLEEP │            7 bytes
//!            │ 1B      │ 4B (i32) │ 1B        │ 1B    │
//!            └─────────┴──────────┴───────────┴───────┘
//! engage     ┌─────────────── config ─────────────────┬──────────┐
//!            │ ...                                     │ TARGET   │ 15 bytes
//!            │                                         │ 8B (i64) │
//!            └─────────────────────────────────────────┴──────────┘
//! stop       (empty)                                              0 bytes
//! telemetry  ┌──────┬──────────┬───────────┐
//!            │ MODE │ RESERVED │ INTENSITY │                      3 bytes
//!            └──────┴──────────┴───────────┘
//! ```
//!
//! The engage target is an epoch-millisecond instant that each receiver
//! compares against its own clock. The protocol tolerates latency; it does
//! not synchronize clocks.
//!
//! The protocol only serializes and validates. Deciding what a message means
//! for the running device is the mode controller's job.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod codec;
pub mod envelope;
pub mod messages;
pub mod profile;
pub mod telemetry;
pub mod time;

pub use codec::{
    decode_config, decode_engage, decode_stop, decode_telemetry, encode_config, encode_engage,
    encode_stop, encode_telemetry, encode_telemetry_sample, Payload, ProtocolError, CONFIG_LEN,
    ENGAGE_LEN, MAX_PAYLOAD_SIZE, STOP_LEN, TELEMETRY_LEN,
};
pub use envelope::{SyncEnvelope, MAX_INTENSITY};
pub use messages::{Message, Route};
pub use profile::ProfileId;
pub use telemetry::{ModeClass, Telemetry};
pub use time::Timestamp;
