//! Mode state machine
//!
//! Defines the authoritative runtime behavior of a device. The controller
//! is explicit, finite and deterministic: every intent maps the current
//! mode to a new mode plus a bounded list of effects for the runtime.

pub mod controller;
pub mod events;
pub mod mode;
pub mod queue;

pub use controller::{Effect, Effects, ModeController, PulseRequest, MAX_EFFECTS};
pub use events::{Intent, Notification, Status};
pub use mode::{Label, Mode};
pub use queue::{IntentQueue, INTENT_QUEUE_DEPTH};
