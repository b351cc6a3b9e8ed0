//! Precision beat scheduling
//!
//! Beats are computed from a fixed anchor, never accumulated from the
//! previous wake-up, so timer jitter never compounds into drift.

pub mod anchor;
pub mod scheduler;

pub use anchor::BeatAnchor;
pub use scheduler::{Beat, BeatConfig, BeatScheduler};
