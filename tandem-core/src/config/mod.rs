//! Configuration types
//!
//! Board-agnostic engine configuration. Every field has a default so a
//! partial document deserializes into a complete configuration.

pub mod types;

pub use types::*;
