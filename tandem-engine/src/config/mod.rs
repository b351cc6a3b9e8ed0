//! Configuration loading and parsing
//!
//! Loads the engine configuration from a platform-supplied TOML document,
//! falling back to the document embedded at build time.

pub mod loader;
pub mod parse;

pub use loader::{load_config, DEFAULT_CONFIG};
pub use parse::{parse_config, ConfigError};
