//! Configuration loading
//!
//! The platform may hand the engine a TOML document from its own storage.
//! A missing or broken document falls back to the embedded default, which
//! build.rs has already validated.

use tandem_core::config::EngineConfig;

use super::parse::parse_config;
use crate::fmt::{debug, info, warn};

/// Default configuration embedded at build time
pub const DEFAULT_CONFIG: &str = include_str!("../../tandem.toml");

/// Load the engine configuration
///
/// Tries `document` first, then the embedded default. Never fails: as a last
/// resort the built-in [`EngineConfig::default`] is used.
pub fn load_config(document: Option<&str>) -> EngineConfig {
    if let Some(document) = document {
        match parse_config(document) {
            Ok(config) => {
                info!("Loaded supplied configuration");
                log_config_summary(&config);
                return config;
            }
            Err(e) => warn!("Supplied configuration rejected: {:?}, using defaults", e),
        }
    }

    match parse_config(DEFAULT_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded configuration");
            log_config_summary(&config);
            config
        }
        Err(e) => {
            warn!("Embedded configuration rejected: {:?}", e);
            EngineConfig::default()
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &EngineConfig) {
    debug!("  role: {:?}", config.role);
    debug!("  lead: {} ms", config.sync.lead_ms);
    debug!("  peer timeout: {} ms", config.link.peer_timeout_ms);
    debug!(
        "  reactive cadence: {} ms, idle: {} ms",
        config.reactive.cadence_ms, config.reactive.idle_ms
    );
}
